// ============================================================
// Layer 4 — Image Preprocessor
// ============================================================
// Decodes an image file into the fixed-size byte layout the
// batcher expects:
//
//   1. Decode (png / jpeg / bmp) with the image crate
//   2. Convert to 8-bit RGB (drops alpha, expands greyscale)
//   3. Resize to size × size (aspect ratio is not preserved)
//   4. Reorder HWC → CHW
//
//   HWC: r0 g0 b0 r1 g1 b1 ...
//   CHW: r0 r1 ... g0 g1 ... b0 b1 ...
//
// Pixels stay as u8 here; scaling to [0, 1] happens in the
// batcher so datasets hold a quarter of the memory.
//
// Reference: image crate documentation

use anyhow::{Context, Result};
use image::{imageops::FilterType, RgbImage};
use std::path::Path;

pub const CHANNELS: usize = 3;

#[derive(Debug, Clone, Copy)]
pub struct ImagePreprocessor {
    size: u32,
}

impl ImagePreprocessor {
    pub fn new(size: u32) -> Self {
        Self { size }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Decode, resize and flatten one image file to CHW bytes.
    pub fn load(&self, path: &Path) -> Result<Vec<u8>> {
        let img = image::open(path)
            .with_context(|| format!("Cannot decode image '{}'", path.display()))?;

        let rgb = if img.width() == self.size && img.height() == self.size {
            img.to_rgb8()
        } else {
            img.resize_exact(self.size, self.size, FilterType::Triangle).to_rgb8()
        };

        Ok(to_chw(&rgb))
    }
}

/// Flatten an RGB image into channel-major bytes.
pub fn to_chw(img: &RgbImage) -> Vec<u8> {
    let (w, h) = img.dimensions();
    let plane  = (w * h) as usize;
    let mut out = vec![0u8; CHANNELS * plane];

    for (i, pixel) in img.pixels().enumerate() {
        for c in 0..CHANNELS {
            out[c * plane + i] = pixel[c];
        }
    }
    out
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_to_chw_layout() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([1, 2, 3]));
        img.put_pixel(1, 0, Rgb([4, 5, 6]));
        assert_eq!(to_chw(&img), vec![1, 4, 2, 5, 3, 6]);
    }

    #[test]
    fn test_load_resizes_to_square() {
        let tmp  = tempfile::tempdir().unwrap();
        let path = tmp.path().join("wide.png");
        RgbImage::from_pixel(10, 4, Rgb([200, 10, 30])).save(&path).unwrap();

        let pre   = ImagePreprocessor::new(6);
        let bytes = pre.load(&path).unwrap();
        assert_eq!(bytes.len(), CHANNELS * 6 * 6);
        // Uniform colour survives resizing.
        assert!(bytes[..36].iter().all(|&b| b == 200));
        assert!(bytes[36..72].iter().all(|&b| b == 10));
        assert!(bytes[72..].iter().all(|&b| b == 30));
    }

    #[test]
    fn test_undecodable_file_is_an_error() {
        let tmp  = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();
        assert!(ImagePreprocessor::new(4).load(&path).is_err());
    }
}
