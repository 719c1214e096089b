// ============================================================
// Layer 6 — Run Directory Naming
// ============================================================
// Every run writes into its own directory so checkpoints from
// earlier runs are never overwritten:
//
//   output/model/exp     ← first run named "exp"
//   output/model/exp2    ← second run
//   output/model/exp3    ← ...
//
// The first free name wins; gaps are reused.

use anyhow::{Context, Result};
use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

/// Return `path` if nothing exists there, otherwise `path` with the
/// smallest numeric suffix (starting at 2) that does not exist yet.
pub fn increment_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    (2usize..)
        .map(|n| {
            let mut name = OsString::from(path.as_os_str());
            name.push(n.to_string());
            PathBuf::from(name)
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}

/// Resolve the incremented run directory and create it.
pub fn create_run_dir(output_dir: &Path, run_name: &str) -> Result<PathBuf> {
    let dir = increment_path(&output_dir.join(run_name));
    fs::create_dir_all(&dir)
        .with_context(|| format!("Cannot create run directory '{}'", dir.display()))?;
    Ok(dir)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_path_is_returned_unchanged() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("exp");
        assert_eq!(increment_path(&p), p);
    }

    #[test]
    fn test_taken_path_gets_numeric_suffix() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("exp")).unwrap();
        assert_eq!(increment_path(&tmp.path().join("exp")), tmp.path().join("exp2"));

        fs::create_dir(tmp.path().join("exp2")).unwrap();
        assert_eq!(increment_path(&tmp.path().join("exp")), tmp.path().join("exp3"));
    }

    #[test]
    fn test_gaps_are_reused() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("exp")).unwrap();
        fs::create_dir(tmp.path().join("exp3")).unwrap();
        assert_eq!(increment_path(&tmp.path().join("exp")), tmp.path().join("exp2"));
    }

    #[test]
    fn test_create_run_dir_makes_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("output").join("model");
        let first = create_run_dir(&out, "exp").unwrap();
        let second = create_run_dir(&out, "exp").unwrap();
        assert!(first.is_dir());
        assert!(second.is_dir());
        assert_eq!(second.file_name().unwrap(), "exp2");
    }
}
