use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        loss::CrossEntropyLoss,
        pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig, MaxPool2d, MaxPool2dConfig},
        Dropout, DropoutConfig, Linear, LinearConfig, PaddingConfig2d, Relu,
    },
    prelude::*,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct ClassifierConfig {
    pub num_classes: usize,
    /// Output channels of each conv block; each block halves H and W.
    pub channels:    Vec<usize>,
    pub hidden:      usize,
    #[config(default = 0.3)]
    pub dropout:     f64,
}

impl ClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ImageClassifier<B> {
        let mut blocks = Vec::with_capacity(self.channels.len());
        let mut in_channels = 3;
        for &out_channels in &self.channels {
            blocks.push(ConvBlockConfig::new(in_channels, out_channels).init(device));
            in_channels = out_channels;
        }

        ImageClassifier {
            blocks,
            global_pool: AdaptiveAvgPool2dConfig::new([1, 1]).init(),
            hidden:      LinearConfig::new(in_channels, self.hidden).init(device),
            activation:  Relu::new(),
            dropout:     DropoutConfig::new(self.dropout).init(),
            head:        LinearConfig::new(self.hidden, self.num_classes).init(device),
        }
    }

    /// Smallest square input side the conv stack can downsample without
    /// collapsing to zero.
    pub fn min_input_size(&self) -> usize {
        1usize << self.channels.len()
    }
}

#[derive(Config, Debug)]
pub struct ConvBlockConfig {
    pub in_channels:  usize,
    pub out_channels: usize,
}

impl ConvBlockConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ConvBlock<B> {
        ConvBlock {
            conv: Conv2dConfig::new([self.in_channels, self.out_channels], [3, 3])
                .with_padding(PaddingConfig2d::Same)
                .init(device),
            activation: Relu::new(),
            pool: MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init(),
        }
    }
}

/// conv3x3 → ReLU → maxpool 2x2
#[derive(Module, Debug)]
pub struct ConvBlock<B: Backend> {
    pub conv:       Conv2d<B>,
    pub activation: Relu,
    pub pool:       MaxPool2d,
}

impl<B: Backend> ConvBlock<B> {
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        self.pool.forward(self.activation.forward(self.conv.forward(x)))
    }
}

#[derive(Module, Debug)]
pub struct ImageClassifier<B: Backend> {
    pub blocks:      Vec<ConvBlock<B>>,
    pub global_pool: AdaptiveAvgPool2d,
    pub hidden:      Linear<B>,
    pub activation:  Relu,
    pub dropout:     Dropout,
    pub head:        Linear<B>,
}

impl<B: Backend> ImageClassifier<B> {
    /// images: [batch, 3, H, W] → logits: [batch, num_classes]
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        let mut x = images;
        for block in &self.blocks {
            x = block.forward(x);
        }

        let x = self.global_pool.forward(x); // [batch, channels, 1, 1]
        let [batch_size, channels, _, _] = x.dims();
        let x = x.reshape([batch_size, channels]);

        let x = self.activation.forward(self.hidden.forward(x));
        self.head.forward(self.dropout.forward(x))
    }

    /// Forward pass plus mean cross-entropy against integer labels.
    pub fn forward_loss(
        &self,
        images: Tensor<B, 4>,
        labels: Tensor<B, 1, Int>,
        loss:   &CrossEntropyLoss<B>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(images);
        (loss.forward(logits.clone(), labels), logits)
    }
}
