//! ResNet-18 feature extractor.
//!
//! Field names follow torchvision's `resnet18` state dict so that ImageNet
//! weights can be imported with a handful of key remaps. The final `fc` layer
//! is left out: the backbone ends at global average pooling and yields one
//! 512-wide feature vector per image.

use burn::nn::conv::{Conv2d, Conv2dConfig};
use burn::nn::pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig, MaxPool2d, MaxPool2dConfig};
use burn::nn::{BatchNorm, BatchNormConfig, Initializer, PaddingConfig2d, Relu};
use burn::prelude::{Backend, Config, Device, Module, Tensor};
use std::f64::consts::SQRT_2;

pub const FEATURES: usize = 512;

const RESNET18_BLOCKS: [usize; 4] = [2, 2, 2, 2];
const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

fn kaiming() -> Initializer {
	Initializer::KaimingNormal {
		gain: SQRT_2, // recommended value for ReLU
		fan_out_only: true,
	}
}

fn conv(in_channels: usize, out_channels: usize, kernel: usize, stride: usize, padding: usize) -> Conv2dConfig {
	Conv2dConfig::new([in_channels, out_channels], [kernel, kernel])
		.with_stride([stride, stride])
		.with_padding(PaddingConfig2d::Explicit(padding, padding))
		.with_bias(false)
		.with_initializer(kaiming())
}

#[derive(Debug, Module)]
pub struct ResNet<B: Backend> {
	pub(crate) conv1: Conv2d<B>,
	pub(crate) bn1: BatchNorm<B, 2>,
	pub(crate) relu: Relu,
	pub(crate) maxpool: MaxPool2d,
	pub(crate) layer1: LayerBlock<B>,
	pub(crate) layer2: LayerBlock<B>,
	pub(crate) layer3: LayerBlock<B>,
	pub(crate) layer4: LayerBlock<B>,
	pub(crate) avgpool: AdaptiveAvgPool2d,
}

impl<B: Backend> ResNet<B> {
	pub fn resnet18(device: &Device<B>) -> Self {
		let [b1, b2, b3, b4] = RESNET18_BLOCKS;

		Self {
			// 7x7 conv, 64, /2
			conv1: conv(3, 64, 7, 2, 3).init(device),
			bn1: BatchNormConfig::new(64).init(device),
			relu: Relu::new(),
			// 3x3 maxpool, /2
			maxpool: MaxPool2dConfig::new([3, 3])
				.with_strides([2, 2])
				.with_padding(PaddingConfig2d::Explicit(1, 1))
				.init(),
			layer1: LayerBlockConfig::new(b1, 64, 64, 1).init(device),
			layer2: LayerBlockConfig::new(b2, 64, 128, 2).init(device),
			layer3: LayerBlockConfig::new(b3, 128, 256, 2).init(device),
			layer4: LayerBlockConfig::new(b4, 256, FEATURES, 2).init(device),
			avgpool: AdaptiveAvgPool2dConfig::new([1, 1]).init(),
		}
	}

	/// `[N, 3, H, W]` in `[0, 1]` -> `[N, 512]`.
	pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
		let x = normalize(images);

		let x = self.conv1.forward(x);
		let x = self.bn1.forward(x);
		let x = self.relu.forward(x);
		let x = self.maxpool.forward(x);

		let x = self.layer1.forward(x);
		let x = self.layer2.forward(x);
		let x = self.layer3.forward(x);
		let x = self.layer4.forward(x);

		// [N, 512, H, W] -> [N, 512, 1, 1] -> [N, 512]
		let x = self.avgpool.forward(x);
		x.flatten(1, 3)
	}
}

/// ImageNet statistics the pretrained weights were fitted with.
fn normalize<B: Backend>(images: Tensor<B, 4>) -> Tensor<B, 4> {
	let device = images.device();
	let mean = Tensor::<B, 1>::from_floats(IMAGENET_MEAN, &device).reshape([1, 3, 1, 1]);
	let std = Tensor::<B, 1>::from_floats(IMAGENET_STD, &device).reshape([1, 3, 1, 1]);

	(images - mean) / std
}

#[derive(Debug, Module)]
pub struct BasicBlock<B: Backend> {
	pub(crate) conv1: Conv2d<B>,
	pub(crate) bn1: BatchNorm<B, 2>,
	pub(crate) conv2: Conv2d<B>,
	pub(crate) bn2: BatchNorm<B, 2>,
	pub(crate) relu: Relu,
	pub(crate) downsample: Option<Downsample<B>>,
}

impl<B: Backend> BasicBlock<B> {
	fn new(in_channels: usize, out_channels: usize, stride: usize, device: &Device<B>) -> Self {
		let downsample = (in_channels != out_channels).then(|| Downsample {
			conv: conv(in_channels, out_channels, 1, stride, 0).init(device),
			bn: BatchNormConfig::new(out_channels).init(device),
		});

		Self {
			conv1: conv(in_channels, out_channels, 3, stride, 1).init(device),
			bn1: BatchNormConfig::new(out_channels).init(device),
			conv2: conv(out_channels, out_channels, 3, 1, 1).init(device),
			bn2: BatchNormConfig::new(out_channels).init(device),
			relu: Relu::new(),
			downsample,
		}
	}

	pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
		let identity = match &self.downsample {
			Some(downsample) => downsample.forward(input.clone()),
			None => input.clone(),
		};

		let x = self.conv1.forward(input);
		let x = self.bn1.forward(x);
		let x = self.relu.forward(x);

		let x = self.conv2.forward(x);
		let x = self.bn2.forward(x);

		self.relu.forward(x + identity)
	}
}

#[derive(Debug, Module)]
pub struct Downsample<B: Backend> {
	pub(crate) conv: Conv2d<B>,
	pub(crate) bn: BatchNorm<B, 2>,
}

impl<B: Backend> Downsample<B> {
	pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
		self.bn.forward(self.conv.forward(input))
	}
}

#[derive(Debug, Module)]
pub struct LayerBlock<B: Backend> {
	pub(crate) blocks: Vec<BasicBlock<B>>,
}

impl<B: Backend> LayerBlock<B> {
	pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
		self.blocks.iter().fold(input, |x, block| block.forward(x))
	}
}

#[derive(Config)]
pub struct LayerBlockConfig {
	num_blocks: usize,
	in_channels: usize,
	out_channels: usize,
	stride: usize,
}

impl LayerBlockConfig {
	pub fn init<B: Backend>(&self, device: &Device<B>) -> LayerBlock<B> {
		// Only the first block changes resolution and width
		let blocks = (0..self.num_blocks)
			.map(|b| match b {
				0 => BasicBlock::new(self.in_channels, self.out_channels, self.stride, device),
				_ => BasicBlock::new(self.out_channels, self.out_channels, 1, device),
			})
			.collect();

		LayerBlock { blocks }
	}
}
