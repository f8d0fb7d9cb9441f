mod backbone;

pub use backbone::{ResNet, ResNetRecord, FEATURES};

use crate::data::PlantBatch;
use burn::config::Config;
use burn::module::{AutodiffModule, Module};
use burn::nn::loss::CrossEntropyLossConfig;
use burn::nn::{Dropout, DropoutConfig, Linear, LinearConfig, Relu};
use burn::prelude::{Backend, Int, Tensor};
use burn::tensor::activation::softmax;
use burn::tensor::backend::AutodiffBackend;
use burn::train::{ClassificationOutput, TrainOutput, TrainStep, ValidStep};

/// Pretrained feature extractor followed by a small trainable head.
#[derive(Debug, Module)]
pub struct PlantClassifier<B: Backend> {
	backbone: ResNet<B>,
	head: ClassifierHead<B>,
}

impl<B: Backend> PlantClassifier<B> {
	/// Class probabilities, `[N, 3, 224, 224]` -> `[N, num_classes]`.
	pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
		softmax(self.forward_logits(images), 1)
	}

	pub fn forward_logits(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
		let features = self.backbone.forward(images);
		self.head.forward(features)
	}

	pub fn forward_classification(&self, images: Tensor<B, 4>, targets: Tensor<B, 1, Int>) -> ClassificationOutput<B> {
		classification_output(self.forward_logits(images), targets)
	}

	pub fn num_classes(&self) -> usize {
		self.head.fc2.weight.val().dims()[1]
	}
}

fn classification_output<B: Backend>(logits: Tensor<B, 2>, targets: Tensor<B, 1, Int>) -> ClassificationOutput<B> {
	let loss = CrossEntropyLossConfig::new().init(&logits.device())
		.forward(logits.clone(), targets.clone());

	ClassificationOutput::new(loss, logits, targets)
}

impl<B: AutodiffBackend> TrainStep<PlantBatch<B>, ClassificationOutput<B>> for PlantClassifier<B> {
	fn step(&self, batch: PlantBatch<B>) -> TrainOutput<ClassificationOutput<B>> {
		// Frozen backbone: it runs on the inner backend, so no gradient reaches it
		// and its batch norm layers keep their running statistics.
		let features = self.backbone.valid().forward(batch.images.inner());
		let logits = self.head.forward(Tensor::from_inner(features));

		let item = classification_output(logits, batch.targets);

		TrainOutput::new(self, item.loss.backward(), item)
	}
}

impl<B: Backend> ValidStep<PlantBatch<B>, ClassificationOutput<B>> for PlantClassifier<B> {
	fn step(&self, batch: PlantBatch<B>) -> ClassificationOutput<B> {
		self.forward_classification(batch.images, batch.targets)
	}
}

#[derive(Debug, Module)]
pub struct ClassifierHead<B: Backend> {
	dropout: Dropout,
	fc1: Linear<B>,
	activation: Relu,
	fc2: Linear<B>,
}

impl<B: Backend> ClassifierHead<B> {
	pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
		let x = self.dropout.forward(features);
		let x = self.fc1.forward(x);
		let x = self.activation.forward(x);
		let x = self.dropout.forward(x);

		self.fc2.forward(x)
	}
}

#[derive(Debug, Config)]
pub struct PlantClassifierConfig {
	pub num_classes: usize,
	#[config(default = 512)]
	pub hidden_size: usize,
	#[config(default = 0.3)]
	pub dropout: f64,
}

impl PlantClassifierConfig {
	/// Randomly initialized backbone and head.
	pub fn init<B: Backend>(&self, device: &B::Device) -> PlantClassifier<B> {
		PlantClassifier {
			backbone: ResNet::resnet18(device),
			head: self.init_head(device),
		}
	}

	/// Backbone from a pretrained record, fresh head.
	pub fn init_with_backbone<B: Backend>(&self, backbone: ResNetRecord<B>, device: &B::Device) -> PlantClassifier<B> {
		PlantClassifier {
			backbone: ResNet::resnet18(device).load_record(backbone),
			head: self.init_head(device),
		}
	}

	fn init_head<B: Backend>(&self, device: &B::Device) -> ClassifierHead<B> {
		ClassifierHead {
			dropout: DropoutConfig::new(self.dropout).init(),
			fc1: LinearConfig::new(FEATURES, self.hidden_size).init(device),
			activation: Relu::new(),
			fc2: LinearConfig::new(self.hidden_size, self.num_classes).init(device),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use burn::backend::NdArray;

	#[test]
	fn head_width_follows_config() {
		let device = Default::default();
		let model = PlantClassifierConfig::new(10).init::<NdArray>(&device);
		assert_eq!(model.num_classes(), 10);

		let logits = model.head.forward(Tensor::ones([3, FEATURES], &device));
		assert_eq!(logits.dims(), [3, 10]);
	}

	#[test]
	fn forward_yields_distribution() {
		let device = Default::default();
		let model = PlantClassifierConfig::new(4).init::<NdArray>(&device);

		let probabilities = model.forward(Tensor::zeros([1, 3, 64, 64], &device));
		assert_eq!(probabilities.dims(), [1, 4]);

		let values = probabilities.into_data().to_vec::<f32>().unwrap();
		let sum: f32 = values.iter().sum();
		assert!((sum - 1.0).abs() < 1e-4, "{values:?}");
		assert!(values.iter().all(|p| (0.0..=1.0).contains(p)));
	}
}
