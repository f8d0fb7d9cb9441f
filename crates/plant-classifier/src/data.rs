use crate::preprocess::ImageTensor;
use burn::data::dataloader::batcher::Batcher;
use burn::prelude::{Backend, ElementConversion, Int};
use burn::tensor::{Tensor, TensorData};

/// A preprocessed image and the index of its label in the catalog.
#[derive(Debug, Clone)]
pub struct LabeledImage {
	pub image: ImageTensor,
	pub label: usize,
}

#[derive(Debug, Clone)]
pub struct PlantBatch<B: Backend> {
	/// `[N, 3, 224, 224]`
	pub images: Tensor<B, 4>,
	pub targets: Tensor<B, 1, Int>,
}

#[derive(Clone)]
pub struct PlantBatcher<B: Backend> {
	device: B::Device,
}

impl<B: Backend> PlantBatcher<B> {
	pub fn new(device: B::Device) -> Self {
		Self { device }
	}
}

impl<B: Backend> Batcher<LabeledImage, PlantBatch<B>> for PlantBatcher<B> {
	fn batch(&self, items: Vec<LabeledImage>) -> PlantBatch<B> {
		let images = items
			.iter()
			.map(|item| item.image.to_tensor::<B>(&self.device))
			.collect();

		let targets = items
			.iter()
			.map(|item| {
				Tensor::<B, 1, Int>::from_data(
					TensorData::from([(item.label as i64).elem::<B::IntElem>()]),
					&self.device,
				)
			})
			.collect();

		PlantBatch {
			images: Tensor::cat(images, 0),
			targets: Tensor::cat(targets, 0),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::preprocess::preprocess_rgb;
	use burn::backend::NdArray;
	use image::{Rgb, RgbImage};

	#[test]
	fn batches_stack_along_first_dim() {
		let image = preprocess_rgb(&RgbImage::from_pixel(8, 8, Rgb([10, 20, 30]))).unwrap();
		let items = vec![
			LabeledImage { image: image.clone(), label: 3 },
			LabeledImage { image, label: 7 },
		];

		let batch = PlantBatcher::<NdArray>::new(Default::default()).batch(items);

		assert_eq!(batch.images.dims(), [2, 3, 224, 224]);
		assert_eq!(batch.targets.into_data().to_vec::<i64>().unwrap(), vec![3, 7]);
	}
}
