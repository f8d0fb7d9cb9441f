use crate::error::PreprocessError;
use burn::prelude::{Backend, Tensor, TensorData};
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};
use log::debug;
use std::path::Path;

pub const SIDE: usize = 224;
pub const CHANNELS: usize = 3;
/// `[N, H, W, C]` of a single preprocessed image.
pub const INPUT_SHAPE: [usize; 4] = [1, SIDE, SIDE, CHANNELS];

/// Pixels of one image, `[1, 224, 224, 3]` in row-major NHWC order, RGB, in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
	data: Vec<f32>,
	shape: [usize; 4],
}

impl ImageTensor {
	pub fn new(data: Vec<f32>, shape: [usize; 4]) -> Result<Self, PreprocessError> {
		let expected = shape.iter().product();
		if data.len() != expected {
			return Err(PreprocessError::Shape { shape, expected, actual: data.len() });
		}

		Ok(Self { data, shape })
	}

	pub fn shape(&self) -> [usize; 4] {
		self.shape
	}

	pub fn data(&self) -> &[f32] {
		&self.data
	}

	/// Converts to the `[N, C, H, W]` layout burn convolutions expect.
	pub fn to_tensor<B: Backend>(&self, device: &B::Device) -> Tensor<B, 4> {
		let data = TensorData::new(self.data.clone(), self.shape).convert::<B::FloatElem>();

		Tensor::<B, 4>::from_data(data, device)
			// [N, H, W, C] -> [N, C, H, W]
			.permute([0, 3, 1, 2])
	}
}

/// Decodes, converts to RGB, resizes to 224x224 and scales to `[0, 1]`.
pub fn preprocess<P: AsRef<Path>>(path: P) -> Result<ImageTensor, PreprocessError> {
	let image = decode(path)?;
	preprocess_rgb(&image.into_rgb8())
}

pub fn decode<P: AsRef<Path>>(path: P) -> Result<DynamicImage, PreprocessError> {
	let path = path.as_ref();
	let image = image::open(path).map_err(|source| PreprocessError::Decode {
		path: path.to_path_buf(),
		source,
	})?;

	debug!("Decoded {:?}: {}x{} {:?}", path, image.width(), image.height(), image.color());
	Ok(image)
}

/// Steps after decoding. The aspect ratio is not preserved.
pub fn preprocess_rgb(image: &RgbImage) -> Result<ImageTensor, PreprocessError> {
	if image.width() == 0 || image.height() == 0 {
		return Err(PreprocessError::EmptyImage);
	}

	// Triangle is bilinear in 2D
	let resized = imageops::resize(image, SIDE as u32, SIDE as u32, FilterType::Triangle);
	let data = resized.into_raw().into_iter().map(|x| (x as f32) / 255.0).collect();

	ImageTensor::new(data, INPUT_SHAPE)
}
