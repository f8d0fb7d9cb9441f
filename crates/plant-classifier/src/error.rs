use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreprocessError {
	#[error("Could not load image {path:?}: {source}")]
	Decode {
		path: PathBuf,
		#[source]
		source: image::ImageError,
	},
	#[error("Image has no pixels")]
	EmptyImage,
	#[error("Expected {expected} values for shape {shape:?}, got {actual}")]
	Shape {
		shape: [usize; 4],
		expected: usize,
		actual: usize,
	},
}

#[derive(Debug, Error)]
pub enum PredictError {
	#[error("Model file not found: {}", .0.display())]
	ModelNotFound(PathBuf),
	#[error("Error loading model {}: {reason}", path.display())]
	ModelLoadFailed {
		path: PathBuf,
		reason: String,
	},
	#[error("Error preprocessing image: {0}")]
	Preprocessing(#[from] PreprocessError),
	#[error("Inference error: {0}")]
	Inference(String),
	#[error("{0}")]
	Usage(String),
}
