use crate::error::PredictError;
use crate::model::{PlantClassifier, PlantClassifierConfig};
use crate::preprocess::ImageTensor;
use burn::module::Module;
use burn::prelude::Backend;
use burn::record::{HalfPrecisionSettings, NamedMpkBytesRecorder, Recorder};
use log::{debug, info};
use std::path::Path;

/// Anything that turns one preprocessed image into a probability vector.
pub trait Classifier {
	fn classify(&self, image: &ImageTensor) -> Result<Vec<f32>, PredictError>;
}

/// Reads a trained classifier saved with burn's `CompactRecorder`.
///
/// The file is read as given. Burn's file recorders would swap the extension
/// for `.mpk`, so the bytes are decoded with the matching in-memory recorder.
///
/// The head is sized for `num_classes`; the stored record decides the actual
/// weights, so a model trained for a different label set still loads and is
/// caught later when its output length is checked.
pub fn load_model<B: Backend, P: AsRef<Path>>(path: P, num_classes: usize, device: &B::Device) -> Result<PlantClassifier<B>, PredictError> {
	let path = path.as_ref();
	if !path.is_file() {
		return Err(PredictError::ModelNotFound(path.to_path_buf()));
	}

	let load_failed = |reason: String| PredictError::ModelLoadFailed {
		path: path.to_path_buf(),
		reason,
	};

	let bytes = std::fs::read(path).map_err(|err| load_failed(err.to_string()))?;
	let record = Recorder::<B>::load(&NamedMpkBytesRecorder::<HalfPrecisionSettings>::default(), bytes, device)
		.map_err(|err| load_failed(format!("{err:?}")))?;

	let model = PlantClassifierConfig::new(num_classes)
		.init::<B>(device)
		.load_record(record);

	info!("Loaded model from {:?}", path);
	Ok(model)
}

pub struct BurnClassifier<B: Backend> {
	model: PlantClassifier<B>,
	device: B::Device,
}

impl<B: Backend> BurnClassifier<B> {
	pub fn new(model: PlantClassifier<B>, device: B::Device) -> Self {
		Self { model, device }
	}

	pub fn load<P: AsRef<Path>>(path: P, num_classes: usize, device: B::Device) -> Result<Self, PredictError> {
		let model = load_model::<B, P>(path, num_classes, &device)?;
		Ok(Self::new(model, device))
	}
}

impl<B: Backend> Classifier for BurnClassifier<B> {
	fn classify(&self, image: &ImageTensor) -> Result<Vec<f32>, PredictError> {
		let input = image.to_tensor::<B>(&self.device);
		let output = self.model.forward(input);
		let [batch, classes] = output.dims();
		debug!("Model output shape [{batch}, {classes}]");

		if batch != 1 {
			return Err(PredictError::Inference(format!("Expected one row of probabilities, got {batch}")));
		}

		output
			.into_data()
			.convert::<f32>()
			.to_vec::<f32>()
			.map_err(|err| PredictError::Inference(format!("Could not read model output: {err:?}")))
	}
}
