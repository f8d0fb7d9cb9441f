use crate::catalog::{Catalog, CatalogKind};
use crate::compose::{compose, Prediction};
use crate::error::PredictError;
use crate::inference::{BurnClassifier, Classifier};
use crate::preprocess::preprocess;
use burn::backend::NdArray;
use log::debug;
use std::path::Path;

pub type InferenceBackend = NdArray;

/// Owns everything one domain needs to answer requests: the label list and
/// advisory table, plus a model loaded once and reused for every image.
///
/// Requests are served one at a time through `&self`. Callers sharing one
/// predictor between threads should put it behind a `Mutex`.
pub struct Predictor<C: Classifier> {
	catalog: Catalog,
	classifier: C,
}

impl Predictor<BurnClassifier<InferenceBackend>> {
	/// Loads the model at `model_path` on the CPU backend.
	pub fn load<P: AsRef<Path>>(kind: CatalogKind, model_path: P) -> Result<Self, PredictError> {
		let catalog = Catalog::new(kind);
		let classifier = BurnClassifier::load(model_path, catalog.num_classes(), Default::default())?;

		Ok(Self::new(catalog, classifier))
	}
}

impl<C: Classifier> Predictor<C> {
	pub fn new(catalog: Catalog, classifier: C) -> Self {
		Self { catalog, classifier }
	}

	pub fn predict<P: AsRef<Path>>(&self, image_path: P) -> Result<Prediction, PredictError> {
		let image_path = image_path.as_ref();
		debug!("Predicting {} for {:?}", self.catalog.kind(), image_path);

		let image = preprocess(image_path)?;
		let probabilities = self.classifier.classify(&image)?;

		compose(&self.catalog, &probabilities)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::PreprocessError;
	use crate::preprocess::{ImageTensor, INPUT_SHAPE};
	use image::{Rgb, RgbImage};
	use std::cell::RefCell;

	/// Returns a canned vector and remembers what it was shown.
	struct Canned {
		probabilities: Vec<f32>,
		seen: RefCell<Vec<[usize; 4]>>,
	}

	impl Canned {
		fn new(probabilities: Vec<f32>) -> Self {
			Self { probabilities, seen: RefCell::new(Vec::new()) }
		}
	}

	impl Classifier for Canned {
		fn classify(&self, image: &ImageTensor) -> Result<Vec<f32>, PredictError> {
			self.seen.borrow_mut().push(image.shape());
			Ok(self.probabilities.clone())
		}
	}

	struct Failing;

	impl Classifier for Failing {
		fn classify(&self, _image: &ImageTensor) -> Result<Vec<f32>, PredictError> {
			Err(PredictError::Inference("backend exploded".to_string()))
		}
	}

	fn leaf(dir: &Path) -> std::path::PathBuf {
		let path = dir.join("leaf.jpg");
		RgbImage::from_pixel(640, 360, Rgb([30, 140, 50])).save(&path).unwrap();
		path
	}

	#[test]
	fn predicts_through_whole_pipeline() {
		let dir = tempfile::tempdir().unwrap();
		let image = leaf(dir.path());

		let mut probabilities = vec![0.0; 10];
		probabilities[0] = 0.6;
		probabilities[9] = 0.4;
		let predictor = Predictor::new(Catalog::pest(), Canned::new(probabilities));

		let prediction = predictor.predict(&image).unwrap();
		assert_eq!(prediction.detected_class, "APHIDS");
		assert_eq!(prediction.confidence, 0.6);
		assert_eq!(prediction.pesticide.name, "Imidacloprid");

		// the model is reused across requests
		predictor.predict(&image).unwrap();
		assert_eq!(*predictor.classifier.seen.borrow(), vec![INPUT_SHAPE; 2]);
	}

	#[test]
	fn unreadable_image_is_a_preprocessing_error() {
		let dir = tempfile::tempdir().unwrap();
		let predictor = Predictor::new(Catalog::disease(), Canned::new(vec![1.0; 38]));

		let err = predictor.predict(dir.path().join("missing.jpg")).unwrap_err();
		assert!(matches!(err, PredictError::Preprocessing(PreprocessError::Decode { .. })), "{err:?}");
		assert!(err.to_string().starts_with("Error preprocessing image: "), "{err}");
		assert!(predictor.classifier.seen.borrow().is_empty());
	}

	#[test]
	fn mismatched_model_output_is_rejected() {
		let dir = tempfile::tempdir().unwrap();
		let predictor = Predictor::new(Catalog::disease(), Canned::new(vec![0.1; 10]));

		let err = predictor.predict(leaf(dir.path())).unwrap_err();
		assert!(matches!(err, PredictError::Inference(_)), "{err:?}");
	}

	#[test]
	fn classifier_failures_propagate() {
		let dir = tempfile::tempdir().unwrap();
		let predictor = Predictor::new(Catalog::disease(), Failing);

		let err = predictor.predict(leaf(dir.path())).unwrap_err();
		assert_eq!(err.to_string(), "Inference error: backend exploded");
	}

	#[test]
	fn missing_model_fails_before_any_request() {
		let dir = tempfile::tempdir().unwrap();
		let err = Predictor::load(CatalogKind::Disease, dir.path().join("disease_model.mpk")).err().unwrap();
		assert!(err.to_string().contains("Model file not found"), "{err}");
	}
}
