use crate::catalog::{Catalog, Pesticide};
use crate::error::PredictError;
use log::debug;
use serde::Serialize;

/// One answer, as printed by the predictor binaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
	pub detected_class: String,
	pub confidence: f32,
	pub description: &'static str,
	pub treatment: &'static str,
	pub pesticide: Pesticide,
}

/// Index and value of the largest probability. Ties keep the first index.
pub fn argmax(probabilities: &[f32]) -> Option<(usize, f32)> {
	probabilities
		.iter()
		.copied()
		.enumerate()
		.fold(None, |best, (i, p)| match best {
			Some((_, top)) if p <= top => best,
			_ => Some((i, p)),
		})
}

pub fn compose(catalog: &Catalog, probabilities: &[f32]) -> Result<Prediction, PredictError> {
	if probabilities.len() != catalog.num_classes() {
		return Err(PredictError::Inference(format!(
			"Model produced {} probabilities for {} {} labels",
			probabilities.len(),
			catalog.num_classes(),
			catalog.kind(),
		)));
	}

	if probabilities.iter().any(|p| p.is_nan()) {
		return Err(PredictError::Inference("Model produced NaN probabilities".to_string()));
	}

	let (index, confidence) = argmax(probabilities)
		.ok_or_else(|| PredictError::Inference("Model produced no probabilities".to_string()))?;
	let label = catalog
		.label(index)
		.ok_or_else(|| PredictError::Inference(format!("No label at index {index}")))?;

	debug!("Selected {label} (index {index}) with confidence {confidence}");

	let advisory = catalog.advisory(label);

	Ok(Prediction {
		detected_class: catalog.display_label(label),
		confidence,
		description: advisory.description,
		treatment: advisory.treatment,
		pesticide: advisory.pesticide,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::catalog::AdvisoryRecord;

	fn one_hot(catalog: &Catalog, label: &str, confidence: f32) -> Vec<f32> {
		let mut probabilities = vec![0.0; catalog.num_classes()];
		probabilities[catalog.index_of(label).unwrap()] = confidence;
		probabilities
	}

	#[test]
	fn argmax_picks_largest() {
		assert_eq!(argmax(&[0.1, 0.7, 0.2]), Some((1, 0.7)));
		assert_eq!(argmax(&[0.9]), Some((0, 0.9)));
		assert_eq!(argmax(&[]), None);
	}

	#[test]
	fn argmax_ties_keep_first() {
		assert_eq!(argmax(&[0.2, 0.4, 0.4]), Some((1, 0.4)));
		assert_eq!(argmax(&[0.25, 0.25, 0.25, 0.25]), Some((0, 0.25)));
	}

	#[test]
	fn wrong_length_is_an_inference_error() {
		let catalog = Catalog::pest();

		for len in [0, 3, 9, 11, 38] {
			let err = compose(&catalog, &vec![0.1; len]).unwrap_err();
			assert!(matches!(err, PredictError::Inference(_)), "{len}: {err:?}");
		}
	}

	#[test]
	fn nan_is_an_inference_error() {
		let catalog = Catalog::pest();
		let mut probabilities = vec![0.1; 10];
		probabilities[4] = f32::NAN;

		assert!(matches!(compose(&catalog, &probabilities), Err(PredictError::Inference(_))));
	}

	#[test]
	fn confidence_is_reported_as_is() {
		let catalog = Catalog::pest();
		let mut probabilities = vec![0.01; 10];
		probabilities[1] = 0.7;

		let prediction = compose(&catalog, &probabilities).unwrap();
		assert_eq!(prediction.detected_class, "ARMYWORM");
		assert_eq!(prediction.confidence, 0.7);
	}

	#[test]
	fn disease_with_table_entry() {
		let catalog = Catalog::disease();
		let prediction = compose(&catalog, &one_hot(&catalog, "Tomato_Late_blight", 0.93)).unwrap();

		assert_eq!(prediction.detected_class, "Tomato_Late_blight");
		assert_eq!(prediction.description, "Devastating fungal disease causing water-soaked lesions");
		assert_eq!(prediction.pesticide.name, "Metalaxyl");
		assert_eq!(prediction.pesticide.dosage, "2-3 g/L");
	}

	#[test]
	fn healthy_tomato_needs_no_treatment() {
		let tampered = AdvisoryRecord {
			description: "Tomato is sick",
			treatment: "Spray",
			pesticide: Pesticide { name: "Captan", dosage: "2-3 g/L", category: "Fungicide" },
		};
		let catalog = Catalog::disease().with_advisory("Tomato_healthy", tampered);

		let prediction = compose(&catalog, &one_hot(&catalog, "Tomato_healthy", 0.99)).unwrap();
		assert_eq!(prediction.detected_class, "Tomato_healthy");
		assert_eq!(prediction.description, "Plant appears healthy");
		assert_eq!(prediction.treatment, "Continue regular care and monitoring");
		assert_eq!(prediction.pesticide, Pesticide { name: "No treatment needed", dosage: "N/A", category: "N/A" });
	}

	#[test]
	fn label_without_entry_gets_fallback() {
		let catalog = Catalog::disease();
		let prediction = compose(&catalog, &one_hot(&catalog, "Orange_Haunglongbing", 0.5)).unwrap();

		assert_eq!(prediction.description, "Disease detected");
		assert_eq!(prediction.treatment, "Consult agricultural expert for treatment");
		assert_eq!(prediction.pesticide.name, "General Fungicide");
	}

	#[test]
	fn pest_label_is_formatted_but_looked_up_raw() {
		let catalog = Catalog::pest();
		let prediction = compose(&catalog, &one_hot(&catalog, "stem_borer", 0.8)).unwrap();

		assert_eq!(prediction.detected_class, "STEM BORER");
		assert_eq!(prediction.description, "Caterpillars that bore into plant stems causing wilting");
		assert_eq!(prediction.pesticide.category, "Systemic Insecticide");
	}

	#[test]
	fn serializes_pesticide_category_as_type() {
		let catalog = Catalog::pest();
		let prediction = compose(&catalog, &one_hot(&catalog, "mites", 0.5)).unwrap();
		let json = serde_json::to_value(&prediction).unwrap();

		assert_eq!(json["detected_class"], "MITES");
		assert_eq!(json["confidence"], 0.5);
		assert_eq!(json["pesticide"]["type"], "Acaricide");
		assert_eq!(json["pesticide"]["name"], "Abamectin");
		assert_eq!(json["pesticide"]["dosage"], "1-2 ml/L");
		assert!(json["pesticide"].get("category").is_none());
	}
}
