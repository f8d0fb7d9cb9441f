//! Shared entry point of the `disease-predictor` and `pest-predictor` binaries.
//!
//! Stdout always carries exactly one JSON object: the prediction, or
//! `{"error": ...}` together with a non-zero exit status. Logs go to stderr.

use crate::catalog::CatalogKind;
use crate::compose::Prediction;
use crate::error::PredictError;
use crate::predictor::Predictor;
use clap::Parser;
use log::{debug, LevelFilter};
use serde_json::json;
use simple_logger::SimpleLogger;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

/// Exactly two positionals, either of which may start with `-`. No help flag.
#[derive(Debug, Parser)]
#[command(disable_help_flag = true)]
struct Args {
	/// Model artifact written by plant-trainer
	#[arg(allow_hyphen_values = true)]
	model_path: PathBuf,
	/// Photo to classify
	#[arg(allow_hyphen_values = true)]
	image_path: PathBuf,
}

pub fn main(kind: CatalogKind, bin_name: &str) -> ExitCode {
	// RUST_LOG overrides the default level
	SimpleLogger::new().with_level(LevelFilter::Warn).env().init().ok();

	let result = run(kind, bin_name, std::env::args_os());
	println!("{}", render(&result));

	match result {
		Ok(_) => ExitCode::SUCCESS,
		Err(_) => ExitCode::FAILURE,
	}
}

pub fn run<I, T>(kind: CatalogKind, bin_name: &str, args: I) -> Result<Prediction, PredictError>
where
	I: IntoIterator<Item = T>,
	T: Into<OsString> + Clone,
{
	let args = Args::try_parse_from(args).map_err(|err| {
		debug!("Rejected arguments: {err}");
		PredictError::Usage(format!("Usage: {bin_name} <model_path> <image_path>"))
	})?;

	let predictor = Predictor::load(kind, &args.model_path)?;
	predictor.predict(&args.image_path)
}

pub fn render(result: &Result<Prediction, PredictError>) -> String {
	let error = |message: String| json!({ "error": message }).to_string();

	match result {
		Ok(prediction) => serde_json::to_string(prediction)
			.unwrap_or_else(|err| error(format!("Could not serialize prediction: {err}"))),
		Err(err) => error(err.to_string()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::catalog::Pesticide;
	use serde_json::Value;

	fn usage_error(args: &[&str]) -> PredictError {
		run(CatalogKind::Pest, "pest-predictor", args.iter().copied()).unwrap_err()
	}

	#[test]
	fn wrong_argument_counts_are_usage_errors() {
		let cases: [&[&str]; 5] = [
			&["pest-predictor"],
			&["pest-predictor", "model.mpk"],
			&["pest-predictor", "model.mpk", "bug.jpg", "extra"],
			&["pest-predictor", "--help"],
			&["pest-predictor", "-h", "-V", "extra"],
		];

		for args in cases {
			let err = usage_error(args);
			assert!(matches!(err, PredictError::Usage(_)), "{args:?}: {err:?}");
			assert_eq!(err.to_string(), "Usage: pest-predictor <model_path> <image_path>");
		}
	}

	#[test]
	fn missing_model_renders_error_object() {
		let dir = tempfile::tempdir().unwrap();
		let model = dir.path().join("pest_model.mpk");
		let model = model.to_str().unwrap();

		let result = run(CatalogKind::Pest, "pest-predictor", ["pest-predictor", model, "bug.jpg"]);
		let json: Value = serde_json::from_str(&render(&result)).unwrap();

		let message = json["error"].as_str().unwrap();
		assert!(message.contains("Model file not found"), "{message}");
		assert_eq!(json.as_object().unwrap().len(), 1);
	}

	#[test]
	fn paths_may_start_with_a_hyphen() {
		let dir = tempfile::tempdir().unwrap();
		let model = dir.path().join("pest_model.mpk");
		let model = model.to_str().unwrap();

		for args in [["pest-predictor", model, "-leaf.jpg"], ["pest-predictor", "-model.mpk", "leaf.jpg"]] {
			let err = run(CatalogKind::Pest, "pest-predictor", args).unwrap_err();
			assert!(matches!(err, PredictError::ModelNotFound(_)), "{args:?}: {err:?}");
		}
	}

	#[test]
	fn prediction_renders_flat_object() {
		let prediction = Prediction {
			detected_class: "Corn_Common_rust".to_string(),
			confidence: 0.25,
			description: "Fungal disease causing small oval rust pustules on leaves",
			treatment: "Apply Chlorothalonil or Propiconazole fungicides",
			pesticide: Pesticide { name: "Chlorothalonil", dosage: "2-3 ml/L", category: "Fungicide" },
		};

		let json: Value = serde_json::from_str(&render(&Ok(prediction))).unwrap();
		assert_eq!(json["detected_class"], "Corn_Common_rust");
		assert_eq!(json["confidence"], 0.25);
		assert_eq!(json["treatment"], "Apply Chlorothalonil or Propiconazole fungicides");
		assert_eq!(json["pesticide"]["type"], "Fungicide");
		assert!(json.get("error").is_none());
	}
}
