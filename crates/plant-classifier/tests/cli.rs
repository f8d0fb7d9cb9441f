use serde_json::Value;
use std::process::{Command, Output};

fn run(bin: &str, args: &[&str]) -> Output {
	Command::new(bin)
		.args(args)
		.env_remove("RUST_LOG")
		.output()
		.expect("binary should start")
}

fn stdout_json(output: &Output) -> Value {
	let stdout = String::from_utf8_lossy(&output.stdout);
	assert_eq!(stdout.lines().count(), 1, "stdout: {stdout}");
	serde_json::from_str(stdout.trim()).expect("stdout should be one JSON object")
}

#[test]
fn disease_predictor_rejects_wrong_argument_counts() {
	let bin = env!("CARGO_BIN_EXE_disease-predictor");

	for args in [&[][..], &["model.h5"][..], &["a", "b", "c"][..], &["a", "b", "c", "d"][..]] {
		let output = run(bin, args);
		assert!(!output.status.success(), "{args:?}");

		let json = stdout_json(&output);
		assert_eq!(json["error"], "Usage: disease-predictor <model_path> <image_path>");
	}
}

#[test]
fn pest_predictor_rejects_wrong_argument_counts() {
	let output = run(env!("CARGO_BIN_EXE_pest-predictor"), &["only-one"]);

	assert!(!output.status.success());
	assert_eq!(stdout_json(&output)["error"], "Usage: pest-predictor <model_path> <image_path>");
}

#[test]
fn missing_model_is_reported_as_json() {
	let dir = tempfile::tempdir().unwrap();
	let model = dir.path().join("does_not_exist.mpk");
	let image = dir.path().join("leaf.jpg");

	for bin in [env!("CARGO_BIN_EXE_disease-predictor"), env!("CARGO_BIN_EXE_pest-predictor")] {
		let output = run(bin, &[model.to_str().unwrap(), image.to_str().unwrap()]);
		assert!(!output.status.success());

		let json = stdout_json(&output);
		let message = json["error"].as_str().unwrap();
		assert!(message.contains("Model file not found"), "{message}");
	}
}

#[test]
fn corrupt_model_is_reported_as_json() {
	let dir = tempfile::tempdir().unwrap();
	let model = dir.path().join("disease_model.mpk");
	std::fs::write(&model, b"garbage").unwrap();

	let output = run(env!("CARGO_BIN_EXE_disease-predictor"), &[model.to_str().unwrap(), "leaf.jpg"]);
	assert!(!output.status.success());

	let message = stdout_json(&output)["error"].as_str().unwrap().to_string();
	assert!(message.starts_with("Error loading model"), "{message}");
}
