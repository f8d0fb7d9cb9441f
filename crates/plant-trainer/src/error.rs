use plant_classifier::CatalogKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrainError {
	#[error("Dataset not found at {path:?}. Download the {kind} dataset from {url} and extract it there")]
	DatasetNotFound {
		path: PathBuf,
		kind: CatalogKind,
		url: &'static str,
	},
	#[error("No usable images for any {kind} label under {path:?}")]
	EmptyDataset {
		path: PathBuf,
		kind: CatalogKind,
	},
	#[error("Std IO error: {0}")]
	StdIoError(#[from] std::io::Error),
	#[error("Could not load backbone weights: {0}")]
	Weights(String),
	#[error("Could not save model: {0}")]
	Recorder(String),
	#[error("Device unavailable: {0}")]
	Device(String),
}
