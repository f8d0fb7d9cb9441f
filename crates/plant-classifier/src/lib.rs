//! Plant disease and pest classification.
//!
//! A photo goes through [`preprocess`](preprocess::preprocess), one forward pass of a
//! [`PlantClassifier`](model::PlantClassifier), and [`compose`](compose::compose), which
//! picks the most likely label and attaches the matching advice from a [`Catalog`](catalog::Catalog).

pub mod catalog;
pub mod cli;
pub mod compose;
pub mod data;
pub mod error;
pub mod inference;
pub mod model;
pub mod predictor;
pub mod preprocess;

pub use catalog::{Catalog, CatalogKind};
pub use compose::Prediction;
pub use error::{PredictError, PreprocessError};
pub use predictor::Predictor;
