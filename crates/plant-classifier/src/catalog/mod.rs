//! Label sets and advisory tables for the two classification domains.
//!
//! A [`Catalog`] pairs the ordered label list a model was trained against with
//! the static advice shown for each label. Lookups never fail: labels without
//! an entry get the domain's generic fallback record.

mod disease;
mod pest;

use clap::ValueEnum;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, ValueEnum)]
pub enum CatalogKind {
	Disease,
	Pest,
}

impl CatalogKind {
	pub fn name(&self) -> &'static str {
		match self {
			CatalogKind::Disease => "disease",
			CatalogKind::Pest => "pest",
		}
	}

	/// File name the trainer writes and the predictors expect by convention.
	pub fn model_file_name(&self) -> String {
		format!("{}_model.mpk", self.name())
	}
}

impl fmt::Display for CatalogKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Pesticide {
	pub name: &'static str,
	pub dosage: &'static str,
	#[serde(rename = "type")]
	pub category: &'static str,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AdvisoryRecord {
	pub description: &'static str,
	pub treatment: &'static str,
	pub pesticide: Pesticide,
}

#[derive(Debug, Clone)]
pub struct Catalog {
	kind: CatalogKind,
	labels: Vec<&'static str>,
	advisories: HashMap<&'static str, AdvisoryRecord>,
	fallback: AdvisoryRecord,
}

impl Catalog {
	pub fn new(kind: CatalogKind) -> Self {
		match kind {
			CatalogKind::Disease => Self::disease(),
			CatalogKind::Pest => Self::pest(),
		}
	}

	pub fn disease() -> Self {
		Self {
			kind: CatalogKind::Disease,
			labels: disease::LABELS.to_vec(),
			advisories: disease::ADVISORIES.into_iter().collect(),
			fallback: disease::FALLBACK,
		}
	}

	pub fn pest() -> Self {
		Self {
			kind: CatalogKind::Pest,
			labels: pest::LABELS.to_vec(),
			advisories: pest::ADVISORIES.into_iter().collect(),
			fallback: pest::FALLBACK,
		}
	}

	/// Adds or replaces the table entry for `label`.
	#[cfg(test)]
	pub(crate) fn with_advisory(mut self, label: &'static str, record: AdvisoryRecord) -> Self {
		self.advisories.insert(label, record);
		self
	}

	pub fn kind(&self) -> CatalogKind {
		self.kind
	}

	pub fn labels(&self) -> &[&'static str] {
		&self.labels
	}

	pub fn num_classes(&self) -> usize {
		self.labels.len()
	}

	pub fn label(&self, index: usize) -> Option<&'static str> {
		self.labels.get(index).copied()
	}

	pub fn index_of(&self, label: &str) -> Option<usize> {
		self.labels.iter().position(|l| *l == label)
	}

	/// Advice for `label`, after the domain rules are applied.
	///
	/// Disease labels containing "healthy" (any case) always get the fixed
	/// healthy record, even when the table has an entry for them.
	pub fn advisory(&self, label: &str) -> AdvisoryRecord {
		if self.kind == CatalogKind::Disease && label.to_lowercase().contains("healthy") {
			return disease::HEALTHY;
		}

		self.advisories.get(label).copied().unwrap_or(self.fallback)
	}

	/// How `label` is shown in a response. Lookups keep using the raw label.
	pub fn display_label(&self, label: &str) -> String {
		match self.kind {
			CatalogKind::Disease => label.to_string(),
			CatalogKind::Pest => label.to_uppercase().replace('_', " "),
		}
	}
}
