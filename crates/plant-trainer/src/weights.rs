use crate::error::TrainError;
use burn::data::network::downloader;
use burn::prelude::{Backend, Device};
use burn::record::{FullPrecisionSettings, Recorder};
use burn_import::pytorch::{LoadArgs, PyTorchFileRecorder};
use log::info;
use plant_classifier::model::ResNetRecord;
use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::PathBuf;

pub struct Weights {
	pub url: &'static str,
}

/// torchvision ResNet-18 trained on ImageNet-1k.
/// Top-1 accuracy: 69.758%.
pub const RESNET18_IMAGENET1K_V1: Weights = Weights {
	url: "https://download.pytorch.org/models/resnet18-f37072fd.pth",
};

impl Weights {
	/// Download into `~/.cache/plant-classifier` unless already cached.
	pub fn download(&self) -> Result<PathBuf, TrainError> {
		let model_dir = dirs::home_dir()
			.ok_or_else(|| TrainError::Weights("Could not find home directory".to_string()))?
			.join(".cache")
			.join("plant-classifier");

		if !model_dir.exists() {
			create_dir_all(&model_dir)?;
		}

		let file_base_name = self
			.url
			.rsplit_once('/')
			.map(|(_, name)| name)
			.ok_or_else(|| TrainError::Weights(format!("Bad weights url {}", self.url)))?;
		let file_name = model_dir.join(file_base_name);

		if !file_name.exists() {
			info!("Downloading {}", self.url);
			let bytes = downloader::download_file_as_bytes(self.url, file_base_name);

			let mut output_file = File::create(&file_name)?;
			output_file.write_all(&bytes)?;
		}

		Ok(file_name)
	}

	/// Backbone record with torchvision keys mapped onto the burn module tree.
	/// The classifier's `fc.*` tensors have no counterpart and are skipped.
	pub fn backbone_record<B: Backend>(&self, device: &Device<B>) -> Result<ResNetRecord<B>, TrainError> {
		let torch_weights = self.download()?;

		let load_args = LoadArgs::new(torch_weights)
			// Map *.downsample.0.* -> *.downsample.conv.*
			.with_key_remap("(.+)\\.downsample\\.0\\.(.+)", "$1.downsample.conv.$2")
			// Map *.downsample.1.* -> *.downsample.bn.*
			.with_key_remap("(.+)\\.downsample\\.1\\.(.+)", "$1.downsample.bn.$2")
			// Map layer[i].[j].* -> layer[i].blocks.[j].*
			.with_key_remap("(layer[1-4])\\.([0-9]+)\\.(.+)", "$1.blocks.$2.$3");

		Recorder::<B>::load(&PyTorchFileRecorder::<FullPrecisionSettings>::new(), load_args, device)
			.map_err(|err| TrainError::Weights(format!("{err:?}")))
	}
}
