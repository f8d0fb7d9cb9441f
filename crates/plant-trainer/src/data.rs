//! Image folder datasets: `<root>/<label>/<image>`, one folder per catalog label.

use crate::error::TrainError;
use burn::data::dataset::Dataset;
use image::{imageops, RgbImage};
use log::{info, warn};
use plant_classifier::data::LabeledImage;
use plant_classifier::preprocess::{decode, preprocess_rgb};
use plant_classifier::Catalog;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng, SeedableRng};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

const EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "bmp", "tif", "tiff"];

#[derive(Debug, Clone)]
pub struct PlantImageDataset {
	items: Vec<(PathBuf, usize)>,
	augment: bool,
}

impl PlantImageDataset {
	/// Collects every decodable image under folders named after `catalog` labels.
	pub fn scan<A: AsRef<Path>>(root: A, catalog: &Catalog) -> Result<Self, TrainError> {
		let root = root.as_ref();
		let mut candidates = Vec::new();

		for entry in root.read_dir()? {
			let path = entry?.path();
			if !path.is_dir() {
				continue;
			}

			let name = path.file_name().and_then(|name| name.to_str()).unwrap_or_default();
			let Some(label) = catalog.index_of(name) else {
				warn!("Skipping {:?}: not a {} label", path, catalog.kind());
				continue;
			};

			for file in path.read_dir()? {
				let file = file?.path();
				if has_image_extension(&file) {
					candidates.push((file, label));
				}
			}
		}

		// Full decode up front: the dataloader stops at the first item `get` cannot produce
		let mut items: Vec<(PathBuf, usize)> = candidates
			.into_par_iter()
			.filter(|(path, _)| match decode(path) {
				Ok(image) if image.width() > 0 && image.height() > 0 => true,
				Ok(_) => {
					warn!("Skipping empty image {:?}", path);
					false
				}
				Err(err) => {
					warn!("Skipping {err}");
					false
				}
			})
			.collect();

		if items.is_empty() {
			return Err(TrainError::EmptyDataset { path: root.to_path_buf(), kind: catalog.kind() });
		}

		// read_dir order is platform dependent
		items.sort();
		info!("Found {} images in {:?}", items.len(), root);

		Ok(Self { items, augment: false })
	}

	/// Seeded shuffle, then `(train, valid)` with `valid_fraction` of the items
	/// in the second half. Only the training half is augmented.
	pub fn split(mut self, valid_fraction: f64, seed: u64) -> (Self, Self) {
		self.items.shuffle(&mut StdRng::seed_from_u64(seed));

		let num_valid = (self.items.len() as f64 * valid_fraction).round() as usize;
		let valid = self.items.split_off(self.items.len() - num_valid.min(self.items.len()));

		(
			Self { items: self.items, augment: true },
			Self { items: valid, augment: false },
		)
	}

	pub fn labels(&self) -> impl Iterator<Item = usize> + '_ {
		self.items.iter().map(|(_, label)| *label)
	}
}

impl Dataset<LabeledImage> for PlantImageDataset {
	fn get(&self, index: usize) -> Option<LabeledImage> {
		let (path, label) = self.items.get(index)?;

		let image = match decode(path) {
			Ok(image) => image.into_rgb8(),
			Err(err) => {
				warn!("{err}");
				return None;
			}
		};

		let image = if self.augment { augment(image, &mut thread_rng()) } else { image };

		preprocess_rgb(&image)
			.map(|image| LabeledImage { image, label: *label })
			.map_err(|err| warn!("{:?}: {err}", path))
			.ok()
	}

	fn len(&self) -> usize {
		self.items.len()
	}
}

fn has_image_extension(path: &Path) -> bool {
	path.extension()
		.and_then(|ext| ext.to_str())
		.is_some_and(|ext| EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Random zoom/shift (crop keeping 80-100% of each side) and horizontal flip.
pub fn augment<R: Rng>(image: RgbImage, rng: &mut R) -> RgbImage {
	let (width, height) = image.dimensions();
	if width == 0 || height == 0 {
		return image;
	}

	let scale: f32 = rng.gen_range(0.8..=1.0);
	let crop_width = ((width as f32 * scale) as u32).clamp(1, width);
	let crop_height = ((height as f32 * scale) as u32).clamp(1, height);
	let x = rng.gen_range(0..=width - crop_width);
	let y = rng.gen_range(0..=height - crop_height);

	let mut out = imageops::crop_imm(&image, x, y, crop_width, crop_height).to_image();
	if rng.gen_bool(0.5) {
		imageops::flip_horizontal_in_place(&mut out);
	}

	out
}
