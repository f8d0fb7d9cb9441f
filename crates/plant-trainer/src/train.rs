use crate::data::PlantImageDataset;
use crate::error::TrainError;
use crate::weights::RESNET18_IMAGENET1K_V1;
use burn::config::Config;
use burn::data::dataloader::DataLoaderBuilder;
use burn::data::dataset::Dataset;
use burn::module::Module;
use burn::optim::AdamConfig;
use burn::prelude::Backend;
use burn::record::CompactRecorder;
use burn::tensor::backend::AutodiffBackend;
use burn::train::metric::store::{Aggregate, Direction, Split};
use burn::train::metric::{AccuracyMetric, CpuUse, LossMetric};
use burn::train::checkpoint::MetricCheckpointingStrategy;
use burn::train::{LearnerBuilder, MetricEarlyStoppingStrategy, StoppingCondition};
use log::{debug, info};
use plant_classifier::data::PlantBatcher;
use plant_classifier::model::PlantClassifierConfig;
use plant_classifier::{Catalog, CatalogKind};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Config)]
pub struct TrainingConfig {
	pub model: PlantClassifierConfig,
	pub optimizer: AdamConfig,
	#[config(default = 50)]
	pub num_epochs: usize,
	#[config(default = 32)]
	pub batch_size: usize,
	#[config(default = 4)]
	pub num_workers: usize,
	#[config(default = 42)]
	pub seed: u64,
	#[config(default = 1e-3)]
	pub learning_rate: f64,
	#[config(default = 0.2)]
	pub valid_fraction: f64,
	/// Epochs without a lower validation loss before stopping
	#[config(default = 10)]
	pub patience: usize,
}

impl TrainingConfig {
	pub fn for_kind(kind: CatalogKind) -> Self {
		Self::new(
			PlantClassifierConfig::new(Catalog::new(kind).num_classes()),
			AdamConfig::new(),
		)
	}
}

/// Where each dataset is expected by default, and where to get it.
pub fn dataset_source(kind: CatalogKind) -> (PathBuf, &'static str) {
	match kind {
		CatalogKind::Disease => (
			PathBuf::from("datasets/plant_disease/train"),
			"https://www.kaggle.com/datasets/vipoooool/new-plant-diseases-dataset",
		),
		CatalogKind::Pest => (
			PathBuf::from("datasets/pest/train"),
			"https://www.kaggle.com/datasets/rtlmhjbn/ip02-dataset",
		),
	}
}

/// Transfer-learns a classifier for `kind` and returns the path of the saved model.
pub fn train_run<B: AutodiffBackend>(
	kind: CatalogKind,
	data_dir: &Path,
	artifact_dir: &Path,
	config: TrainingConfig,
	device: B::Device,
) -> Result<PathBuf, TrainError> {
	if !data_dir.is_dir() {
		let (_, url) = dataset_source(kind);
		return Err(TrainError::DatasetNotFound { path: data_dir.to_path_buf(), kind, url });
	}

	let catalog = Catalog::new(kind);
	let (dataset_train, dataset_valid) = PlantImageDataset::scan(data_dir, &catalog)?
		.split(config.valid_fraction, config.seed);

	info!("Training {kind} model on {} classes", catalog.num_classes());
	info!("Train Dataset Size: {}", dataset_train.len());
	info!("Valid Dataset Size: {}", dataset_valid.len());

	let mut counts = vec![0usize; catalog.num_classes()];
	dataset_train.labels().for_each(|label| counts[label] += 1);
	for (label, count) in catalog.labels().iter().zip(counts) {
		debug!("{label}: {count}");
	}

	std::fs::create_dir_all(artifact_dir)?;
	config.save(artifact_dir.join("config.json"))?;

	// Checkpoints of an earlier run would compete with this run's best epoch
	let checkpoint_dir = artifact_dir.join("checkpoint");
	if checkpoint_dir.exists() {
		std::fs::remove_dir_all(&checkpoint_dir)?;
	}

	B::seed(config.seed);

	let backbone = RESNET18_IMAGENET1K_V1.backbone_record::<B>(&device)?;
	let model = config.model.init_with_backbone(backbone, &device);

	// Dataloaders
	let batcher_train = PlantBatcher::<B>::new(device.clone());
	let batcher_valid = PlantBatcher::<B::InnerBackend>::new(device.clone());

	let dataloader_train = DataLoaderBuilder::new(batcher_train)
		.batch_size(config.batch_size)
		.shuffle(config.seed)
		.num_workers(config.num_workers)
		.build(dataset_train);

	let dataloader_valid = DataLoaderBuilder::new(batcher_valid)
		.batch_size(config.batch_size)
		.num_workers(config.num_workers)
		.build(dataset_valid);

	let learner = LearnerBuilder::new(&*artifact_dir.to_string_lossy())
		.metric_train_numeric(AccuracyMetric::new())
		.metric_valid_numeric(AccuracyMetric::new())
		.metric_train_numeric(LossMetric::new())
		.metric_valid_numeric(LossMetric::new())
		.metric_train(CpuUse::new())
		.with_file_checkpointer(CompactRecorder::new())
		// Only the epoch with the best validation accuracy keeps its checkpoint
		.with_checkpointing_strategy(MetricCheckpointingStrategy::new::<AccuracyMetric<B>>(
			Aggregate::Mean,
			Direction::Highest,
			Split::Valid,
		))
		.early_stopping(MetricEarlyStoppingStrategy::new::<LossMetric<B>>(
			Aggregate::Mean,
			Direction::Lowest,
			Split::Valid,
			StoppingCondition::NoImprovementSince { n_epochs: config.patience },
		))
		.devices(vec![device.clone()])
		.num_epochs(config.num_epochs)
		.summary()
		.build(model, config.optimizer.init(), config.learning_rate);

	let now = Instant::now();
	let model_trained = learner.fit(dataloader_train, dataloader_valid);
	let elapsed = now.elapsed().as_secs();
	info!("Training completed in {}m{}s", elapsed / 60, elapsed % 60);

	let model_trained = match best_checkpoint(&checkpoint_dir)? {
		Some(epoch) => {
			info!("Restoring weights of epoch {epoch}");
			model_trained
				.load_file(checkpoint_dir.join(format!("model-{epoch}")), &CompactRecorder::new(), &device)
				.map_err(|err| TrainError::Recorder(format!("{err:?}")))?
		}
		None => model_trained,
	};

	let model_path = artifact_dir.join(kind.model_file_name());
	model_trained
		.save_file(model_path.clone(), &CompactRecorder::new())
		.map_err(|err| TrainError::Recorder(format!("{err:?}")))?;

	info!("Saved {kind} model to {:?}", model_path);
	Ok(model_path)
}

/// Epoch of the newest `model-<epoch>.mpk` left in `checkpoint_dir`.
pub fn best_checkpoint(checkpoint_dir: &Path) -> Result<Option<usize>, TrainError> {
	if !checkpoint_dir.is_dir() {
		return Ok(None);
	}

	let mut best = None;
	for entry in checkpoint_dir.read_dir()? {
		let name = entry?.file_name();
		let epoch = name
			.to_str()
			.and_then(|name| name.strip_prefix("model-"))
			.and_then(|name| name.strip_suffix(".mpk"))
			.and_then(|epoch| epoch.parse::<usize>().ok());

		best = best.max(epoch);
	}

	Ok(best)
}

/// Untrained models with the right shapes, for exercising the predictors
/// without a dataset or a download.
pub fn write_dummy_models<B: Backend>(artifact_dir: &Path, device: &B::Device) -> Result<Vec<PathBuf>, TrainError> {
	std::fs::create_dir_all(artifact_dir)?;

	[CatalogKind::Disease, CatalogKind::Pest]
		.into_iter()
		.map(|kind| {
			let num_classes = Catalog::new(kind).num_classes();
			let path = artifact_dir.join(kind.model_file_name());

			PlantClassifierConfig::new(num_classes)
				.init::<B>(device)
				.save_file(path.clone(), &CompactRecorder::new())
				.map_err(|err| TrainError::Recorder(format!("{err:?}")))?;

			info!("{:?} - {num_classes} classes", path);
			Ok(path)
		})
		.collect()
}
