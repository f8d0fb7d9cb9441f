use crate::error::TrainError;
use crate::train::{dataset_source, TrainingConfig};
use clap::{Parser, Subcommand};
use log::{error, info, LevelFilter};
use plant_classifier::CatalogKind;
use simple_logger::SimpleLogger;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

mod data;
mod error;
mod train;
mod weights;

#[derive(Debug, Parser)]
#[command(about = "Trains the plant disease and pest classifiers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fine-tune an ImageNet ResNet-18 on an image folder dataset
    Train {
        kind: CatalogKind,
        /// Defaults to datasets/plant_disease/train or datasets/pest/train
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(long, default_value = ".")]
        artifact_dir: PathBuf,
        #[arg(long, default_value_t = 50)]
        epochs: usize,
        #[arg(long, default_value_t = 32)]
        batch_size: usize,
        #[arg(long, default_value_t = 1e-3)]
        learning_rate: f64,
        #[arg(long, default_value_t = 4)]
        num_workers: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Write untrained models with the right output sizes
    Dummy {
        #[arg(long, default_value = ".")]
        artifact_dir: PathBuf,
    },
}

fn main() -> ExitCode {
    SimpleLogger::new().with_level(LevelFilter::Info).env().init().ok();

    let time = Instant::now();
    let result = run(Cli::parse().command);
    info!("Finished in {:.3}s", time.elapsed().as_secs_f64());

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), TrainError> {
    match command {
        Command::Train { kind, data_dir, artifact_dir, epochs, batch_size, learning_rate, num_workers, seed } => {
            let data_dir = data_dir.unwrap_or_else(|| dataset_source(kind).0);
            let config = TrainingConfig::for_kind(kind)
                .with_num_epochs(epochs)
                .with_batch_size(batch_size)
                .with_learning_rate(learning_rate)
                .with_num_workers(num_workers)
                .with_seed(seed);

            let device = backend::device()?;
            let model_path = train::train_run::<backend::Train>(kind, &data_dir, &artifact_dir, config, device)?;
            println!("{}", model_path.display());
        }
        Command::Dummy { artifact_dir } => {
            let device = backend::device()?;
            for path in train::write_dummy_models::<backend::Train>(&artifact_dir, &device)? {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

#[cfg(feature = "tch")]
mod backend {
    use crate::error::TrainError;
    use burn::backend::Autodiff;
    use burn_tch::{LibTorch, LibTorchDevice};
    use log::info;

    pub type Train = Autodiff<LibTorch>;

    pub fn device() -> Result<LibTorchDevice, TrainError> {
        info!("Checking CUDA configuration for training...");
        if !tch::utils::has_cuda() {
            return Err(TrainError::Device("Could not detect valid CUDA configuration".to_string()));
        }

        Ok(LibTorchDevice::Cuda(0))
    }
}

#[cfg(not(feature = "tch"))]
mod backend {
    use crate::error::TrainError;
    use burn::backend::ndarray::NdArrayDevice;
    use burn::backend::{Autodiff, NdArray};

    pub type Train = Autodiff<NdArray>;

    pub fn device() -> Result<NdArrayDevice, TrainError> {
        Ok(NdArrayDevice::Cpu)
    }
}
