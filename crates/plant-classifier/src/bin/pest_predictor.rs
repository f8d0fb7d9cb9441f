use plant_classifier::cli;
use plant_classifier::CatalogKind;
use std::process::ExitCode;

fn main() -> ExitCode {
    cli::main(CatalogKind::Pest, "pest-predictor")
}
