use clap::Parser;
use tabstat::utils::{logger, validation::Validate};
use tabstat::{AnalysisPipeline, CliConfig, LocalStorage, StatsEngine};

fn main() {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::debug!("Starting tabstat");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(2);
    }

    let monitor_enabled = config.monitor;

    let storage = LocalStorage::new(".".to_string());
    let pipeline = AnalysisPipeline::new(storage, config);
    let engine = StatsEngine::new_with_monitoring(pipeline, monitor_enabled);

    if let Err(e) = engine.run() {
        tracing::error!("Computation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}
