pub mod config;
pub mod core;
pub mod domain;
pub mod plot;
pub mod utils;

pub use config::{cli::LocalStorage, CliConfig};
pub use core::{analysis::AnalysisPipeline, engine::StatsEngine};
pub use domain::model::{Computation, Outcome};
pub use utils::error::{Result, StatsError};
