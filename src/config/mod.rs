pub mod cli;

use crate::core::{Computation, ConfigProvider};
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "tabstat")]
#[command(about = "Descriptive statistics and charts for CSV datasets")]
pub struct CliConfig {
    /// Path to the input CSV file (first row is the header)
    pub csv_file: String,

    /// The computation to run
    #[arg(value_enum)]
    pub computation: Computation,

    /// Column name, or an `x,y` pair for the two-variable computations
    pub variables: Option<String>,

    #[arg(long, default_value = "./dataset_plot_images")]
    pub plot_dir: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Report elapsed time and peak memory after the run")]
    pub monitor: bool,
}

impl ConfigProvider for CliConfig {
    fn csv_file(&self) -> &str {
        &self.csv_file
    }

    fn computation(&self) -> Computation {
        self.computation
    }

    fn variables(&self) -> Option<&str> {
        self.variables.as_deref()
    }

    fn plot_dir(&self) -> &str {
        &self.plot_dir
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("csv_file", &self.csv_file)?;
        validate_path("plot_dir", &self.plot_dir)?;
        Ok(())
    }
}
