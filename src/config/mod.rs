#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "maillist")]
#[command(about = "Extract a de-duplicated, domain-sorted email list from a spreadsheet column")]
pub struct CliConfig {
    /// CSV/TSV file path or http(s) URL to read
    #[arg(long)]
    pub source: String,

    /// Column holding the addresses: header name, or 0-based index
    #[arg(long, default_value = "email")]
    pub column: String,

    /// Field delimiter of the source table
    #[arg(long, default_value = ",")]
    pub delimiter: char,

    /// Treat the first row as data instead of a header
    #[arg(long)]
    pub no_headers: bool,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Also bundle the output files into a single zip archive
    #[arg(long)]
    pub bundle: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Enable system monitoring")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn source(&self) -> &str {
        &self.source
    }

    fn column(&self) -> &str {
        &self.column
    }

    fn delimiter(&self) -> u8 {
        self.delimiter as u8
    }

    fn has_headers(&self) -> bool {
        !self.no_headers
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn bundle_output(&self) -> bool {
        self.bundle
    }

    fn max_rows(&self) -> Option<usize> {
        None
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_source("source", &self.source)?;
        validation::validate_non_empty_string("column", &self.column)?;
        validation::validate_delimiter("delimiter", self.delimiter)?;
        validation::validate_path("output_path", &self.output_path)?;
        Ok(())
    }
}
