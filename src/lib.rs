pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{cli::LocalStorage, CliConfig};

#[cfg(feature = "lambda")]
pub use crate::config::lambda::{LambdaConfig, S3Storage};

pub use crate::core::{etl::EtlEngine, pipeline::ColumnPipeline};
pub use crate::domain::model::{ColumnValues, DedupReport};
pub use crate::utils::error::{EtlError, Result};
