pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{backfill::BackfillArgs, CliConfig};
pub use config::{cli::LocalStorage, SignageConfig};

pub use core::{backfill::Backfill, etl::EtlEngine, pipeline::BulletinPipeline};
pub use domain::vocabulary::Vocabulary;
pub use utils::error::{BulletinError, Result};
