pub mod backfill;
pub mod danger;
pub mod etl;
pub mod grouping;
pub mod pipeline;

pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
