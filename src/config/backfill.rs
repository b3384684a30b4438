use crate::config::{SignageConfig, SourceArgs};
use crate::core::backfill::{ArchiveLayout, DateRange};
use crate::utils::dates;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_START_DATE: &str = "2024-12-01";
pub const DEFAULT_END_DATE: &str = "2025-04-30";
pub const DEFAULT_OUTPUT_DIR: &str = "bulletin/output";
pub const DEFAULT_HISTORY_DIR: &str = "public/history";

#[derive(Debug, Clone, Parser)]
#[command(name = "backfill")]
#[command(about = "Rebuild the dated bulletin archive for a range of days")]
pub struct BackfillArgs {
    #[arg(env = "START_DATE", default_value = DEFAULT_START_DATE, help = "First day, YYYY-MM-DD")]
    pub start: String,

    #[arg(env = "END_DATE", default_value = DEFAULT_END_DATE, help = "Last day, YYYY-MM-DD (inclusive)")]
    pub end: String,

    #[arg(long, help = "Directory for the per-day bulletin_<date>.html files")]
    pub output_dir: Option<String>,

    #[arg(long, help = "Archive root receiving <date>/index.html")]
    pub history_dir: Option<String>,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Everything a backfill run needs.
#[derive(Debug, Clone)]
pub struct BackfillPlan {
    pub range: DateRange,
    pub layout: ArchiveLayout,
    /// Per-day configs are derived from this one.
    pub base: SignageConfig,
}

impl BackfillPlan {
    pub fn config_for(&self, day: chrono::NaiveDate, out_file: &std::path::Path) -> Result<SignageConfig> {
        let active_at = dates::issue_time(day, &day.to_string())?;
        Ok(self
            .base
            .for_day(active_at, out_file.to_string_lossy().into_owned()))
    }
}

impl BackfillArgs {
    pub fn resolve(&self) -> Result<BackfillPlan> {
        let start = dates::parse_day("start", &self.start)?;
        let end = dates::parse_day("end", &self.end)?;
        let range = DateRange::new(start, end)?;

        let file = self.source.load_file()?;
        let base = SignageConfig::resolve(
            &self.source.overrides(None),
            &file,
            dates::issue_time(start, &self.start)?,
        );
        base.validate()?;

        let output_dir = self
            .output_dir
            .clone()
            .or_else(|| file.backfill.output_dir.clone())
            .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string());
        let history_dir = self
            .history_dir
            .clone()
            .or_else(|| file.backfill.history_dir.clone())
            .unwrap_or_else(|| DEFAULT_HISTORY_DIR.to_string());
        validate_path("output_dir", &output_dir)?;
        validate_path("history_dir", &history_dir)?;

        let layout = ArchiveLayout {
            output_dir: PathBuf::from(output_dir),
            images_dir: PathBuf::from(&base.images_dir),
            history_dir: PathBuf::from(history_dir),
        };

        Ok(BackfillPlan { range, layout, base })
    }
}
