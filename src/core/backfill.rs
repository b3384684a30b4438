//! Day-by-day regeneration of archived bulletin pages.

use crate::config::cli::LocalStorage;
use crate::core::etl::EtlEngine;
use crate::core::{Pipeline, Storage};
use crate::utils::error::{BulletinError, Result};
use chrono::{Days, NaiveDate};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(BulletinError::ConfigError {
                message: format!("backfill start {} is after end {}", start, end),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn len(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        std::iter::successors(Some(self.start), |d| d.checked_add_days(Days::new(1)))
            .take_while(move |d| *d <= end)
    }
}

/// Where rendered pages go and where they get archived.
#[derive(Debug, Clone)]
pub struct ArchiveLayout {
    /// Scratch directory for `bulletin_<date>.html`.
    pub output_dir: PathBuf,
    /// Shared compass icon directory.
    pub images_dir: PathBuf,
    /// `history/<date>/index.html` and `history/<date>/static/images/*`.
    pub history_dir: PathBuf,
}

impl ArchiveLayout {
    pub fn day_output(&self, day: NaiveDate) -> PathBuf {
        self.output_dir.join(format!("bulletin_{}.html", day))
    }

    pub fn day_dir(&self, day: NaiveDate) -> PathBuf {
        self.history_dir.join(day.to_string())
    }
}

#[derive(Debug)]
pub struct DayOutcome {
    pub day: NaiveDate,
    pub duration: Duration,
    /// Archived `index.html` on success.
    pub result: Result<PathBuf>,
}

impl DayOutcome {
    pub fn is_built(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Default)]
pub struct BackfillReport {
    pub days: Vec<DayOutcome>,
}

impl BackfillReport {
    pub fn total(&self) -> usize {
        self.days.len()
    }

    pub fn built(&self) -> usize {
        self.days.iter().filter(|d| d.is_built()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &DayOutcome> {
        self.days.iter().filter(|d| !d.is_built())
    }

    pub fn summary(&self) -> String {
        format!("Built {}/{} days", self.built(), self.total())
    }
}

pub struct Backfill {
    range: DateRange,
    layout: ArchiveLayout,
    storage: LocalStorage,
}

impl Backfill {
    pub fn new(range: DateRange, layout: ArchiveLayout) -> Self {
        Self {
            range,
            layout,
            storage: LocalStorage::new(String::new()),
        }
    }

    /// Render every day in order. A failed day is recorded and skipped;
    /// it never stops the loop.
    ///
    /// `make_pipeline` receives the day and the file the page must be written to.
    pub async fn run<P, F>(&self, mut make_pipeline: F) -> BackfillReport
    where
        P: Pipeline,
        F: FnMut(NaiveDate, &Path) -> Result<P>,
    {
        let mut report = BackfillReport::default();

        for day in self.range.days() {
            tracing::info!("=== Building {} ===", day);
            let start_time = Instant::now();
            let result = self.build_day(day, &mut make_pipeline).await;
            let duration = start_time.elapsed();

            match &result {
                Ok(index) => tracing::info!("✅ {} archived to {} ({:?})", day, index.display(), duration),
                Err(e) => tracing::warn!("⏭️ Skip {}: {}", day, e.user_friendly_message()),
            }
            report.days.push(DayOutcome { day, duration, result });
        }

        tracing::info!("{}", report.summary());
        report
    }

    async fn build_day<P, F>(&self, day: NaiveDate, make_pipeline: &mut F) -> Result<PathBuf>
    where
        P: Pipeline,
        F: FnMut(NaiveDate, &Path) -> Result<P>,
    {
        let out_file = self.layout.day_output(day);
        let pipeline = make_pipeline(day, &out_file)?;
        EtlEngine::new(pipeline).run().await?;

        if !out_file.is_file() {
            return Err(BulletinError::MissingOutput {
                path: out_file.display().to_string(),
            });
        }
        self.publish(day, &out_file).await
    }

    /// Copy the day's page and every current icon into `history/<date>/`.
    async fn publish(&self, day: NaiveDate, out_file: &Path) -> Result<PathBuf> {
        let day_dir = self.layout.day_dir(day);
        let index = day_dir.join("index.html");

        let html = self.storage.read_file(&out_file.to_string_lossy()).await?;
        self.storage.write_file(&index.to_string_lossy(), &html).await?;

        let images = day_dir.join("static").join("images");
        std::fs::create_dir_all(&images)?;
        let mut copied = 0usize;
        for name in self.storage.list_files(&self.layout.images_dir.to_string_lossy())? {
            let src = self.layout.images_dir.join(&name);
            let data = self.storage.read_file(&src.to_string_lossy()).await?;
            self.storage
                .write_file(&images.join(&name).to_string_lossy(), &data)
                .await?;
            copied += 1;
        }
        tracing::debug!("Copied {} images into {}", copied, images.display());

        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_range_is_inclusive() {
        let range = DateRange::new(day("2025-02-27"), day("2025-03-02")).unwrap();
        let days: Vec<String> = range.days().map(|d| d.to_string()).collect();
        assert_eq!(days, vec!["2025-02-27", "2025-02-28", "2025-03-01", "2025-03-02"]);
        assert_eq!(range.len(), 4);
    }

    #[test]
    fn test_single_day_range() {
        let range = DateRange::new(day("2025-01-01"), day("2025-01-01")).unwrap();
        assert_eq!(range.days().count(), 1);
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let err = DateRange::new(day("2025-04-30"), day("2024-12-01")).unwrap_err();
        assert!(matches!(err, BulletinError::ConfigError { .. }));
    }

    #[test]
    fn test_layout_paths() {
        let layout = ArchiveLayout {
            output_dir: PathBuf::from("bulletin/output"),
            images_dir: PathBuf::from("bulletin/static/images"),
            history_dir: PathBuf::from("public/history"),
        };
        assert_eq!(
            layout.day_output(day("2025-01-05")),
            PathBuf::from("bulletin/output/bulletin_2025-01-05.html")
        );
        assert_eq!(layout.day_dir(day("2025-01-05")), PathBuf::from("public/history/2025-01-05"));
    }
}
