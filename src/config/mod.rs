#[cfg(feature = "cli")]
pub mod backfill;
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_lang, validate_path, validate_region_id, validate_url, Validate};
use chrono::{DateTime, FixedOffset};
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use crate::utils::dates;
#[cfg(feature = "cli")]
use clap::{Args, Parser};
#[cfg(feature = "cli")]
use std::path::PathBuf;

pub const DEFAULT_ENDPOINT: &str = "https://aws.slf.ch/api/bulletin/caaml";
pub const DEFAULT_LANG: &str = "fr";
pub const DEFAULT_REGION_ID: &str = "CH-4211";
pub const DEFAULT_OUTPUT_PATH: &str = "bulletin/signage_bulletin_fr.html";
pub const DEFAULT_IMAGES_DIR: &str = "bulletin/static/images";
pub const DEFAULT_IMAGE_HREF_PREFIX: &str = "static/images";

/// Values given on the command line; `None` falls through to the file, then the default.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub lang: Option<String>,
    pub region_id: Option<String>,
    pub output_path: Option<String>,
    pub images_dir: Option<String>,
}

/// Fully resolved settings for one render.
#[derive(Debug, Clone)]
pub struct SignageConfig {
    pub api_endpoint: String,
    pub lang: String,
    pub region_id: String,
    pub active_at: DateTime<FixedOffset>,
    pub output_path: String,
    pub images_dir: String,
    pub image_href_prefix: String,
}

impl SignageConfig {
    pub fn resolve(overrides: &Overrides, file: &TomlConfig, active_at: DateTime<FixedOffset>) -> Self {
        fn pick(cli: &Option<String>, file: &Option<String>, default: &str) -> String {
            cli.clone()
                .or_else(|| file.clone())
                .unwrap_or_else(|| default.to_string())
        }

        Self {
            api_endpoint: pick(&overrides.endpoint, &file.source.endpoint, DEFAULT_ENDPOINT),
            lang: pick(&overrides.lang, &file.source.lang, DEFAULT_LANG),
            region_id: pick(&overrides.region_id, &file.source.region_id, DEFAULT_REGION_ID),
            active_at,
            output_path: pick(&overrides.output_path, &file.output.path, DEFAULT_OUTPUT_PATH),
            images_dir: pick(&overrides.images_dir, &file.output.images_dir, DEFAULT_IMAGES_DIR),
            image_href_prefix: file
                .output
                .image_href_prefix
                .clone()
                .unwrap_or_else(|| DEFAULT_IMAGE_HREF_PREFIX.to_string()),
        }
    }

    /// Same settings, another instant and output file.
    pub fn for_day(&self, active_at: DateTime<FixedOffset>, output_path: String) -> Self {
        Self {
            active_at,
            output_path,
            ..self.clone()
        }
    }
}

impl ConfigProvider for SignageConfig {
    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn lang(&self) -> &str {
        &self.lang
    }

    fn region_id(&self) -> &str {
        &self.region_id
    }

    fn active_at(&self) -> DateTime<FixedOffset> {
        self.active_at
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn images_dir(&self) -> &str {
        &self.images_dir
    }

    fn image_href_prefix(&self) -> &str {
        &self.image_href_prefix
    }
}

impl Validate for SignageConfig {
    fn validate(&self) -> Result<()> {
        validate_url("endpoint", &self.api_endpoint)?;
        validate_lang("lang", &self.lang)?;
        validate_region_id("region", &self.region_id)?;
        validate_path("out", &self.output_path)?;
        validate_path("images_dir", &self.images_dir)?;
        Ok(())
    }
}

/// Options shared by both binaries.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    #[arg(long, help = "TOML settings file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Region ID to render, e.g. CH-4211")]
    pub region: Option<String>,

    #[arg(long, help = "Bulletin language")]
    pub lang: Option<String>,

    #[arg(long, help = "Bulletin API base URL")]
    pub endpoint: Option<String>,

    #[arg(long, help = "Directory the compass icons are written to")]
    pub images_dir: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl SourceArgs {
    pub fn load_file(&self) -> Result<TomlConfig> {
        match &self.config {
            Some(path) => {
                let file = TomlConfig::from_file(path)?;
                file.validate()?;
                Ok(file)
            }
            None => Ok(TomlConfig::default()),
        }
    }

    pub fn overrides(&self, output_path: Option<String>) -> Overrides {
        Overrides {
            endpoint: self.endpoint.clone(),
            lang: self.lang.clone(),
            region_id: self.region.clone(),
            output_path,
            images_dir: self.images_dir.clone(),
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "ava-bulletin")]
#[command(about = "Render the avalanche bulletin signage page for one region")]
pub struct CliConfig {
    #[arg(long, default_value = "today", help = "today, YYYY-MM-DD or an ISO datetime")]
    pub date: String,

    #[arg(long, help = "Output HTML path")]
    pub out: Option<String>,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn resolve(&self) -> Result<SignageConfig> {
        let file = self.source.load_file()?;
        let active_at = dates::parse_active_at(&self.date)?;
        let config = SignageConfig::resolve(&self.source.overrides(self.out.clone()), &file, active_at);
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2025-01-05T08:00:00+01:00").unwrap()
    }

    #[test]
    fn test_defaults_apply_without_file_or_flags() {
        let config = SignageConfig::resolve(&Overrides::default(), &TomlConfig::default(), at());

        assert_eq!(config.api_endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(config.region_id(), "CH-4211");
        assert_eq!(config.output_path(), "bulletin/signage_bulletin_fr.html");
        assert_eq!(config.images_dir(), "bulletin/static/images");
        assert_eq!(config.image_href_prefix(), "static/images");
        assert_eq!(
            config.bulletin_url(),
            "https://aws.slf.ch/api/bulletin/caaml/fr/geojson"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flags_win_over_file() {
        let file = TomlConfig::from_toml_str(
            "[source]\nregion_id = \"CH-1111\"\nlang = \"fr\"\n[output]\npath = \"from-file.html\"\n",
        )
        .unwrap();
        let overrides = Overrides {
            region_id: Some("CH-2222".to_string()),
            ..Default::default()
        };

        let config = SignageConfig::resolve(&overrides, &file, at());

        assert_eq!(config.region_id(), "CH-2222");
        assert_eq!(config.output_path(), "from-file.html");
    }

    #[test]
    fn test_for_day_keeps_source_settings() {
        let base = SignageConfig::resolve(&Overrides::default(), &TomlConfig::default(), at());
        let later = DateTime::parse_from_rfc3339("2025-01-06T08:00:00+01:00").unwrap();

        let day = base.for_day(later, "bulletin/output/bulletin_2025-01-06.html".to_string());

        assert_eq!(day.active_at(), later);
        assert_eq!(day.output_path(), "bulletin/output/bulletin_2025-01-06.html");
        assert_eq!(day.region_id(), base.region_id());
    }

    #[test]
    fn test_region_and_lang_are_checked() {
        let bad_region = Overrides {
            region_id: Some("Leukerbad".to_string()),
            ..Default::default()
        };
        let err = SignageConfig::resolve(&bad_region, &TomlConfig::default(), at())
            .validate()
            .unwrap_err();
        assert!(matches!(err, crate::utils::error::BulletinError::InvalidConfigValueError { ref field, .. } if field == "region"));

        let bad_lang = Overrides {
            lang: Some("français".to_string()),
            ..Default::default()
        };
        assert!(SignageConfig::resolve(&bad_lang, &TomlConfig::default(), at())
            .validate()
            .is_err());
    }

    #[test]
    fn test_invalid_endpoint_fails_validation() {
        let overrides = Overrides {
            endpoint: Some("not a url".to_string()),
            ..Default::default()
        };
        let config = SignageConfig::resolve(&overrides, &TomlConfig::default(), at());
        assert!(config.validate().is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_parses_flags() {
        let cli = CliConfig::try_parse_from([
            "ava-bulletin",
            "--date",
            "2025-01-05",
            "--out",
            "site/index.html",
            "--region",
            "CH-9999",
            "--verbose",
        ])
        .unwrap();

        assert_eq!(cli.date, "2025-01-05");
        assert!(cli.source.verbose);

        let config = cli.resolve().unwrap();
        assert_eq!(config.output_path(), "site/index.html");
        assert_eq!(config.region_id(), "CH-9999");
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_rejects_bad_date() {
        let cli = CliConfig::try_parse_from(["ava-bulletin", "--date", "05/01/2025"]).unwrap();
        assert!(matches!(
            cli.resolve().unwrap_err(),
            crate::utils::error::BulletinError::InvalidDateError { .. }
        ));
    }
}
