use crate::utils::error::{BulletinError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| {
    // ${VAR_NAME}
    Regex::new(r"\$\{([^}]+)\}").expect("static regex")
});

/// Optional settings file. Every key may be omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub backfill: BackfillConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub endpoint: Option<String>,
    pub lang: Option<String>,
    pub region_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub images_dir: Option<String>,
    pub image_href_prefix: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackfillConfig {
    pub output_dir: Option<String>,
    pub history_dir: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(BulletinError::MissingConfigError {
                field: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| BulletinError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數，未設定者保留原字串
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 只驗證檔案中有寫的欄位
    pub fn validate_config(&self) -> Result<()> {
        use crate::utils::validation::{validate_lang, validate_path, validate_region_id, validate_url};

        if let Some(endpoint) = &self.source.endpoint {
            validate_url("source.endpoint", endpoint)?;
        }
        if let Some(lang) = &self.source.lang {
            validate_lang("source.lang", lang)?;
        }
        if let Some(region) = &self.source.region_id {
            validate_region_id("source.region_id", region)?;
        }

        let paths = [
            ("output.path", &self.output.path),
            ("output.images_dir", &self.output.images_dir),
            ("backfill.output_dir", &self.backfill.output_dir),
            ("backfill.history_dir", &self.backfill.history_dir),
        ];
        for (field, value) in paths {
            if let Some(value) = value {
                validate_path(field, value)?;
            }
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[source]
endpoint = "https://aws.slf.ch/api/bulletin/caaml"
lang = "fr"
region_id = "CH-4211"

[output]
path = "bulletin/signage_bulletin_fr.html"
images_dir = "bulletin/static/images"
image_href_prefix = "static/images"

[backfill]
output_dir = "bulletin/output"
history_dir = "public/history"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.source.region_id.as_deref(), Some("CH-4211"));
        assert_eq!(config.output.images_dir.as_deref(), Some("bulletin/static/images"));
        assert_eq!(config.backfill.history_dir.as_deref(), Some("public/history"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sections_are_optional() {
        let config = TomlConfig::from_toml_str("[source]\nregion_id = \"CH-1234\"\n").unwrap();
        assert_eq!(config.source.region_id.as_deref(), Some("CH-1234"));
        assert!(config.source.endpoint.is_none());
        assert!(config.output.path.is_none());

        let empty = TomlConfig::from_toml_str("").unwrap();
        assert!(empty.backfill.output_dir.is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("AVA_TEST_REGION", "CH-7777");

        let config = TomlConfig::from_toml_str("[source]\nregion_id = \"${AVA_TEST_REGION}\"\n").unwrap();
        assert_eq!(config.source.region_id.as_deref(), Some("CH-7777"));

        std::env::remove_var("AVA_TEST_REGION");
    }

    #[test]
    fn test_unset_env_var_is_left_in_place() {
        let config =
            TomlConfig::from_toml_str("[output]\npath = \"${AVA_TEST_SURELY_UNSET}/x.html\"\n").unwrap();
        assert_eq!(config.output.path.as_deref(), Some("${AVA_TEST_SURELY_UNSET}/x.html"));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = TomlConfig::from_toml_str("[source]\nregion = \"CH-4211\"\n").unwrap_err();
        assert!(matches!(err, BulletinError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str("[source]\nendpoint = \"invalid-url\"\n").unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str("[output]\npath = \"\"\n").unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str("[source]\nregion_id = \"4211\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[source]\nlang = \"fr\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.source.lang.as_deref(), Some("fr"));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = TomlConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, BulletinError::MissingConfigError { .. }));
    }
}
