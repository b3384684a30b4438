use crate::utils::error::{BulletinError, Result};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Languages the bulletin service publishes in.
pub const SUPPORTED_LANGS: [&str; 4] = ["de", "fr", "it", "en"];

// CH-4211, AT-07-14, IT-32-BZ
static REGION_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}(-[A-Z0-9]+)+$").expect("valid region pattern"));

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: &str, reason: impl Into<String>) -> BulletinError {
    BulletinError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Bulletin API base: http(s) only, no query string (`activeAt` is appended per request).
pub fn validate_url(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(invalid(field, value, "URL cannot be empty"));
    }

    let url = Url::parse(value).map_err(|e| invalid(field, value, format!("Invalid URL format: {}", e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field,
            value,
            format!("Unsupported URL scheme: {}", url.scheme()),
        ));
    }
    if url.query().is_some() {
        return Err(invalid(field, value, "Endpoint must not carry a query string"));
    }
    Ok(())
}

pub fn validate_path(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "Path cannot be empty"));
    }
    if value.contains('\0') {
        return Err(invalid(field, value, "Path contains null bytes"));
    }
    Ok(())
}

pub fn validate_region_id(field: &str, value: &str) -> Result<()> {
    if REGION_ID.is_match(value) {
        Ok(())
    } else {
        Err(invalid(
            field,
            value,
            "Region IDs look like CH-4211 (country code, then dash-separated parts)",
        ))
    }
}

pub fn validate_lang(field: &str, value: &str) -> Result<()> {
    if SUPPORTED_LANGS.contains(&value) {
        Ok(())
    } else {
        Err(invalid(
            field,
            value,
            format!("Supported languages: {}", SUPPORTED_LANGS.join(", ")),
        ))
    }
}
