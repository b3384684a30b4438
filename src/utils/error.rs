use thiserror::Error;

#[derive(Error, Debug)]
pub enum BulletinError {
    #[error("Bulletin request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid date '{input}': {reason}")]
    InvalidDateError { input: String, reason: String },

    #[error("Region {region_id} not found in bulletin")]
    RegionNotFound { region_id: String },

    #[error("No danger rating available for region {region_id}")]
    NoRatingData { region_id: String },

    #[error("Expected output file is missing: {path}")]
    MissingOutput { path: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Io,
    Data,
    Configuration,
    Bulletin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 依嚴重程度決定退出碼
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,      // 警告，但成功
            ErrorSeverity::Medium => 2,   // 上游錯誤，可稍後重試
            ErrorSeverity::High => 1,     // 處理錯誤
            ErrorSeverity::Critical => 3, // 系統錯誤
        }
    }
}

impl BulletinError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BulletinError::ApiError(_) => ErrorCategory::Network,
            BulletinError::IoError(_) | BulletinError::MissingOutput { .. } => ErrorCategory::Io,
            BulletinError::SerializationError(_) => ErrorCategory::Data,
            BulletinError::ConfigError { .. }
            | BulletinError::InvalidConfigValueError { .. }
            | BulletinError::MissingConfigError { .. }
            | BulletinError::ConfigValidationError { .. }
            | BulletinError::InvalidDateError { .. } => ErrorCategory::Configuration,
            BulletinError::RegionNotFound { .. } | BulletinError::NoRatingData { .. } => {
                ErrorCategory::Bulletin
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 沒有當日公報不算失敗
            BulletinError::RegionNotFound { .. } => ErrorSeverity::Low,
            BulletinError::ApiError(_) => ErrorSeverity::Medium,
            BulletinError::SerializationError(_)
            | BulletinError::NoRatingData { .. }
            | BulletinError::MissingOutput { .. }
            | BulletinError::ConfigError { .. }
            | BulletinError::InvalidConfigValueError { .. }
            | BulletinError::MissingConfigError { .. }
            | BulletinError::ConfigValidationError { .. }
            | BulletinError::InvalidDateError { .. } => ErrorSeverity::High,
            BulletinError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BulletinError::ApiError(e) => match e.status() {
                Some(status) => format!("The bulletin service answered with HTTP {}", status),
                None => "Could not reach the bulletin service".to_string(),
            },
            BulletinError::IoError(e) => format!("File system error: {}", e),
            BulletinError::SerializationError(_) => {
                "The bulletin payload could not be decoded".to_string()
            }
            BulletinError::RegionNotFound { region_id } => {
                format!("Région {} introuvable.", region_id)
            }
            BulletinError::NoRatingData { region_id } => {
                format!("The bulletin for {} carries no danger rating", region_id)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the network connection and the --endpoint value, then run again",
            ErrorCategory::Io => "Check that the output and images directories are writable",
            ErrorCategory::Data => "The upstream format may have changed; inspect the raw response",
            ErrorCategory::Configuration => "Fix the reported option or TOML value and run again",
            ErrorCategory::Bulletin => "No bulletin is published for this date; try another --date",
        }
    }
}

pub type Result<T> = std::result::Result<T, BulletinError>;
