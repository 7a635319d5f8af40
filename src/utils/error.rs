use crate::utils::validation::FieldError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeoError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation failed: {}", format_field_errors(.errors))]
    ValidationError { errors: Vec<FieldError> },

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Audit failed: {message}")]
    AuditError { message: String },
}

pub type Result<T> = std::result::Result<T, SeoError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Network,
    Data,
    Configuration,
    Validation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl SeoError {
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::ValidationError { errors }
    }

    pub fn audit(message: impl Into<String>) -> Self {
        Self::AuditError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IoError(_) => ErrorCategory::Io,
            Self::HttpError(_) | Self::AuditError { .. } => ErrorCategory::Network,
            Self::SerializationError(_) | Self::XmlError(_) => ErrorCategory::Data,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::ValidationError { .. } | Self::InvalidUrl { .. } => ErrorCategory::Validation,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::IoError(_) => "Check that the output directory exists and is writable",
            Self::HttpError(_) => "Check the URL and your network connection, then retry",
            Self::SerializationError(_) => "Make sure the input is valid JSON",
            Self::XmlError(_) => "Make sure the existing sitemap is well-formed XML",
            Self::ConfigValidationError { .. } => "Fix the TOML syntax in the site configuration",
            Self::InvalidConfigValueError { .. } => "Correct the highlighted configuration value",
            Self::MissingConfigError { .. } => "Add the missing field to the site configuration",
            Self::ValidationError { .. } => "Fill in the required fields and use absolute http(s) URLs",
            Self::InvalidUrl { .. } => "Use an absolute URL such as https://example.com",
            Self::AuditError { .. } => "Verify the page is reachable and retry the audit",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { errors } => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                format!("Please check these fields: {}", fields.join(", "))
            }
            Self::InvalidUrl { url, .. } => format!("'{}' is not a valid URL", url),
            Self::MissingConfigError { field } => format!("Missing setting '{}'", field),
            other => other.to_string(),
        }
    }

    /// Process exit code for the binaries.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 2,
            ErrorSeverity::Medium => 3,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 4,
        }
    }
}
