use crate::utils::error::{Result, SeoError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use url::Url;

/// A per-field problem found while checking tool input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

pub trait Validate {
    /// All field problems, recomputed on every call.
    fn field_errors(&self) -> Vec<FieldError>;

    fn validate(&self) -> Result<()> {
        let errors = self.field_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(SeoError::validation(errors))
        }
    }
}

/// Collects field checks without stopping at the first failure.
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, outcome: std::result::Result<(), FieldError>) -> &mut Self {
        if let Err(e) = outcome {
            self.0.push(e);
        }
        self
    }

    pub fn push(&mut self, error: FieldError) -> &mut Self {
        self.0.push(error);
        self
    }

    pub fn extend(&mut self, errors: Vec<FieldError>) -> &mut Self {
        self.0.extend(errors);
        self
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }
}

pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

pub fn validate_required_field(
    field_name: &str,
    value: Option<&str>,
) -> std::result::Result<(), FieldError> {
    if is_blank(value) {
        return Err(FieldError::new(field_name, "Value is required"));
    }
    Ok(())
}

/// Required, absolute and http(s).
pub fn validate_url(field_name: &str, url_str: Option<&str>) -> std::result::Result<(), FieldError> {
    let url_str = match url_str.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return Err(FieldError::new(field_name, "URL cannot be empty")),
    };

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(FieldError::new(
                field_name,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(FieldError::new(
            field_name,
            format!("Invalid URL format: {}", e),
        )),
    }
}

/// Like [`validate_url`] but blank values pass.
pub fn validate_optional_url(
    field_name: &str,
    url_str: Option<&str>,
) -> std::result::Result<(), FieldError> {
    if is_blank(url_str) {
        return Ok(());
    }
    validate_url(field_name, url_str)
}

pub fn validate_range<T: PartialOrd + fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> std::result::Result<(), FieldError> {
    let in_range = matches!(
        value.partial_cmp(&min),
        Some(Ordering::Greater | Ordering::Equal)
    ) && matches!(
        value.partial_cmp(&max),
        Some(Ordering::Less | Ordering::Equal)
    );
    if !in_range {
        return Err(FieldError::new(
            field_name,
            format!("Value must be between {} and {} (got {})", min, max, value),
        ));
    }
    Ok(())
}

pub fn validate_max_length(
    field_name: &str,
    value: Option<&str>,
    max: usize,
) -> std::result::Result<(), FieldError> {
    let len = value.map_or(0, |v| v.chars().count());
    if len > max {
        return Err(FieldError::new(
            field_name,
            format!("Must be at most {} characters (got {})", max, len),
        ));
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(SeoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(SeoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}
