//! Result and error types for Vitrine.
//!
//! Controllers never fail: missing elements and malformed data attributes
//! degrade to "do nothing" or to a zero value. These errors only cover the
//! host-facing edges (configuration and browser binding).

use thiserror::Error;

/// Result type for Vitrine operations
pub type VitrineResult<T> = Result<T, VitrineError>;

/// Errors that can occur while configuring or mounting the page
#[derive(Debug, Error)]
pub enum VitrineError {
    /// Configuration JSON could not be parsed
    #[error("Invalid page configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    /// A configuration value is out of range
    #[error("Invalid setting `{field}`: {message}")]
    InvalidSetting {
        /// Setting name
        field: &'static str,
        /// Why the value was rejected
        message: String,
    },

    /// No browser window object
    #[error("No window available; not running in a browser")]
    NoWindow,

    /// Window has no document
    #[error("Window has no document")]
    NoDocument,

    /// Attaching a listener or observer failed
    #[error("Failed to bind {target}: {message}")]
    Binding {
        /// What was being bound (event name or observer)
        target: String,
        /// Host error message
        message: String,
    },
}

impl VitrineError {
    /// Create an invalid-setting error
    #[must_use]
    pub fn invalid_setting(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidSetting {
            field,
            message: message.into(),
        }
    }

    /// Create a binding error
    #[must_use]
    pub fn binding(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Binding {
            target: target.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_setting_display() {
        let err = VitrineError::invalid_setting("parallax_factor", "must be finite");
        assert_eq!(
            err.to_string(),
            "Invalid setting `parallax_factor`: must be finite"
        );
    }

    #[test]
    fn test_config_error_from_serde() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: VitrineError = parse.unwrap_err().into();
        assert!(matches!(err, VitrineError::InvalidConfig(_)));
        assert!(err.to_string().starts_with("Invalid page configuration"));
    }

    #[test]
    fn test_binding_display() {
        let err = VitrineError::binding("scroll listener", "TypeError");
        assert_eq!(err.to_string(), "Failed to bind scroll listener: TypeError");
    }
}
