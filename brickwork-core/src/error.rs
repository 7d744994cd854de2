//! Error types for Brickwork

use thiserror::Error;

/// The main error type for Brickwork operations
#[derive(Error, Debug)]
pub enum Error {
    /// A clause whose shape cannot be rendered into valid SQL
    #[error("Malformed clause: {message}")]
    MalformedClause { message: String },

    /// Unknown dialect option, or a value the option does not accept
    #[error("Unsupported option '{name}' = '{value}'")]
    UnsupportedOption { name: String, value: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience Result type for Brickwork operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new malformed clause error
    pub fn malformed_clause(message: impl Into<String>) -> Self {
        Self::MalformedClause {
            message: message.into(),
        }
    }

    /// Create a new unsupported option error
    pub fn unsupported_option(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::UnsupportedOption {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_clause_error() {
        let err = Error::malformed_clause("IN requires at least one value");
        assert!(matches!(err, Error::MalformedClause { .. }));
        assert_eq!(
            err.to_string(),
            "Malformed clause: IN requires at least one value"
        );
    }

    #[test]
    fn test_unsupported_option_error() {
        let err = Error::unsupported_option("quoteChar", "[");
        assert!(matches!(err, Error::UnsupportedOption { .. }));
        assert_eq!(err.to_string(), "Unsupported option 'quoteChar' = '['");
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(err.to_string().starts_with("Serialization error:"));
    }
}
