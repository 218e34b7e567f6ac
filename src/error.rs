/*!
 * Error handling for medical coding operations
 *
 * Provides detailed error types with context, suggestions, and a clear split
 * between client input errors and dataset integrity defects.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Medcode library result type
pub type Result<T> = std::result::Result<T, MedcodeError>;

/// Error types for dataset loading, validation, and query handling
#[derive(Error, Debug)]
pub enum MedcodeError {
    /// File I/O errors with context
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
        path: Option<PathBuf>,
    },

    /// CSV parsing errors with location information
    #[error("CSV parsing error at line {line:?}: {message}")]
    CsvParse {
        message: String,
        line: Option<usize>,
        path: Option<PathBuf>,
    },

    /// Errors parsing a dataset file (bad JSON, unknown status value, duplicate entry)
    #[error("Dataset parse error: {message}")]
    DatasetParse {
        message: String,
        path: Option<PathBuf>,
        suggestion: Option<String>,
    },

    /// Invalid free-text query from a caller
    #[error("Invalid query: {message}")]
    InvalidQuery {
        message: String,
        field: String,
    },

    /// Invalid CPT/HCPCS code with format guidance
    #[error("Invalid CPT code '{code}': {reason}")]
    InvalidCptCode {
        code: String,
        reason: String,
        suggestion: String,
    },

    /// A defect in the static datasets, e.g. an advisor rule referencing a
    /// modifier code that is not in the modifier table. Fatal at startup.
    #[error("Data integrity error: {message}")]
    DataIntegrity {
        message: String,
        code: Option<String>,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        suggestion: Option<String>,
    },

    /// Generic errors with custom message
    #[error("{message}")]
    Custom {
        message: String,
        suggestion: Option<String>,
    },
}

impl MedcodeError {
    /// Create an invalid query error for a missing or empty required field
    pub fn invalid_query(field: &str, message: &str) -> Self {
        Self::InvalidQuery {
            message: message.to_string(),
            field: field.to_string(),
        }
    }

    /// Create an invalid CPT code error with validation details
    pub fn invalid_cpt_code(code: &str) -> Self {
        let (reason, suggestion) = if code.is_empty() {
            ("CPT code cannot be empty".to_string(),
             "Provide a 5-character CPT/HCPCS code".to_string())
        } else {
            (format!(
                "CPT codes must be exactly {} characters, found {}",
                crate::constants::CPT_CODE_LEN,
                code.chars().count()
            ),
             "Check the code against the CPT/HCPCS code set; codes look like '71045' or 'G0008'".to_string())
        };

        Self::InvalidCptCode {
            code: code.to_string(),
            reason,
            suggestion,
        }
    }

    /// Create a data integrity error for an unresolvable modifier rule target
    pub fn unknown_rule_modifier(code: &str) -> Self {
        Self::DataIntegrity {
            message: format!(
                "modifier rule references code '{}' which is absent from the modifier table",
                code
            ),
            code: Some(code.to_string()),
        }
    }

    /// Create a data integrity error for a duplicate identifier within a dataset
    pub fn duplicate_code(dataset: &str, code: &str) -> Self {
        Self::DataIntegrity {
            message: format!("duplicate code '{}' in {} dataset", code, dataset),
            code: Some(code.to_string()),
        }
    }

    /// Create a dataset parse error with a file path for context
    pub fn dataset_parse(path: &std::path::Path, message: String) -> Self {
        Self::DatasetParse {
            message,
            path: Some(path.to_path_buf()),
            suggestion: None,
        }
    }

    /// Whether this error should be reported to the caller as a client error
    /// (as opposed to a server-side defect)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidQuery { .. } | Self::InvalidCptCode { .. })
    }

    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidCptCode { suggestion, .. } => {
                format!("{}\n\nSuggestion: {}", self, suggestion)
            }
            Self::DatasetParse { suggestion: Some(sug), .. } => {
                format!("{}\n\nSuggestion: {}", self, sug)
            }
            Self::Configuration { suggestion: Some(sug), .. } => {
                format!("{}\n\nSuggestion: {}", self, sug)
            }
            Self::Custom { suggestion: Some(sug), .. } => {
                format!("{}\n\nSuggestion: {}", self, sug)
            }
            _ => self.to_string(),
        }
    }
}

// Convenience conversions
impl From<std::io::Error> for MedcodeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: err,
            path: None,
        }
    }
}

impl From<csv::Error> for MedcodeError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|pos| pos.line() as usize);

        Self::CsvParse {
            message: err.to_string(),
            line,
            path: None,
        }
    }
}

impl From<serde_json::Error> for MedcodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::DatasetParse {
            message: err.to_string(),
            path: None,
            suggestion: Some("Check that the file is valid JSON with the expected fields.".to_string()),
        }
    }
}
