use thiserror::Error;

#[derive(Debug, Error)]
pub enum BizValError {
    /// Missing or malformed required input (e.g. fewer than ten grades).
    #[error("Invalid input: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// A grade value outside A, B, C, D, F.
    #[error("Invalid grade for {field}: {reason}")]
    InvalidGrade { field: String, reason: String },

    /// Malformed NAICS reference data. Fatal at startup.
    #[error("Reference data error at NAICS code '{code}': {reason}")]
    Config { code: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl BizValError {
    /// True for errors caused by the caller's submission rather than by
    /// the process configuration.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            BizValError::Validation { .. } | BizValError::InvalidGrade { .. }
        )
    }
}

impl From<serde_json::Error> for BizValError {
    fn from(e: serde_json::Error) -> Self {
        BizValError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for BizValError {
    fn from(e: std::io::Error) -> Self {
        BizValError::Io(e.to_string())
    }
}

impl From<serde_yaml::Error> for BizValError {
    fn from(e: serde_yaml::Error) -> Self {
        BizValError::Serialization(e.to_string())
    }
}
