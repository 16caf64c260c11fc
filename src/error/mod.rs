//! Error handling for the early-warning analysis crate.

/// Specialized error type for analysis operations
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Error opening or reading a file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error reading or writing CSV data
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error parsing a JSON run configuration
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Structural configuration error that invalidates the whole run
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A required column is missing from an input table
    #[error("Missing column '{column}' in {path}")]
    MissingColumn {
        /// Name of the missing column
        column: String,
        /// Path of the file that was read
        path: String,
    },
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
