use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Unknown column: {name}")]
    ColumnNotFound { name: String },

    #[error("Column '{name}' is not numeric")]
    NonNumericColumn { name: String },

    #[error("Chart rendering failed: {message}")]
    ChartError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, StatsError>;
