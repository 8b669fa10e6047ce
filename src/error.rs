use thiserror::Error;

/// Errors returned by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// A point record could not be parsed.
    #[error("malformed record at line {line}: {message}")]
    Parse {
        /// 1-based line number of the offending record.
        line: usize,
        /// Human-readable explanation.
        message: String,
    },

    /// Underlying I/O failure while reading or writing point records.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
