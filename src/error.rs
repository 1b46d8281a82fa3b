//! Error types for the bfloat16 library.

/// Error returned when text or a structured value can't become a `BFloat16`.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The string is not a decimal number, `inf`/`infinity` or `nan`
    Parse { input: String },
    /// A finite value whose magnitude exceeds `BFloat16::MAX`
    OutOfRange { value: f64 },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Parse { input } => write!(f, "invalid bfloat16 literal: {input:?}"),
            Error::OutOfRange { value } => {
                write!(f, "value {value} is outside the finite bfloat16 range")
            }
        }
    }
}

impl std::error::Error for Error {}

/// Result alias for fallible bfloat16 operations.
pub type Result<T> = std::result::Result<T, Error>;
