/// Error types for mesh loading and figure assembly
use thiserror::Error;

/// A malformed or degenerate mesh source.
///
/// Line numbers are one-based and refer to the line of the offending record.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("line {line}: `{record}` record ends before all fields were read")]
    Truncated { line: usize, record: &'static str },

    #[error("line {line}: `{token}` is not a valid number")]
    InvalidNumber { line: usize, token: String },

    #[error("line {line}: `{record}` record has a NaN or infinite component")]
    NonFinite { line: usize, record: &'static str },

    #[error("line {line}: face index must be one-based, got 0")]
    InvalidIndex { line: usize },

    #[error("face index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("mesh has {positions} positions but {normals} normals")]
    AttributeMismatch { positions: usize, normals: usize },

    #[error("normal {index} has zero or non-finite length")]
    DegenerateNormal { index: usize },

    #[error("mesh extent is degenerate (scale factor {scaler})")]
    DegenerateExtent { scaler: f32 },
}

/// Errors raised while loading named assets.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read asset `{name}`")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse asset `{name}`")]
    Parse {
        name: String,
        #[source]
        source: ParseError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
