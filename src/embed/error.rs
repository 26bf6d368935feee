//! Error types for embed construction.

use thiserror::Error;

/// Error type for embed construction and mutation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmbedError {
    /// The color value lies outside the 24-bit RGB range.
    #[error("color value {0} is out of range [0, 16777215]")]
    ColorNotInRange(u32),

    /// The color string could not be parsed as hexadecimal.
    #[error("`{0}` is not a valid hexadecimal color")]
    InvalidColor(String),

    /// A field index did not refer to an existing embed field.
    #[error("field index {index} is out of range (embed has {len} fields)")]
    FieldIndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of fields currently stored.
        len: usize,
    },
}
