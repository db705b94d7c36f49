use thiserror::Error;

/// The result type for this crate.
pub type Result<T> = std::result::Result<T, StatError>;

/// An error that can occur while building a [`StatView`](crate::StatView).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatError {
    /// No layout is known for the platform identifier.
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// The raw buffer could not be decoded with the selected layout.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The timestamp lies outside the range of a calendar instant.
    #[error("timestamp out of range: {seconds}s + {nanoseconds}ns")]
    TimeOutOfRange {
        /// Whole seconds since the epoch.
        seconds: i64,
        /// Nanosecond component as read from the record.
        nanoseconds: i64,
    },
}

/// A raw buffer is inconsistent with the layout it is decoded with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Buffer is shorter than the native record.
    #[error("{layout}: buffer too short, expected {expected} bytes, got {actual}")]
    BufferTooShort {
        layout: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Buffer length differs from the native record (exact decoding only).
    #[error("{layout}: length mismatch, expected {expected} bytes, got {actual}")]
    LengthMismatch {
        layout: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A field read ran past the end of the buffer.
    ///
    /// Raised by the field reader itself. The layout decoders check the
    /// length up front, so short input reaches callers as `BufferTooShort`.
    #[error("truncated record while reading {field}")]
    Truncated { field: &'static str },

    /// A field holds a value the view cannot represent.
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}
