//! Error types for K-NET WIN32 decoding.

use thiserror::Error;

use crate::types::Component;

#[derive(Debug, Error)]
pub enum KnetError {
    #[error("bad magic at offset {offset}: expected {expected:02X?}, found {found:02X?}")]
    Format {
        offset: usize,
        expected: [u8; 4],
        found: [u8; 4],
    },

    #[error("invalid packed-decimal field: {digits}")]
    InvalidBcd { digits: String },

    #[error("input truncated at offset {offset}: needed {needed} bytes, {available} available")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("unsupported sample width code: {0}")]
    UnsupportedSampleWidth(u8),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("station code is not ASCII")]
    InvalidStationCode,

    #[error("{component} calibration has a zero scale denominator")]
    InvalidCalibration { component: Component },
}

pub type Result<T> = std::result::Result<T, KnetError>;
