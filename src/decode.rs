//! Decode a complete WIN32 container from raw bytes.
//!
//! The main entry point is [`decode()`], which parses the header and every
//! sample frame into a [`KnetRecord`] with raw counts. [`decode_with()`]
//! accepts [`DecodeOptions`], e.g. to convert the traces to physical units.

use crate::Result;
use crate::header::read_header;
use crate::reader::ByteReader;
use crate::record::{KnetRecord, Samples};
use crate::scale::to_physical;
use crate::stream::decode_stream;

/// Options for [`decode_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Convert traces with the channel calibrations instead of returning
    /// raw counts.
    pub physical_units: bool,
}

impl DecodeOptions {
    /// Defaults: raw counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether traces are converted to physical units.
    pub fn with_physical_units(mut self, enabled: bool) -> Self {
        self.physical_units = enabled;
        self
    }
}

/// Decode a container into raw-count traces.
pub fn decode(data: &[u8]) -> Result<KnetRecord> {
    decode_with(data, DecodeOptions::default())
}

/// Decode a container with the given options.
pub fn decode_with(data: &[u8], options: DecodeOptions) -> Result<KnetRecord> {
    let mut reader = ByteReader::new(data);
    let header = read_header(&mut reader)?;
    let raw = decode_stream(&mut reader)?;

    let traces = if options.physical_units {
        let calibrations = &header.calibrations;
        raw.try_map(|component, trace| {
            to_physical(component, &trace, calibrations.get(component)).map(Samples::Double)
        })?
    } else {
        raw.map(|_, trace| Samples::Int(trace))
    };

    Ok(KnetRecord { header, traces })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        assert!(!DecodeOptions::new().physical_units);
        assert!(DecodeOptions::new().with_physical_units(true).physical_units);
    }

    #[test]
    fn test_empty_input_is_truncated() {
        assert!(matches!(
            decode(&[]).unwrap_err(),
            crate::KnetError::TruncatedInput { .. }
        ));
    }
}
