//! Pure Rust decoder for K-NET/KiK-net WIN32 strong-motion records.
//!
//! Zero `unsafe`. Parses the fixed header (station, calibration and optional
//! earthquake blocks, packed-decimal coordinates and JST timestamps) and the
//! differential sample stream (4-bit to 32-bit differences) into three
//! traces in NS, EW, UD order.
//!
//! # Decoding a container
//!
//! ```no_run
//! use knet_rs::{decode_with, DecodeOptions};
//!
//! let bytes = std::fs::read("AKT0010403281102.kwin").unwrap();
//! let record = decode_with(&bytes, DecodeOptions::new().with_physical_units(true)).unwrap();
//!
//! println!("{record}");
//! let [ns, ew, ud] = record.matrix();
//! assert_eq!(ns.len(), ew.len());
//! assert_eq!(ew.len(), ud.len());
//!
//! let meta = record.metadata();
//! if let Some(eq) = &meta.earthquake {
//!     println!("M{} at depth {} km", eq.scale, eq.depth);
//! }
//! ```
//!
//! # Packed-decimal fields
//!
//! ```
//! use knet_rs::BcdField;
//!
//! // 0xE in the last nibble shifts the decimal point one place right
//! let lat = BcdField::LATITUDE.decode(&[0x03, 0x61, 0x23, 0x4E]).unwrap();
//! assert_eq!(lat, 36.1234);
//! ```
//!
//! # Errors
//!
//! Malformed input never panics; it yields a [`KnetError`]:
//!
//! ```
//! use knet_rs::{decode, KnetError};
//!
//! let err = decode(&[0xFF, 0xFF, 0xFF, 0xFF]).unwrap_err();
//! assert!(matches!(err, KnetError::Format { offset: 0, .. }));
//! ```

pub mod bcd;
pub mod decode;
pub mod error;
pub mod header;
pub mod reader;
pub mod record;
pub mod scale;
pub mod stream;
pub mod time;
pub mod types;

pub use bcd::{BcdField, decode_bcd};
pub use error::{KnetError, Result};
pub use header::{
    ChannelCalibration, EarthquakeInfo, EventBlock, Header, RecordingParams, StationMetadata,
    parse_header,
};
pub use reader::ByteReader;
pub use record::{KnetRecord, Metadata, Samples};
pub use stream::{FrameReader, SampleFrame, SampleSubBlock};
pub use types::{Component, Components, SampleWidth, UnitDescriptor, UnitKind};

pub use decode::{DecodeOptions, decode, decode_with};
