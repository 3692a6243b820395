//! Decoded record type and its metadata view.
//!
//! [`KnetRecord`] holds the three traces of one container together with the
//! parsed [`Header`]. [`Metadata`] is the flattened summary consumers of
//! K-NET products expect, grouped as `Earthquake`, `StationData` and
//! `Recording`.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::header::Header;
use crate::types::{Components, UnitDescriptor};

/// A decoded WIN32 container.
#[derive(Debug, Clone, PartialEq)]
pub struct KnetRecord {
    pub header: Header,
    /// Traces in NS, EW, UD order. Each holds the sum of its own channel's
    /// per-frame counts, so lengths can differ between channels.
    pub traces: Components<Samples>,
}

impl KnetRecord {
    pub fn station(&self) -> &str {
        &self.header.station.code
    }

    /// Samples in each trace.
    pub fn sample_counts(&self) -> Components<usize> {
        Components::new(
            self.traces.ns.len(),
            self.traces.ew.len(),
            self.traces.ud.len(),
        )
    }

    /// Rows NS, EW, UD as floating point values. Rows keep their own
    /// lengths and are not padded.
    pub fn matrix(&self) -> [Vec<f64>; 3] {
        [
            self.traces.ns.to_f64(),
            self.traces.ew.to_f64(),
            self.traces.ud.to_f64(),
        ]
    }

    pub fn metadata(&self) -> Metadata {
        let header = &self.header;
        Metadata {
            earthquake: header.earthquake().map(|eq| EarthquakeSummary {
                origin_time: eq.origin_time,
                latitude: eq.latitude,
                longitude: eq.longitude,
                depth: eq.depth,
                scale: eq.magnitude,
            }),
            station_data: StationData {
                station_id: header.station.code.clone(),
                latitude: header.station.latitude,
                longitude: header.station.longitude,
                elevation: header.station.elevation,
            },
            recording: Recording {
                start_time: header.recording.start_time,
                end_time: header.recording.end_time(),
                sampling_rate: header.recording.sampling_rate,
                channels: header.calibrations.clone().map(|_, cal| ChannelSummary {
                    factor: cal.scale_factor(),
                    offset: cal.offset,
                    unit: cal.unit,
                }),
            },
        }
    }
}

impl fmt::Display for KnetRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts = self.sample_counts();
        write!(
            f,
            "{} | {} | {} Hz | {}/{}/{} samples",
            self.station(),
            self.header.recording.start_time,
            self.header.recording.sampling_rate,
            counts.ns,
            counts.ew,
            counts.ud,
        )?;
        if let Some(eq) = self.header.earthquake() {
            write!(f, " | M{:.1}", eq.magnitude)?;
            if let Some(origin) = eq.origin_time {
                write!(f, " at {origin}")?;
            }
        }
        Ok(())
    }
}

/// Decoded sample data: raw counts, or physical units after scaling.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    Int(Vec<i32>),
    Double(Vec<f64>),
}

impl Samples {
    pub fn len(&self) -> usize {
        match self {
            Samples::Int(v) => v.len(),
            Samples::Double(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_f64(&self) -> Vec<f64> {
        match self {
            Samples::Int(v) => v.iter().map(|&x| x as f64).collect(),
            Samples::Double(v) => v.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metadata {
    #[cfg_attr(
        feature = "serde",
        serde(rename = "Earthquake", skip_serializing_if = "Option::is_none", default)
    )]
    pub earthquake: Option<EarthquakeSummary>,
    #[cfg_attr(feature = "serde", serde(rename = "StationData"))]
    pub station_data: StationData,
    #[cfg_attr(feature = "serde", serde(rename = "Recording"))]
    pub recording: Recording,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "PascalCase"))]
pub struct EarthquakeSummary {
    pub origin_time: Option<DateTime<Utc>>,
    pub latitude: f64,
    pub longitude: f64,
    pub depth: f64,
    #[cfg_attr(feature = "serde", serde(rename = "EQScale"))]
    pub scale: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "PascalCase"))]
pub struct StationData {
    #[cfg_attr(feature = "serde", serde(rename = "StationID"))]
    pub station_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "PascalCase"))]
pub struct Recording {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub sampling_rate: u16,
    pub channels: Components<ChannelSummary>,
}

/// Per-channel calibration summary.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "PascalCase"))]
pub struct ChannelSummary {
    /// `numerator / denominator`; `None` for a zero denominator.
    pub factor: Option<f64>,
    pub offset: i32,
    pub unit: UnitDescriptor,
}
