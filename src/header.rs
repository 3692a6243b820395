//! Fixed-layout header of a WIN32 strong-motion container.
//!
//! The header is a 4-byte container marker, a 4-byte information block
//! marker, a 116-byte station information block (with three 20-byte channel
//! calibration blocks), and, when the information block length field is
//! [`EARTHQUAKE_BLOCK_LENGTH`], a 28-byte earthquake information block.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::bcd::BcdField;
use crate::reader::ByteReader;
use crate::time::{self, decode_jst_timestamp, decode_timestamp};
use crate::types::{Component, Components, UnitDescriptor};
use crate::{KnetError, Result};

/// Marker at the start of every container.
pub const CONTAINER_MAGIC: [u8; 4] = [0x0A, 0x02, 0x00, 0x00];

/// Marker at the start of the information block.
pub const INFO_BLOCK_MAGIC: [u8; 4] = [0x0C, 0x00, 0x00, 0x00];

/// Information block length announcing an earthquake block.
pub const EARTHQUAKE_BLOCK_LENGTH: u32 = 144;

const STATION_CODE_LEN: usize = 12;

/// Observation point information.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StationMetadata {
    pub code: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Metres above sea level.
    pub elevation: f64,
    pub geodetic_system: u8,
    pub organization_id: u8,
    pub network_id: u8,
    pub seismograph_number: u16,
    pub seismometer_model: u16,
}

/// Recording parameters from the station information block.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordingParams {
    pub start_time: DateTime<Utc>,
    /// Measurement duration in tenths of a second.
    pub duration_tenths: u32,
    /// Samples per second.
    pub sampling_rate: u16,
    pub components: u8,
    pub relocation_flag: u8,
    pub calibration_method: u8,
    /// `None` when the field holds no valid date (e.g. never calibrated).
    pub last_calibration: Option<NaiveDateTime>,
}

impl RecordingParams {
    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time + time::tenths_to_delta(self.duration_tenths)
    }
}

/// Calibration of one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelCalibration {
    pub organization_id: u8,
    pub observation_id: u8,
    pub channel_id: u16,
    pub scale_numerator: i16,
    pub gain: u8,
    pub unit: UnitDescriptor,
    pub scale_denominator: i32,
    pub offset: i32,
    pub measurement_range: i32,
}

impl ChannelCalibration {
    /// Counts-to-unit factor `numerator / denominator`, or `None` when the
    /// denominator is zero.
    pub fn scale_factor(&self) -> Option<f64> {
        if self.scale_denominator == 0 {
            return None;
        }
        Some(self.scale_numerator as f64 / self.scale_denominator as f64)
    }

    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        let organization_id = r.read_u8()?;
        let observation_id = r.read_u8()?;
        let channel_id = r.read_u16()?;
        let scale_numerator = r.read_i16()?;
        let gain = r.read_u8()?;
        let unit = UnitDescriptor::from_byte(r.read_u8()?);
        let scale_denominator = r.read_i32()?;
        let offset = r.read_i32()?;
        let measurement_range = r.read_i32()?;
        Ok(Self {
            organization_id,
            observation_id,
            channel_id,
            scale_numerator,
            gain,
            unit,
            scale_denominator,
            offset,
            measurement_range,
        })
    }
}

/// Earthquake origin information.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EarthquakeInfo {
    /// `None` when the field does not hold a valid date.
    pub origin_time: Option<DateTime<Utc>>,
    pub latitude: f64,
    pub longitude: f64,
    /// Kilometres.
    pub depth: f64,
    pub magnitude: f64,
    pub geodetic_system: u8,
    pub epicenter_type: u8,
}

impl EarthquakeInfo {
    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        let _info_type = r.read_i16()?;
        let _info_size = r.read_i16()?;
        let origin_raw: [u8; 8] = r.read_array()?;
        let origin_time = match decode_jst_timestamp(&origin_raw) {
            Ok(ts) => Some(ts),
            Err(e) => {
                log::debug!("ignoring earthquake origin time: {e}");
                None
            }
        };
        let latitude = BcdField::LATITUDE.decode(r.read_bytes(4)?)?;
        let longitude = BcdField::LONGITUDE.decode(r.read_bytes(4)?)?;
        let depth = BcdField::DEPTH.decode(r.read_bytes(4)?)?;
        let magnitude = BcdField::MAGNITUDE.decode(r.read_bytes(1)?)?;
        let geodetic_system = r.read_u8()?;
        let epicenter_type = r.read_u8()?;
        r.skip(1)?; // reserved
        Ok(Self {
            origin_time,
            latitude,
            longitude,
            depth,
            magnitude,
            geodetic_system,
            epicenter_type,
        })
    }
}

/// Earthquake block presence, decided by the information block length.
#[derive(Debug, Clone, PartialEq)]
pub enum EventBlock {
    WithEarthquake(EarthquakeInfo),
    WithoutEarthquake,
}

impl EventBlock {
    pub fn earthquake(&self) -> Option<&EarthquakeInfo> {
        match self {
            Self::WithEarthquake(info) => Some(info),
            Self::WithoutEarthquake => None,
        }
    }
}

/// Parsed container header.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub station: StationMetadata,
    pub recording: RecordingParams,
    pub calibrations: Components<ChannelCalibration>,
    pub event: EventBlock,
    /// Information block length field (144 when an earthquake block follows).
    pub info_block_length: u32,
    pub info_type: u16,
    pub info_size: u16,
    /// Byte offset where the sample frames begin.
    pub data_offset: usize,
}

impl Header {
    pub fn calibration(&self, component: Component) -> &ChannelCalibration {
        self.calibrations.get(component)
    }

    pub fn earthquake(&self) -> Option<&EarthquakeInfo> {
        self.event.earthquake()
    }
}

/// Parse the header at the start of `data`.
pub fn parse_header(data: &[u8]) -> Result<Header> {
    let mut r = ByteReader::new(data);
    read_header(&mut r)
}

/// Parse the header, leaving `r` at the first sample frame.
pub fn read_header(r: &mut ByteReader<'_>) -> Result<Header> {
    r.expect_magic(CONTAINER_MAGIC)?;
    r.expect_magic(INFO_BLOCK_MAGIC)?;

    let organization_id = r.read_u8()?;
    let network_id = r.read_u8()?;
    let seismograph_number = r.read_u16()?;
    let info_block_length = r.read_u32()?;

    let info_type = r.read_u16()?;
    let info_size = r.read_u16()?;

    let latitude = BcdField::LATITUDE.decode(r.read_bytes(4)?)?;
    let longitude = BcdField::LONGITUDE.decode(r.read_bytes(4)?)?;
    let elevation = BcdField::ELEVATION.decode(r.read_bytes(4)?)?;
    let code = read_station_code(r.read_bytes(STATION_CODE_LEN)?)?;

    let start_time = decode_jst_timestamp(&r.read_array()?)?;
    let duration_tenths = r.read_u32()?;
    let calibration_raw: [u8; 8] = r.read_array()?;
    let last_calibration = match decode_timestamp(&calibration_raw) {
        Ok(ts) => Some(ts),
        Err(e) => {
            log::debug!("station {code}: ignoring last calibration time: {e}");
            None
        }
    };
    let calibration_method = r.read_u8()?;
    let geodetic_system = r.read_u8()?;
    let seismometer_model = r.read_u16()?;
    let sampling_rate = r.read_u16()?;
    let components = r.read_u8()?;
    let relocation_flag = r.read_u8()?;

    let calibrations = Components {
        ns: ChannelCalibration::read(r)?,
        ew: ChannelCalibration::read(r)?,
        ud: ChannelCalibration::read(r)?,
    };

    let event = if info_block_length == EARTHQUAKE_BLOCK_LENGTH {
        EventBlock::WithEarthquake(EarthquakeInfo::read(r)?)
    } else {
        EventBlock::WithoutEarthquake
    };

    log::debug!(
        "station {code} ({latitude}, {longitude}) at {sampling_rate} Hz, start {start_time}, \
         earthquake block: {}",
        event.earthquake().is_some()
    );

    Ok(Header {
        station: StationMetadata {
            code,
            latitude,
            longitude,
            elevation,
            geodetic_system,
            organization_id,
            network_id,
            seismograph_number,
            seismometer_model,
        },
        recording: RecordingParams {
            start_time,
            duration_tenths,
            sampling_rate,
            components,
            relocation_flag,
            calibration_method,
            last_calibration,
        },
        calibrations,
        event,
        info_block_length,
        info_type,
        info_size,
        data_offset: r.position(),
    })
}

fn read_station_code(raw: &[u8]) -> Result<String> {
    if !raw.is_ascii() {
        return Err(KnetError::InvalidStationCode);
    }
    let end = raw.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    Ok(String::from_utf8_lossy(&raw[..end]).into_owned())
}
