//! Differential sample-stream decoding.
//!
//! After the header, the container is a sequence of frames. Each frame has a
//! 16-byte header (start time, duration, block length) followed by one
//! sub-block per component in NS, EW, UD order:
//!
//! ```text
//! +--------+--------+----------+-------------+----------------+-------------+
//! | org id | obs id | chan id  | width|count | first sample   | differences |
//! |  u8    |  u8    |  u16     | 4b | 12b    | i32            | ...         |
//! +--------+--------+----------+-------------+----------------+-------------+
//! ```
//!
//! The width code selects how the `count - 1` differences are packed: two
//! 4-bit values per byte (code 0, high nibble first), or 1 to 4 byte signed
//! big-endian integers (codes 1 to 4). Samples are rebuilt with a running
//! sum seeded by the first sample. The declared block length is not checked
//! against the bytes actually consumed.

use chrono::{DateTime, Utc};

use crate::Result;
use crate::reader::{ByteReader, i24_from_be_bytes, sign_extend};
use crate::time::decode_jst_timestamp;
use crate::types::{Component, Components, SampleWidth};

/// Fixed part of every frame: time (8), duration (4), block length (4).
pub const FRAME_HEADER_SIZE: usize = 16;

const SAMPLE_COUNT_MASK: u16 = 0x0FFF;

/// One decoded frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleFrame {
    pub start_time: DateTime<Utc>,
    /// Frame duration in tenths of a second.
    pub duration: i32,
    /// Declared byte length of the frame's data block (not validated).
    pub block_length: i32,
    pub channels: Components<SampleSubBlock>,
}

/// One component's samples within a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSubBlock {
    pub organization_id: u8,
    pub observation_id: u8,
    pub channel_id: u16,
    pub width: SampleWidth,
    /// Absolute sample values.
    pub samples: Vec<i32>,
}

/// Sub-block fields that precede the sample payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SubBlockHeader {
    organization_id: u8,
    observation_id: u8,
    channel_id: u16,
    width: SampleWidth,
    count: usize,
}

/// Decode every remaining frame into three traces.
///
/// Each trace's length is the sum of that component's sample counts over all
/// frames.
pub fn decode_stream(r: &mut ByteReader<'_>) -> Result<Components<Vec<i32>>> {
    let mut traces: Components<Vec<i32>> = Components::default();
    let mut frames = 0usize;

    while !r.is_empty() {
        let frame_offset = r.position();
        // Start time is advisory here; FrameReader decodes it.
        r.skip(8)?;
        let duration = r.read_i32()?;
        let block_length = r.read_i32()?;

        for component in Component::ALL {
            let trace = traces.get_mut(component);
            let sub = read_sub_block_into(r, trace)?;
            log::trace!(
                "frame {frames} @{frame_offset}: {component} {} samples ({}), \
                 duration {duration}, block length {block_length}",
                sub.count,
                sub.width
            );
        }
        frames += 1;
    }

    log::debug!(
        "decoded {frames} frames: NS {} / EW {} / UD {} samples",
        traces.ns.len(),
        traces.ew.len(),
        traces.ud.len()
    );
    Ok(traces)
}

/// Read one complete frame.
pub fn read_frame(r: &mut ByteReader<'_>) -> Result<SampleFrame> {
    let start_time = decode_jst_timestamp(&r.read_array()?)?;
    let duration = r.read_i32()?;
    let block_length = r.read_i32()?;
    let channels = Components {
        ns: read_sub_block(r)?,
        ew: read_sub_block(r)?,
        ud: read_sub_block(r)?,
    };
    Ok(SampleFrame {
        start_time,
        duration,
        block_length,
        channels,
    })
}

fn read_sub_block(r: &mut ByteReader<'_>) -> Result<SampleSubBlock> {
    let mut samples = Vec::new();
    let header = read_sub_block_into(r, &mut samples)?;
    Ok(SampleSubBlock {
        organization_id: header.organization_id,
        observation_id: header.observation_id,
        channel_id: header.channel_id,
        width: header.width,
        samples,
    })
}

/// Read a sub-block and append its absolute samples to `out`.
fn read_sub_block_into(r: &mut ByteReader<'_>, out: &mut Vec<i32>) -> Result<SubBlockHeader> {
    let organization_id = r.read_u8()?;
    let observation_id = r.read_u8()?;
    let channel_id = r.read_u16()?;
    let packed = r.read_u16()?;
    let width = SampleWidth::from_code((packed >> 12) as u8)?;
    let count = (packed & SAMPLE_COUNT_MASK) as usize;

    if count > 0 {
        out.reserve(count);
        let first = r.read_i32()?;
        out.push(first);
        decode_differences(r, width, first, count - 1, out)?;
    }

    Ok(SubBlockHeader {
        organization_id,
        observation_id,
        channel_id,
        width,
        count,
    })
}

/// Decode `diffs` packed differences, pushing the running sum after each.
///
/// In nibble mode an odd number of differences leaves the low nibble of the
/// last byte unused.
pub fn decode_differences(
    r: &mut ByteReader<'_>,
    width: SampleWidth,
    first: i32,
    diffs: usize,
    out: &mut Vec<i32>,
) -> Result<()> {
    let payload = r.read_bytes(width.payload_len(diffs))?;
    let mut acc = first;
    let mut push = |diff: i32| {
        acc = acc.wrapping_add(diff);
        out.push(acc);
    };

    match width {
        SampleWidth::Nibble => {
            for i in 0..diffs {
                let byte = payload[i / 2];
                let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0F };
                push(sign_extend(nibble as u32, 4));
            }
        }
        SampleWidth::Int8 => payload.iter().for_each(|&b| push(b as i8 as i32)),
        SampleWidth::Int16 => payload
            .chunks_exact(2)
            .for_each(|c| push(i16::from_be_bytes([c[0], c[1]]) as i32)),
        SampleWidth::Int24 => payload
            .chunks_exact(3)
            .for_each(|c| push(i24_from_be_bytes([c[0], c[1], c[2]]))),
        SampleWidth::Int32 => payload
            .chunks_exact(4)
            .for_each(|c| push(i32::from_be_bytes([c[0], c[1], c[2], c[3]]))),
    }
    Ok(())
}

/// Iterator over the frames of a sample stream.
///
/// Iteration stops when the data is exhausted or after the first error.
///
/// # Example
///
/// ```
/// use knet_rs::{ByteReader, FrameReader};
///
/// let frames: Vec<_> = FrameReader::new(ByteReader::new(&[])).collect();
/// assert!(frames.is_empty());
/// ```
pub struct FrameReader<'a> {
    reader: ByteReader<'a>,
    failed: bool,
}

impl<'a> FrameReader<'a> {
    /// Iterate frames starting at the reader's current position.
    pub fn new(reader: ByteReader<'a>) -> Self {
        Self {
            reader,
            failed: false,
        }
    }

    /// Byte offset of the next frame.
    pub fn position(&self) -> usize {
        self.reader.position()
    }
}

impl Iterator for FrameReader<'_> {
    type Item = Result<SampleFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.reader.is_empty() {
            return None;
        }
        let frame = read_frame(&mut self.reader);
        if frame.is_err() {
            self.failed = true;
        }
        Some(frame)
    }
}
