//! Builds synthetic WIN32 containers for integration tests and benchmarks.

#![allow(dead_code)]

pub const START_TIME: [u8; 8] = [0x20, 0x24, 0x01, 0x01, 0x16, 0x10, 0x00, 0x00];

/// One component's sub-block: width code, first sample, encoded differences.
#[derive(Clone)]
pub struct SubBlock {
    pub width: u8,
    pub count: u16,
    pub first: i32,
    pub payload: Vec<u8>,
}

impl SubBlock {
    /// Encode `samples` with fixed-size differences of `width` bytes (1..=4).
    pub fn fixed(width: u8, samples: &[i32]) -> Self {
        let mut payload = Vec::new();
        for pair in samples.windows(2) {
            let diff = pair[1].wrapping_sub(pair[0]);
            let bytes = diff.to_be_bytes();
            payload.extend_from_slice(&bytes[4 - width as usize..]);
        }
        Self {
            width,
            count: samples.len() as u16,
            first: samples.first().copied().unwrap_or(0),
            payload,
        }
    }

    /// Encode `samples` as 4-bit differences, padding with `pad` when the
    /// number of differences is odd.
    pub fn nibbles(samples: &[i32], pad: u8) -> Self {
        let mut nibbles: Vec<u8> = samples
            .windows(2)
            .map(|p| (p[1] - p[0]) as u8 & 0x0F)
            .collect();
        if nibbles.len() % 2 == 1 {
            nibbles.push(pad & 0x0F);
        }
        let payload = nibbles.chunks(2).map(|c| (c[0] << 4) | c[1]).collect();
        Self {
            width: 0,
            count: samples.len() as u16,
            first: samples.first().copied().unwrap_or(0),
            payload,
        }
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[0x01, 0x02, 0x00, 0x10]);
        out.extend_from_slice(&(((self.width as u16) << 12) | self.count).to_be_bytes());
        if self.count > 0 {
            out.extend_from_slice(&self.first.to_be_bytes());
        }
        out.extend_from_slice(&self.payload);
    }
}

/// Channel calibration block fields.
#[derive(Clone, Copy)]
pub struct Calibration {
    pub numerator: i16,
    pub unit: u8,
    pub denominator: i32,
    pub offset: i32,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            numerator: 2000,
            unit: 0x23,
            denominator: 8_388_608,
            offset: 0,
        }
    }
}

pub struct ContainerBuilder {
    pub station: &'static str,
    pub with_earthquake: bool,
    pub calibrations: [Calibration; 3],
    pub frames: Vec<[SubBlock; 3]>,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self {
            station: "IBR003",
            with_earthquake: false,
            calibrations: [Calibration::default(); 3],
            frames: Vec::new(),
        }
    }

    pub fn earthquake(mut self, present: bool) -> Self {
        self.with_earthquake = present;
        self
    }

    pub fn calibrations(mut self, calibrations: [Calibration; 3]) -> Self {
        self.calibrations = calibrations;
        self
    }

    pub fn frame(mut self, ns: SubBlock, ew: SubBlock, ud: SubBlock) -> Self {
        self.frames.push([ns, ew, ud]);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut b = Vec::new();
        b.extend_from_slice(&[0x0A, 0x02, 0x00, 0x00]);
        b.extend_from_slice(&[0x0C, 0x00, 0x00, 0x00]);
        b.extend_from_slice(&[0x01, 0x02, 0x00, 0x07]);
        let length: u32 = if self.with_earthquake { 144 } else { 116 };
        b.extend_from_slice(&length.to_be_bytes());
        b.extend_from_slice(&[0x00, 0x01, 0x00, 0x70]);
        b.extend_from_slice(&[0x03, 0x61, 0x23, 0x45]);
        b.extend_from_slice(&[0x14, 0x01, 0x23, 0x4E]);
        b.extend_from_slice(&[0x00, 0x00, 0x25, 0x10]);
        let mut code = [0u8; 12];
        code[..self.station.len()].copy_from_slice(self.station.as_bytes());
        b.extend_from_slice(&code);
        b.extend_from_slice(&START_TIME);
        let duration_tenths = (self.frames.len() as u32) * 10;
        b.extend_from_slice(&duration_tenths.to_be_bytes());
        b.extend_from_slice(&[0x20, 0x23, 0x06, 0x01, 0x00, 0x00, 0x00, 0x00]);
        b.extend_from_slice(&[0x01, 0x02, 0x12, 0x34, 0x00, 0x64, 0x03, 0x00]);
        for cal in &self.calibrations {
            b.extend_from_slice(&[0x01, 0x02, 0x00, 0x10]);
            b.extend_from_slice(&cal.numerator.to_be_bytes());
            b.push(0x01);
            b.push(cal.unit);
            b.extend_from_slice(&cal.denominator.to_be_bytes());
            b.extend_from_slice(&cal.offset.to_be_bytes());
            b.extend_from_slice(&2000i32.to_be_bytes());
        }
        if self.with_earthquake {
            b.extend_from_slice(&[0x00, 0x02, 0x00, 0x18]);
            b.extend_from_slice(&[0x20, 0x24, 0x01, 0x01, 0x16, 0x09, 0x50, 0x00]);
            b.extend_from_slice(&[0x03, 0x74, 0x50, 0x00]);
            b.extend_from_slice(&[0x13, 0x72, 0x20, 0x00]);
            b.extend_from_slice(&[0x00, 0x01, 0x00, 0x00]);
            b.push(0x76);
            b.extend_from_slice(&[0x01, 0x02, 0x00]);
        }
        for subs in &self.frames {
            let mut body = Vec::new();
            for sub in subs {
                sub.encode(&mut body);
            }
            b.extend_from_slice(&START_TIME);
            b.extend_from_slice(&10i32.to_be_bytes());
            b.extend_from_slice(&((16 + body.len()) as i32).to_be_bytes());
            b.extend(body);
        }
        b
    }
}
