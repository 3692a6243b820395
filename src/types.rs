//! Shared types: [`Component`], [`Components`], [`UnitKind`],
//! [`UnitDescriptor`], and [`SampleWidth`].

use std::fmt;

use crate::{KnetError, Result};

/// Ground-motion direction of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Component {
    /// North-South.
    NorthSouth,
    /// East-West.
    EastWest,
    /// Up-Down.
    UpDown,
}

impl Component {
    /// All components in file order.
    pub const ALL: [Component; 3] = [Self::NorthSouth, Self::EastWest, Self::UpDown];

    /// Short code used in K-NET products ("NS", "EW", "UD").
    pub fn code(self) -> &'static str {
        match self {
            Self::NorthSouth => "NS",
            Self::EastWest => "EW",
            Self::UpDown => "UD",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One value per component, always in NS, EW, UD order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub struct Components<T> {
    pub ns: T,
    pub ew: T,
    pub ud: T,
}

impl<T> Components<T> {
    pub fn new(ns: T, ew: T, ud: T) -> Self {
        Self { ns, ew, ud }
    }

    pub fn get(&self, component: Component) -> &T {
        match component {
            Component::NorthSouth => &self.ns,
            Component::EastWest => &self.ew,
            Component::UpDown => &self.ud,
        }
    }

    pub fn get_mut(&mut self, component: Component) -> &mut T {
        match component {
            Component::NorthSouth => &mut self.ns,
            Component::EastWest => &mut self.ew,
            Component::UpDown => &mut self.ud,
        }
    }

    /// Iterate `(component, value)` pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (Component, &T)> {
        [
            (Component::NorthSouth, &self.ns),
            (Component::EastWest, &self.ew),
            (Component::UpDown, &self.ud),
        ]
        .into_iter()
    }

    pub fn map<U>(self, mut f: impl FnMut(Component, T) -> U) -> Components<U> {
        Components {
            ns: f(Component::NorthSouth, self.ns),
            ew: f(Component::EastWest, self.ew),
            ud: f(Component::UpDown, self.ud),
        }
    }

    /// Like [`map`](Self::map), stopping at the first error.
    pub fn try_map<U>(self, mut f: impl FnMut(Component, T) -> Result<U>) -> Result<Components<U>> {
        Ok(Components {
            ns: f(Component::NorthSouth, self.ns)?,
            ew: f(Component::EastWest, self.ew)?,
            ud: f(Component::UpDown, self.ud)?,
        })
    }
}

/// Physical quantity measured by a channel (low nibble of the unit byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitKind {
    /// Displacement (code 1).
    Length,
    /// Velocity (code 2).
    Velocity,
    /// Acceleration (code 3).
    Acceleration,
    /// Any other code, kept verbatim.
    Undefined(u8),
}

impl UnitKind {
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Self::Length,
            2 => Self::Velocity,
            3 => Self::Acceleration,
            other => Self::Undefined(other),
        }
    }

    pub fn to_code(self) -> u8 {
        match self {
            Self::Length => 1,
            Self::Velocity => 2,
            Self::Acceleration => 3,
            Self::Undefined(code) => code,
        }
    }

    /// SI base unit symbol for this quantity.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Length => "m",
            Self::Velocity => "m/s",
            Self::Acceleration => "m/s^2",
            Self::Undefined(_) => "?",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length => write!(f, "length"),
            Self::Velocity => write!(f, "velocity"),
            Self::Acceleration => write!(f, "acceleration"),
            Self::Undefined(code) => write!(f, "undefined({code})"),
        }
    }
}

/// Unit byte of a calibration block: power-of-ten exponent and quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitDescriptor {
    /// Physical value is scaled by `10^-power`.
    pub power: u8,
    pub kind: UnitKind,
}

impl UnitDescriptor {
    /// Split a raw unit byte into high nibble (power) and low nibble (kind).
    pub fn from_byte(byte: u8) -> Self {
        Self {
            power: byte >> 4,
            kind: UnitKind::from_code(byte & 0x0F),
        }
    }

    pub fn to_byte(self) -> u8 {
        (self.power << 4) | (self.kind.to_code() & 0x0F)
    }
}

impl fmt::Display for UnitDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1e-{} {}", self.power, self.kind.symbol())
    }
}

/// Encoding of the differences in one sample sub-block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleWidth {
    /// Two 4-bit differences per byte (code 0).
    Nibble,
    /// 1-byte signed differences (code 1).
    Int8,
    /// 2-byte signed differences (code 2).
    Int16,
    /// 3-byte signed differences (code 3).
    Int24,
    /// 4-byte signed differences (code 4).
    Int32,
}

impl SampleWidth {
    /// Convert a raw width code (high nibble of the sample header).
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::Nibble),
            1 => Ok(Self::Int8),
            2 => Ok(Self::Int16),
            3 => Ok(Self::Int24),
            4 => Ok(Self::Int32),
            _ => Err(KnetError::UnsupportedSampleWidth(code)),
        }
    }

    pub fn to_code(self) -> u8 {
        match self {
            Self::Nibble => 0,
            Self::Int8 => 1,
            Self::Int16 => 2,
            Self::Int24 => 3,
            Self::Int32 => 4,
        }
    }

    /// Bytes needed for `diffs` differences in this encoding.
    pub fn payload_len(self, diffs: usize) -> usize {
        match self {
            Self::Nibble => diffs.div_ceil(2),
            Self::Int8 => diffs,
            Self::Int16 => diffs * 2,
            Self::Int24 => diffs * 3,
            Self::Int32 => diffs * 4,
        }
    }
}

impl fmt::Display for SampleWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nibble => write!(f, "4-bit"),
            Self::Int8 => write!(f, "8-bit"),
            Self::Int16 => write!(f, "16-bit"),
            Self::Int24 => write!(f, "24-bit"),
            Self::Int32 => write!(f, "32-bit"),
        }
    }
}
