//! Conversion between raw counts and physical units.
//!
//! `physical = (raw - offset) * (numerator / denominator) * 10^-power`

use crate::header::ChannelCalibration;
use crate::types::Component;
use crate::{KnetError, Result};

/// Multiplier applied to offset-corrected counts for one channel.
pub fn conversion_factor(component: Component, cal: &ChannelCalibration) -> Result<f64> {
    let factor = cal
        .scale_factor()
        .ok_or(KnetError::InvalidCalibration { component })?;
    Ok(factor * 10f64.powi(-(cal.unit.power as i32)))
}

/// Convert a raw trace to physical units.
pub fn to_physical(
    component: Component,
    trace: &[i32],
    cal: &ChannelCalibration,
) -> Result<Vec<f64>> {
    let factor = conversion_factor(component, cal)?;
    let offset = cal.offset as f64;
    Ok(trace
        .iter()
        .map(|&raw| (raw as f64 - offset) * factor)
        .collect())
}

/// Inverse of [`to_physical`], rounding back to the nearest count.
pub fn to_counts(
    component: Component,
    trace: &[f64],
    cal: &ChannelCalibration,
) -> Result<Vec<i32>> {
    let factor = conversion_factor(component, cal)?;
    let offset = cal.offset as f64;
    Ok(trace
        .iter()
        .map(|&value| (value / factor + offset).round() as i32)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UnitDescriptor;
    use assert_approx_eq::assert_approx_eq;

    fn calibration(numerator: i16, denominator: i32, offset: i32, unit: u8) -> ChannelCalibration {
        ChannelCalibration {
            organization_id: 1,
            observation_id: 2,
            channel_id: 0x10,
            scale_numerator: numerator,
            gain: 1,
            unit: UnitDescriptor::from_byte(unit),
            scale_denominator: denominator,
            offset,
            measurement_range: 2000,
        }
    }

    #[test]
    fn test_to_physical() {
        let cal = calibration(2000, 8_388_608, 100, 0x23);
        let out = to_physical(Component::NorthSouth, &[100, 8_388_708, -8_388_508], &cal).unwrap();
        assert_approx_eq!(out[0], 0.0, 1e-12);
        assert_approx_eq!(out[1], 20.0, 1e-12);
        assert_approx_eq!(out[2], -20.0, 1e-12);
    }

    #[test]
    fn test_negative_scale() {
        let cal = calibration(-5, 2, 0, 0x03);
        let out = to_physical(Component::UpDown, &[4], &cal).unwrap();
        assert_approx_eq!(out[0], -10.0, 1e-12);
    }

    #[test]
    fn test_inverse_recovers_counts() {
        let cal = calibration(3923, 16_777_216, -37, 0x13);
        let raw: Vec<i32> = (-500..500).map(|i| i * 9973).collect();
        let physical = to_physical(Component::EastWest, &raw, &cal).unwrap();
        let back = to_counts(Component::EastWest, &physical, &cal).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn test_zero_denominator() {
        let cal = calibration(1, 0, 0, 0x03);
        match to_physical(Component::EastWest, &[1], &cal).unwrap_err() {
            KnetError::InvalidCalibration { component } => {
                assert_eq!(component, Component::EastWest)
            }
            other => panic!("expected InvalidCalibration, got {other:?}"),
        }
    }
}
