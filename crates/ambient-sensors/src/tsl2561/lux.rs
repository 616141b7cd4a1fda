//! Fixed point lux approximation from the TSL2561 datasheet (TAOS).
//!
//! Everything is scaled to the 402ms, 16x reference. The ratio of infrared to
//! full spectrum light picks a line segment `lux = ch0 * b - ch1 * m` from a
//! table that differs per package.

use super::config::{Gain, IntegrationTime, LightSensorConfig, Package};
use super::RawChannels;

const LUX_SCALE: u32 = 14;
const RATIO_SCALE: u32 = 9;
const CH_SCALE: u32 = 10;

const CH_SCALE_13MS: u64 = 0x7517;
const CH_SCALE_101MS: u64 = 0x0FE7;

/// One segment of the piecewise linear lux model. Applies to ratios up to and
/// including `ratio`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoint {
    pub ratio: u32,
    pub b: u32,
    pub m: u32,
}

const fn bp(ratio: u32, b: u32, m: u32) -> Breakpoint {
    Breakpoint { ratio, b, m }
}

pub const T_PACKAGE: [Breakpoint; 8] = [
    bp(0x0040, 0x01F2, 0x01BE),
    bp(0x0080, 0x0214, 0x02D1),
    bp(0x00C0, 0x023F, 0x037B),
    bp(0x0100, 0x0270, 0x03FE),
    bp(0x0138, 0x016F, 0x01FC),
    bp(0x019A, 0x00D2, 0x00FB),
    bp(0x029A, 0x0018, 0x0012),
    bp(0x029A, 0x0000, 0x0000),
];

/// The last segments share their bounds with the T package, only the
/// coefficients differ.
pub const CS_PACKAGE: [Breakpoint; 8] = [
    bp(0x0043, 0x0204, 0x01AD),
    bp(0x0085, 0x0228, 0x02C1),
    bp(0x00C8, 0x0253, 0x0363),
    bp(0x010A, 0x0282, 0x03DF),
    bp(0x0138, 0x0177, 0x01DD),
    bp(0x019A, 0x0101, 0x0127),
    bp(0x029A, 0x0037, 0x002B),
    bp(0x029A, 0x0000, 0x0000),
];

impl Package {
    pub fn calibration(self) -> &'static [Breakpoint; 8] {
        match self {
            Package::T => &T_PACKAGE,
            Package::Cs => &CS_PACKAGE,
        }
    }
}

/// Result of a light measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Illuminance {
    Lux(u32),
    /// One of the channels clipped, there is too much light for the current
    /// integration time.
    Saturated,
}

impl Illuminance {
    /// Lux, saturated readings count as zero.
    pub fn lux(self) -> u32 {
        match self {
            Illuminance::Lux(lux) => lux,
            Illuminance::Saturated => 0,
        }
    }

    pub fn is_saturated(self) -> bool {
        self == Illuminance::Saturated
    }
}

/// Clipping check followed by the lux model.
pub fn illuminance(channels: RawChannels, config: &LightSensorConfig) -> Illuminance {
    let threshold = config.integration_time.clipping_threshold();
    if channels.channel0 >= threshold || channels.channel1 >= threshold {
        return Illuminance::Saturated;
    }
    Illuminance::Lux(calculate_lux(channels, config))
}

/// Lux for a pair of raw counts taken with `config`. Does not check for
/// clipping, use [`illuminance`] for that.
pub fn calculate_lux(channels: RawChannels, config: &LightSensorConfig) -> u32 {
    let scale = channel_scale(config.integration_time, config.gain);
    let channel0 = (u64::from(channels.channel0) * scale) >> CH_SCALE;
    let channel1 = (u64::from(channels.channel1) * scale) >> CH_SCALE;

    let ratio = ratio(channel0, channel1);
    let table = config.package.calibration();
    let Breakpoint { b, m, .. } = table[breakpoint_index(table, ratio)];

    let raw = channel0 as i64 * i64::from(b) - channel1 as i64 * i64::from(m);
    let raw = raw.max(0) as u64;
    let lux = (raw + (1 << (LUX_SCALE - 1))) >> LUX_SCALE;
    lux as u32
}

fn channel_scale(time: IntegrationTime, gain: Gain) -> u64 {
    let scale = match time {
        IntegrationTime::Ms13 => CH_SCALE_13MS,
        IntegrationTime::Ms101 => CH_SCALE_101MS,
        IntegrationTime::Ms402 => 1 << CH_SCALE,
    };
    match gain {
        Gain::X1 => scale << 4,
        Gain::X16 => scale,
    }
}

/// Infrared over full spectrum in units of 2^-9, rounded.
fn ratio(channel0: u64, channel1: u64) -> u64 {
    let unrounded = if channel0 == 0 {
        0
    } else {
        (channel1 << (RATIO_SCALE + 1)) / channel0
    };
    (unrounded + 1) >> 1
}

/// Index of the first breakpoint that covers `ratio`, the last one covers
/// everything beyond.
pub fn breakpoint_index(table: &[Breakpoint; 8], ratio: u64) -> usize {
    table
        .iter()
        .position(|bp| ratio <= u64::from(bp.ratio))
        .unwrap_or(table.len() - 1)
}
