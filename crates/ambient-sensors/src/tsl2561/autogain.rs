use super::config::{Gain, IntegrationTime};

/// Range of channel 0 counts that is accepted without switching gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Window {
    pub(crate) low: u16,
    pub(crate) high: u16,
}

impl Window {
    pub(crate) const fn for_integration_time(time: IntegrationTime) -> Self {
        match time {
            // full scale is 5047
            IntegrationTime::Ms13 => Self {
                low: 100,
                high: 4850,
            },
            // full scale is 37177
            IntegrationTime::Ms101 => Self {
                low: 200,
                high: 36000,
            },
            IntegrationTime::Ms402 => Self {
                low: 500,
                high: 63000,
            },
        }
    }
}

/// What to do with the first reading of a measurement. A retaken reading is
/// never judged again, so a measurement needs at most two reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    Accept,
    Retake { gain: Gain },
}

pub(crate) fn judge(time: IntegrationTime, gain: Gain, channel0: u16) -> Verdict {
    let window = Window::for_integration_time(time);
    match gain {
        Gain::X1 if channel0 < window.low => Verdict::Retake { gain: Gain::X16 },
        Gain::X16 if channel0 > window.high => Verdict::Retake { gain: Gain::X1 },
        _ => Verdict::Accept,
    }
}
