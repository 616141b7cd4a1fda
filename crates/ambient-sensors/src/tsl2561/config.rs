/// How long the ADC integrates light before a conversion completes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationTime {
    Ms13,
    Ms101,
    #[default]
    Ms402,
}

impl IntegrationTime {
    pub(crate) const fn bits(self) -> u8 {
        match self {
            Self::Ms13 => 0x00,
            Self::Ms101 => 0x01,
            Self::Ms402 => 0x02,
        }
    }

    /// Time to wait after power up before the channels are valid. A
    /// millisecond longer than the nominal integration time.
    pub(crate) const fn conversion_ms(self) -> u32 {
        match self {
            Self::Ms13 => 14,
            Self::Ms101 => 102,
            Self::Ms402 => 403,
        }
    }

    /// Counts at or above this are clipped and can not be trusted.
    pub(crate) const fn clipping_threshold(self) -> u16 {
        match self {
            Self::Ms13 => 4900,
            Self::Ms101 => 37000,
            Self::Ms402 => 65000,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Gain {
    #[default]
    X1,
    X16,
}

impl Gain {
    pub(crate) const fn bits(self) -> u8 {
        match self {
            Self::X1 => 0x00,
            Self::X16 => 0x10,
        }
    }
}

/// Selects the calibration table used to compute lux.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Package {
    /// T, FN and CL packages, this is what the Adafruit breakout uses.
    #[default]
    T,
    Cs,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LightSensorConfig {
    pub integration_time: IntegrationTime,
    pub gain: Gain,
    pub autogain: bool,
    pub package: Package,
}

impl LightSensorConfig {
    /// Content of the timing register
    pub(crate) const fn timing_byte(&self) -> u8 {
        self.integration_time.bits() | self.gain.bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_fields_do_not_overlap() {
        for time in [
            IntegrationTime::Ms13,
            IntegrationTime::Ms101,
            IntegrationTime::Ms402,
        ] {
            for gain in [Gain::X1, Gain::X16] {
                let config = LightSensorConfig {
                    integration_time: time,
                    gain,
                    ..LightSensorConfig::default()
                };
                let byte = config.timing_byte();
                assert_eq!(byte & 0x03, time.bits());
                assert_eq!(byte & 0x10, gain.bits());
            }
        }
    }

    #[test]
    fn default_matches_power_on_setup() {
        let config = LightSensorConfig::default();
        assert_eq!(config.timing_byte(), 0x02);
        assert!(!config.autogain);
        assert_eq!(config.package, Package::T);
    }
}
