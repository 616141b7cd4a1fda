use ambient_sensors::tsl2561;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum Sensor {
    /// tsl2561
    Light,
    /// am2315
    Climate,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub(crate) enum IntegrationTime {
    #[value(name = "13ms")]
    Ms13,
    #[value(name = "101ms")]
    Ms101,
    #[value(name = "402ms")]
    Ms402,
}

impl From<IntegrationTime> for tsl2561::IntegrationTime {
    fn from(time: IntegrationTime) -> Self {
        match time {
            IntegrationTime::Ms13 => Self::Ms13,
            IntegrationTime::Ms101 => Self::Ms101,
            IntegrationTime::Ms402 => Self::Ms402,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub(crate) enum Gain {
    #[value(name = "1x")]
    X1,
    #[value(name = "16x")]
    X16,
}

impl From<Gain> for tsl2561::Gain {
    fn from(gain: Gain) -> Self {
        match gain {
            Gain::X1 => Self::X1,
            Gain::X16 => Self::X16,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub(crate) enum Package {
    /// T, FN and CL packages
    T,
    Cs,
}

impl From<Package> for tsl2561::Package {
    fn from(package: Package) -> Self {
        match package {
            Package::T => Self::T,
            Package::Cs => Self::Cs,
        }
    }
}

/// Accepts hex with a `0x` prefix or decimal
pub(crate) fn parse_address(arg: &str) -> Result<u16, String> {
    let parsed = match arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => arg.parse(),
    };
    let address = parsed.map_err(|e| format!("not a number: {e}"))?;
    if address > 0x7F {
        return Err(format!("{address:#x} is not a 7 bit i2c address"));
    }
    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses() {
        assert_eq!(parse_address("0x39"), Ok(0x39));
        assert_eq!(parse_address("0X5C"), Ok(0x5C));
        assert_eq!(parse_address("92"), Ok(0x5C));
        assert!(parse_address("0x80").is_err());
        assert!(parse_address("light").is_err());
    }
}
