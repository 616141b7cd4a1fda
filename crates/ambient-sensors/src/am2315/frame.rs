use super::crc::crc16;
use super::{READ_REGISTERS, REGISTER_COUNT};

pub(crate) const FRAME_LEN: usize = 8;

/// Response to a read of the four measurement registers:
///
/// | byte | content                                             |
/// |------|-----------------------------------------------------|
/// | 0    | function code, echoed                               |
/// | 1    | number of data bytes                                |
/// | 2-3  | humidity, big endian, 0.1 %RH                       |
/// | 4-5  | temperature, big endian sign and magnitude, 0.1 °C  |
/// | 6-7  | crc16 over bytes 0-5, little endian                 |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame(pub [u8; FRAME_LEN]);

impl Frame {
    pub fn humidity(&self) -> f32 {
        let raw = u16::from_be_bytes([self.0[2], self.0[3]]);
        f32::from(raw) / 10.0
    }

    /// The top bit is a sign, not two's complement.
    pub fn temperature(&self) -> f32 {
        let magnitude = u16::from_be_bytes([self.0[4] & 0x7F, self.0[5]]);
        let magnitude = f32::from(magnitude) / 10.0;
        if self.0[4] & 0x80 != 0 {
            -magnitude
        } else {
            magnitude
        }
    }

    pub fn transmitted_crc(&self) -> u16 {
        u16::from_le_bytes([self.0[6], self.0[7]])
    }

    pub fn computed_crc(&self) -> u16 {
        crc16(&self.0[..6])
    }

    pub fn crc_ok(&self) -> bool {
        self.transmitted_crc() == self.computed_crc()
    }

    /// The sensor echoes the function code and the number of bytes that
    /// follow.
    pub fn header_ok(&self) -> bool {
        self.0[0] == READ_REGISTERS && self.0[1] == REGISTER_COUNT
    }
}
