/// CRC-16/MODBUS: reflected polynomial 0xA001, initial value 0xFFFF.
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc = 0xFFFF_u16;
    for byte in data {
        crc ^= u16::from(*byte);
        for _ in 0..8 {
            if crc & 0x0001 != 0 {
                crc = (crc >> 1) ^ 0xA001;
            } else {
                crc >>= 1;
            }
        }
    }
    crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modbus_check_value() {
        assert_eq!(crc16(b"123456789"), 0x4B37);
    }

    #[test]
    fn empty_input_is_initial_value() {
        assert_eq!(crc16(&[]), 0xFFFF);
    }

    #[test]
    fn response_header_and_payload() {
        // 60.0 %RH, 25.0 °C
        let content = [0x03, 0x04, 0x02, 0x58, 0x00, 0xFA];
        assert_eq!(crc16(&content), 0xC0F1);
        assert_eq!(crc16(&content), crc16(&content));
    }

    #[test]
    fn single_bit_flip_is_detected() {
        let content = [0x03, 0x04, 0x02, 0x58, 0x00, 0xFA];
        let reference = crc16(&content);
        for i in 0..content.len() {
            for bit in 0..8 {
                let mut corrupted = content;
                corrupted[i] ^= 1 << bit;
                assert_ne!(crc16(&corrupted), reference);
            }
        }
    }
}
