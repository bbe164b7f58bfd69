/// XOR of every byte in `body`.
#[inline]
pub fn checksum_byte(body: &str) -> u8 {
    body.bytes().fold(0, |acc, byte| acc ^ byte)
}

/// Sentence checksum as two uppercase hexadecimal digits.
///
/// The checksum covers everything between the `$` and the `*` of a sentence.
///
/// # Example
///
/// ```
/// use fgps::nmea::checksum;
///
/// assert_eq!(checksum("GPGSV,1,1,00"), "79");
/// assert_eq!(checksum(""), "00");
/// ```
pub fn checksum(body: &str) -> String {
    format!("{:02X}", checksum_byte(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_known_sentences() {
        assert_eq!(
            checksum("GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W"),
            "6A"
        );
        assert_eq!(
            checksum("GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,"),
            "47"
        );
    }

    #[test]
    fn checksum_is_zero_padded() {
        assert_eq!(checksum("A"), "41");
        assert_eq!(checksum("AA"), "00");
        assert_eq!(checksum("\x01"), "01");
    }

    #[test]
    fn checksum_always_two_uppercase_hex_digits() {
        for byte in 0u8..=0x7f {
            let body = String::from(byte as char);
            let sum = checksum(&body);

            assert_eq!(sum.len(), 2);
            assert!(sum
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
            assert_eq!(sum, checksum(&body));
        }
    }
}
