use std::fmt;

use super::checksum;

/// Shortest envelope possible: `$*XX\r\n`.
const MIN_FRAME_LENGTH: usize = 6;

/// Reason a line was rejected as a sentence envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Line is empty or does not start with `$`.
    MissingStart,
    /// Line does not end with `*XX\r\n`.
    MissingEndMarker,
    /// Checksum in the frame does not match the body.
    ChecksumMismatch {
        /// Checksum computed over the body.
        expected: String,
        /// Checksum found in the frame.
        actual: String,
    },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStart => write!(f, "sentence does not start with $"),
            Self::MissingEndMarker => write!(f, "sentence does not end with *XX<CR><LF>"),
            Self::ChecksumMismatch { expected, actual } => write!(
                f,
                "calculated checksum {} does not match {}",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for FrameError {}

/// Validate a sentence envelope and return the payload.
///
/// The line must be `$<body>*<checksum>\r\n` where the checksum is the XOR of
/// the body in uppercase hex. Validation does not touch any other state.
///
/// # Example
///
/// ```
/// use fgps::nmea::validate;
///
/// assert_eq!(validate("$GPGSV,1,1,00*79\r\n"), Ok("GPGSV,1,1,00"));
/// assert!(validate("$GPGSV,1,1,00*7A\r\n").is_err());
/// ```
pub fn validate(line: &str) -> Result<&str, FrameError> {
    if !line.starts_with('$') {
        return Err(FrameError::MissingStart);
    }

    let len = line.len();
    if len < MIN_FRAME_LENGTH
        || !line.ends_with("\r\n")
        || line.as_bytes()[len - 5] != b'*'
    {
        return Err(FrameError::MissingEndMarker);
    }

    let (body, actual) = match (line.get(1..len - 5), line.get(len - 4..len - 2)) {
        (Some(body), Some(actual)) => (body, actual),
        _ => return Err(FrameError::MissingEndMarker),
    };

    let expected = checksum(body);
    if expected != actual {
        return Err(FrameError::ChecksumMismatch {
            expected,
            actual: actual.to_owned(),
        });
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RMC: &str = "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A\r\n";

    #[test]
    fn validate_known_sentence() {
        assert_eq!(
            validate(RMC),
            Ok("GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W")
        );
    }

    #[test]
    fn validate_empty_body() {
        assert_eq!(validate("$*00\r\n"), Ok(""));
    }

    #[test]
    fn reject_empty_line() {
        assert_eq!(validate(""), Err(FrameError::MissingStart));
    }

    #[test]
    fn reject_missing_start() {
        assert_eq!(validate(&RMC[1..]), Err(FrameError::MissingStart));
        assert_eq!(validate("GPGSV,1,1,00*79\r\n"), Err(FrameError::MissingStart));
    }

    #[test]
    fn reject_missing_terminator() {
        assert_eq!(
            validate("$GPGSV,1,1,00*79"),
            Err(FrameError::MissingEndMarker)
        );
        assert_eq!(
            validate("$GPGSV,1,1,00*79\n"),
            Err(FrameError::MissingEndMarker)
        );
    }

    #[test]
    fn reject_misplaced_star() {
        assert_eq!(
            validate("$GPGSV,1,1,00*7\r\n"),
            Err(FrameError::MissingEndMarker)
        );
        assert_eq!(
            validate("$GPGSV,1,1,0079\r\n"),
            Err(FrameError::MissingEndMarker)
        );
    }

    #[test]
    fn reject_short_line() {
        assert_eq!(validate("$\r\n"), Err(FrameError::MissingEndMarker));
        assert_eq!(validate("$*0\r\n"), Err(FrameError::MissingEndMarker));
    }

    #[test]
    fn reject_checksum_mismatch() {
        assert_eq!(
            validate("$GPGSV,1,1,00*80\r\n"),
            Err(FrameError::ChecksumMismatch {
                expected: "79".to_owned(),
                actual: "80".to_owned(),
            })
        );
    }

    #[test]
    fn reject_lowercase_checksum() {
        assert!(matches!(
            validate("$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6a\r\n"),
            Err(FrameError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn reject_any_single_bit_flip() {
        let body = &RMC[1..RMC.len() - 5];

        for index in 0..body.len() {
            for bit in 0..7 {
                let mut corrupted = body.as_bytes().to_vec();
                corrupted[index] ^= 1 << bit;

                let corrupted = String::from_utf8(corrupted).unwrap();
                let line = format!("${}*6A\r\n", corrupted);

                assert!(validate(&line).is_err(), "accepted corruption: {}", line);
            }
        }
    }

    #[test]
    fn frame_error_display() {
        let error = FrameError::ChecksumMismatch {
            expected: "6A".to_owned(),
            actual: "6B".to_owned(),
        };
        assert_eq!(
            error.to_string(),
            "calculated checksum 6A does not match 6B"
        );
    }
}
