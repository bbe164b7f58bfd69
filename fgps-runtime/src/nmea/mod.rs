//! NMEA 0183 sentence handling.
//!
//! A sentence travels as `$<payload>*<checksum>\r\n`. The payload is a comma
//! separated list of fields where the first field names the talker and the
//! sentence type, for example `GPRMC`.

use std::fmt;

pub use checksum::{checksum, checksum_byte};
pub use emit::{emit, frame};
pub use frame::{validate, FrameError};

mod checksum;
mod emit;
mod frame;

/// Sentence kinds the bridge knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceKind {
    /// Recommended minimum data: time, validity, position, speed and course.
    Rmc,
    /// Fix data: time, position, fix quality, satellites and altitude.
    Gga,
    /// Satellites in view. Sent as a sequence of parts.
    Gsv,
    /// DOP and active satellites.
    Gsa,
}

impl SentenceKind {
    /// Lookup the kind from the leading field of a payload.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "GPRMC" => Some(Self::Rmc),
            "GPGGA" => Some(Self::Gga),
            "GPGSV" => Some(Self::Gsv),
            "GPGSA" => Some(Self::Gsa),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Rmc => "GPRMC",
            Self::Gga => "GPGGA",
            Self::Gsv => "GPGSV",
            Self::Gsa => "GPGSA",
        }
    }

    /// Whether the sentence carries a UTC time field.
    #[inline]
    pub fn has_time(&self) -> bool {
        matches!(self, Self::Rmc | Self::Gga)
    }
}

impl fmt::Display for SentenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Input line is not ASCII text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    /// Offset of the first offending byte.
    pub position: usize,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "non-ASCII byte at offset {}", self.position)
    }
}

impl std::error::Error for DecodeError {}

/// Interpret raw bytes from the receiver as text.
///
/// NMEA is ASCII by definition, anything else is line noise.
pub fn decode(raw: &[u8]) -> Result<&str, DecodeError> {
    if let Some(position) = raw.iter().position(|byte| !byte.is_ascii()) {
        return Err(DecodeError { position });
    }

    std::str::from_utf8(raw).map_err(|e| DecodeError {
        position: e.valid_up_to(),
    })
}

/// Split a payload into its fields.
///
/// Empty fields are kept as empty strings so that field positions never
/// shift. The result always holds at least one element.
///
/// # Example
///
/// ```
/// assert_eq!(fgps::nmea::parse("GPRMC,,,"), vec!["GPRMC", "", "", ""]);
/// ```
pub fn parse(payload: &str) -> Vec<&str> {
    payload.split(',').collect()
}
