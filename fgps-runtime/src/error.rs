use std::{error, fmt, io};

use crate::{
    nmea::{DecodeError, FrameError},
    reformat::ReformatError,
};

/// Failure while handling a single input line.
///
/// None of these stop the translator, the loop logs them and moves on to the
/// next line.
#[derive(Debug)]
pub enum Error {
    /// Input was not ASCII.
    Decode(DecodeError),
    /// Malformed envelope or checksum mismatch.
    Frame(FrameError),
    /// Sentence could not be rebuilt for the radio.
    Reformat(ReformatError),
    /// Output channel failed.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Decode(e) => write!(f, "decode error: {}", e),
            Error::Frame(e) => write!(f, "invalid frame: {}", e),
            Error::Reformat(e) => write!(f, "reformat error: {}", e),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Decode(e) => Some(e),
            Error::Frame(e) => Some(e),
            Error::Reformat(e) => Some(e),
            Error::Io(e) => Some(e),
        }
    }
}

impl From<DecodeError> for Error {
    fn from(value: DecodeError) -> Self {
        Error::Decode(value)
    }
}

impl From<FrameError> for Error {
    fn from(value: FrameError) -> Self {
        Error::Frame(value)
    }
}

impl From<ReformatError> for Error {
    fn from(value: ReformatError) -> Self {
        Error::Reformat(value)
    }
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Error::Io(value)
    }
}

pub type Result<T = ()> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_from_stage() {
        let error: Error = FrameError::MissingStart.into();
        assert_eq!(error.to_string(), "invalid frame: sentence does not start with $");

        let error: Error = DecodeError { position: 4 }.into();
        assert_eq!(error.to_string(), "decode error: non-ASCII byte at offset 4");
        assert!(std::error::Error::source(&error).is_some());
    }
}
