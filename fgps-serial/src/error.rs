use std::{error, fmt, io};

/// Serial driver result.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of serial driver errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The device is not available.
    ///
    /// This could indicate that the device is in use by another process or was
    /// disconnected while performing I/O.
    NoDevice,
    /// A parameter was incorrect.
    InvalidInput,
    /// An I/O error occurred.
    Io(io::ErrorKind),
}

/// An error type for serial port operations.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    description: String,
}

impl Error {
    pub fn new<T: Into<String>>(kind: ErrorKind, description: T) -> Self {
        Self {
            kind,
            description: description.into(),
        }
    }

    /// Returns the corresponding `ErrorKind` for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

impl error::Error for Error {}

impl From<io::Error> for Error {
    fn from(io_error: io::Error) -> Self {
        let kind = match io_error.raw_os_error() {
            Some(libc::EBUSY) | Some(libc::ENOENT) | Some(libc::ENODEV) | Some(libc::ENXIO) => {
                ErrorKind::NoDevice
            }
            Some(libc::EINVAL) => ErrorKind::InvalidInput,
            _ => ErrorKind::Io(io_error.kind()),
        };

        Self::new(kind, io_error.to_string())
    }
}

impl From<Error> for io::Error {
    fn from(error: Error) -> io::Error {
        let kind = match error.kind {
            ErrorKind::NoDevice => io::ErrorKind::NotFound,
            ErrorKind::InvalidInput => io::ErrorKind::InvalidInput,
            ErrorKind::Io(kind) => kind,
        };

        io::Error::new(kind, error.description)
    }
}

pub(crate) fn last_os_error() -> Error {
    io::Error::last_os_error().into()
}

pub(crate) fn from_raw_os_error(errno: i32) -> Error {
    io::Error::from_raw_os_error(errno).into()
}
