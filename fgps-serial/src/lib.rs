// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

//! Serial TTY driver for the FGPS bridge.
//!
//! Both ends of the bridge, the GPS receiver and the radio transceiver, are
//! plain UART devices. The driver puts the TTY in raw mode and registers it
//! with the tokio reactor so the port can be used as an `AsyncRead` and
//! `AsyncWrite` stream.

mod builder;
mod error;
mod future;
mod imp;

pub use builder::Builder;
pub use error::{Error, ErrorKind, Result};
pub use future::Uart;

/// Serial port baud rates.
///
/// ## Portability
///
/// The `BaudRate` variants with numeric suffixes, e.g., `Baud9600`, indicate standard baud rates
/// that are widely-supported on many systems. Non-standard rates can be requested with
/// `BaudOther`, but only the rates known to the Linux termios interface are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaudRate {
    /// 1200 baud.
    Baud1200,
    /// 2400 baud.
    Baud2400,
    /// 4800 baud. The NMEA 0183 standard rate.
    Baud4800,
    /// 9600 baud. Default rate of most GPS modules and of the FGPS-2 radio link.
    Baud9600,
    /// 19,200 baud.
    Baud19200,
    /// 38,400 baud.
    Baud38400,
    /// 57,600 baud.
    Baud57600,
    /// 115,200 baud.
    Baud115200,
    /// Non-standard baud rates.
    ///
    /// ```no_run
    /// fgps_serial::BaudRate::BaudOther(460_800); // 460,800 baud
    /// ```
    BaudOther(usize),
}

impl BaudRate {
    /// Creates a `BaudRate` for a particular speed.
    ///
    /// ## Example
    ///
    /// ```
    /// # use fgps_serial::BaudRate;
    /// assert_eq!(BaudRate::Baud9600, BaudRate::from_speed(9600));
    /// assert_eq!(BaudRate::Baud115200, BaudRate::from_speed(115200));
    /// assert_eq!(BaudRate::BaudOther(460800), BaudRate::from_speed(460800));
    /// ```
    pub fn from_speed(speed: usize) -> BaudRate {
        match speed {
            1200 => BaudRate::Baud1200,
            2400 => BaudRate::Baud2400,
            4800 => BaudRate::Baud4800,
            9600 => BaudRate::Baud9600,
            19200 => BaudRate::Baud19200,
            38400 => BaudRate::Baud38400,
            57600 => BaudRate::Baud57600,
            115200 => BaudRate::Baud115200,
            n => BaudRate::BaudOther(n),
        }
    }

    /// Returns the baud rate as an integer.
    ///
    /// ## Example
    ///
    /// ```
    /// # use fgps_serial::BaudRate;
    /// assert_eq!(9600, BaudRate::Baud9600.speed());
    /// assert_eq!(4800, BaudRate::from_speed(4800).speed());
    /// assert_eq!(460800, BaudRate::BaudOther(460800).speed());
    /// ```
    pub fn speed(&self) -> usize {
        match *self {
            BaudRate::Baud1200 => 1200,
            BaudRate::Baud2400 => 2400,
            BaudRate::Baud4800 => 4800,
            BaudRate::Baud9600 => 9600,
            BaudRate::Baud19200 => 19200,
            BaudRate::Baud38400 => 38400,
            BaudRate::Baud57600 => 57600,
            BaudRate::Baud115200 => 115200,
            BaudRate::BaudOther(n) => n,
        }
    }
}

impl std::fmt::Display for BaudRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} baud", self.speed())
    }
}

/// Number of bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharSize {
    /// 7 bits per character.
    Bits7,
    /// 8 bits per character.
    Bits8,
}

/// Parity checking modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    /// No parity bit.
    ParityNone,
    /// Parity bit sets odd number of 1 bits.
    ParityOdd,
    /// Parity bit sets even number of 1 bits.
    ParityEven,
}

/// Number of stop bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    /// One stop bit.
    Stop1,
    /// Two stop bits.
    Stop2,
}

/// Flow control modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowControl {
    /// No flow control.
    FlowNone,
    /// Flow control using XON/XOFF bytes.
    FlowSoftware,
    /// Flow control using RTS/CTS signals.
    FlowHardware,
}

/// Start configuring the serial device at `path`.
pub fn builder(path: &std::path::Path) -> Result<Builder> {
    Builder::new(path)
}
