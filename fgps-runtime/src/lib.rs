// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

//! The `fgps` library translates the NMEA output of a GPS receiver into the
//! fixed width FGPS-2 sentences understood by amateur radio transceivers.
//!
//! The [`nmea`] module validates and frames sentences, [`reformat`] rebuilds
//! the positioning sentences, [`fix`] tracks the reported fix quality and
//! [`feedback`] turns it into blink patterns. The [`translator`] module ties
//! these together in a single sequential loop which only stops on an
//! [`signal::ExitSignal`].

pub mod feedback;
pub mod fix;
pub mod nmea;
pub mod reformat;
pub mod signal;
pub mod translator;

mod config;
mod error;

pub use self::config::*;
pub use self::error::{Error, Result};
pub use self::translator::{LoopState, Translator, TranslatorConfig};

/// Runtime constants.
pub mod consts {
    use std::time::Duration;

    /// Library version.
    ///
    /// # Example
    ///
    /// ```
    /// assert!(!fgps::consts::VERSION.is_empty());
    /// ```
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    /// Baud rate of GPS modules and of the radio data port.
    pub const DEFAULT_BAUD_RATE: usize = 9600;

    /// Default bound on a single receiver read.
    pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(5000);

    /// Longest line accepted before it is considered noise. NMEA limits
    /// sentences to 82 characters.
    pub const MAX_LINE_LENGTH: usize = 256;

    /// Candidate configuration files, in order of preference.
    pub const CONFIG_PATHS: [&str; 2] = ["/etc/fgps/fgps-bridged.toml", "fgps-bridged.toml"];
}
