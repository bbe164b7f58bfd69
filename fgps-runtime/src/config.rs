use std::{fmt, path::Path, path::PathBuf, time::Duration};

use crate::{feedback::BlinkTiming, translator::TranslatorConfig};

/// Global configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlobalConfig {
    /// Name of the binary.
    pub bin_name: String,
    /// Whether the application runs as daemon.
    pub daemon: bool,
}

/// Serial device configuration.
#[derive(Clone, Debug, serde::Deserialize, PartialEq, Eq)]
pub struct SerialConfig {
    /// Path to the serial device.
    pub device: PathBuf,
    /// Baud rate of the serial device.
    #[serde(default = "default_baud_rate")]
    pub baud_rate: usize,
}

fn default_baud_rate() -> usize {
    crate::consts::DEFAULT_BAUD_RATE
}

/// Bridge configuration.
#[derive(Clone, Debug, serde::Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BridgeConfig {
    /// GPS receiver.
    pub gps: SerialConfig,
    /// Radio transceiver.
    pub radio: SerialConfig,
    /// GPIO `value` attribute of the exit pin.
    pub exit_pin: Option<PathBuf>,
    /// Exit pin is asserted when pulled low.
    pub exit_active_low: bool,
    /// LED `brightness` attribute of the fix indicator.
    pub led: Option<PathBuf>,
    /// Read timeout in milliseconds.
    pub read_timeout_ms: u64,
    /// Indicator pulse length in milliseconds.
    pub pulse_ms: u64,
    /// Pause between double pulses in milliseconds.
    pub pulse_gap_ms: u64,
    /// Global configuration.
    #[serde(skip)]
    pub global: GlobalConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            gps: SerialConfig {
                device: PathBuf::from("/dev/ttyS0"),
                baud_rate: crate::consts::DEFAULT_BAUD_RATE,
            },
            radio: SerialConfig {
                device: PathBuf::from("/dev/ttyUSB0"),
                baud_rate: crate::consts::DEFAULT_BAUD_RATE,
            },
            exit_pin: None,
            exit_active_low: true,
            led: None,
            read_timeout_ms: crate::consts::DEFAULT_READ_TIMEOUT.as_millis() as u64,
            pulse_ms: 10,
            pulse_gap_ms: 90,
            global: GlobalConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Load the first configuration file that exists.
    ///
    /// Returns the default configuration if none of the candidates exist. A
    /// file that exists but cannot be read or parsed is an error.
    pub fn try_from_file<P: AsRef<Path>>(
        candidates: impl IntoIterator<Item = P>,
    ) -> Result<Self, ConfigError> {
        for candidate in candidates {
            let path = candidate.as_ref();
            if !path.exists() {
                continue;
            }

            log::debug!("Reading configuration from {}", path.display());

            let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
            return toml::from_str(&contents).map_err(ConfigError::Parse);
        }

        Ok(Self::default())
    }

    pub fn translator(&self) -> TranslatorConfig {
        TranslatorConfig {
            read_timeout: Duration::from_millis(self.read_timeout_ms),
            blink: BlinkTiming {
                pulse: Duration::from_millis(self.pulse_ms),
                gap: Duration::from_millis(self.pulse_gap_ms),
            },
            ..TranslatorConfig::default()
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "cannot read configuration: {}", e),
            Self::Parse(e) => write!(f, "invalid configuration: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}
