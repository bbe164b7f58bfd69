// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueHint};
use fgps::{
    feedback::{FeedbackSink, LedSink, NullSink},
    signal::{ExitSignal, GpioExitPin, TerminationFlag},
    BridgeConfig, Translator,
};
use fgps_serial::{BaudRate, Uart};
use tokio::io::BufReader;

#[derive(Parser)]
#[command(author = "Copyright (C) 2024 Laixer Equipment B.V.")]
#[command(version, propagate_version = true)]
#[command(about = "GPS to FGPS-2 radio bridge daemon", long_about = None)]
struct Args {
    /// Configuration file.
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,
    /// GPS receiver serial device.
    #[arg(long, value_hint = ValueHint::FilePath)]
    gps: Option<PathBuf>,
    /// Radio transceiver serial device.
    #[arg(long, value_hint = ValueHint::FilePath)]
    radio: Option<PathBuf>,
    /// Serial baud rate of both devices.
    #[arg(long)]
    baud_rate: Option<usize>,
    /// GPIO value file of the exit pin.
    #[arg(long, value_hint = ValueHint::FilePath)]
    exit_pin: Option<PathBuf>,
    /// LED brightness file of the fix indicator.
    #[arg(long, value_hint = ValueHint::FilePath)]
    led: Option<PathBuf>,
    /// Daemonize the service.
    #[arg(long)]
    daemon: bool,
    /// Level of verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Load the configuration and apply the command line on top of it.
    fn config(&self) -> anyhow::Result<BridgeConfig> {
        let mut config = match &self.config {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Configuration file {} not found", path.display());
                }
                BridgeConfig::try_from_file([path])?
            }
            None => BridgeConfig::try_from_file(fgps::consts::CONFIG_PATHS)?,
        };

        if let Some(device) = &self.gps {
            config.gps.device = device.clone();
        }
        if let Some(device) = &self.radio {
            config.radio.device = device.clone();
        }
        if let Some(baud_rate) = self.baud_rate {
            config.gps.baud_rate = baud_rate;
            config.radio.baud_rate = baud_rate;
        }
        if let Some(exit_pin) = &self.exit_pin {
            config.exit_pin = Some(exit_pin.clone());
        }
        if let Some(led) = &self.led {
            config.led = Some(led.clone());
        }

        config.global.bin_name = env!("CARGO_BIN_NAME").to_string();
        config.global.daemon = self.daemon;

        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut log_config = simplelog::ConfigBuilder::new();
    if args.daemon {
        log_config.set_time_level(log::LevelFilter::Off);
        log_config.set_thread_level(log::LevelFilter::Off);
    } else {
        log_config.set_time_offset_to_local().ok();
        log_config.set_time_format_rfc2822();
    }

    log_config.set_target_level(log::LevelFilter::Off);
    log_config.set_location_level(log::LevelFilter::Off);
    log_config.add_filter_ignore_str("mio");

    let log_level = if args.daemon {
        log::LevelFilter::Info
    } else {
        match args.verbose {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };

    let color_choice = if args.daemon {
        simplelog::ColorChoice::Never
    } else {
        simplelog::ColorChoice::Auto
    };

    simplelog::TermLogger::init(
        log_level,
        log_config.build(),
        simplelog::TerminalMode::Mixed,
        color_choice,
    )?;

    let config = args.config()?;

    if config.global.daemon {
        log::debug!("Running service as daemon");
    }

    log::trace!("{:#?}", config);

    daemonize(&config).await
}

async fn daemonize(config: &BridgeConfig) -> anyhow::Result<()> {
    log::info!(
        "Starting {} {}",
        config.global.bin_name,
        fgps::consts::VERSION
    );

    let gps = Uart::open(
        &config.gps.device,
        BaudRate::from_speed(config.gps.baud_rate),
    )
    .with_context(|| format!("Failed to open GPS receiver {}", config.gps.device.display()))?;

    let radio = Uart::open(
        &config.radio.device,
        BaudRate::from_speed(config.radio.baud_rate),
    )
    .with_context(|| format!("Failed to open radio {}", config.radio.device.display()))?;

    let termination = TerminationFlag::new();

    let flag = termination.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for termination: {}", e);
            return;
        }

        log::info!("Termination requested");
        flag.raise();
    });

    let exit_pin = config.exit_pin.as_ref().map(|path| {
        log::info!("Exit pin: {}", path.display());
        GpioExitPin::new(path, config.exit_active_low)
    });

    let exit = (exit_pin, termination);

    match &config.led {
        Some(path) => {
            log::info!("Fix indicator: {}", path.display());
            translate(gps, radio, exit, LedSink::new(path), config).await
        }
        None => translate(gps, radio, exit, NullSink, config).await,
    }

    log::info!("Exiting program");

    Ok(())
}

async fn translate<E: ExitSignal, F: FeedbackSink>(
    gps: Uart,
    radio: Uart,
    exit: E,
    feedback: F,
    config: &BridgeConfig,
) {
    let mut translator = Translator::new(
        BufReader::new(gps),
        radio,
        exit,
        feedback,
        config.translator(),
    );

    translator.run().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_overrides() {
        let args = Args::parse_from([
            "fgps-bridged",
            "--config",
            "/etc/fgps/does-not-exist.toml",
        ]);
        assert!(args.config().is_err());

        let args = Args::parse_from([
            "fgps-bridged",
            "--gps",
            "/dev/ttyAMA0",
            "--radio",
            "/dev/ttyUSB3",
            "--baud-rate",
            "4800",
            "--exit-pin",
            "/sys/class/gpio/gpio22/value",
            "-vv",
        ]);
        let config = args.config().unwrap();

        assert_eq!(config.gps.device, PathBuf::from("/dev/ttyAMA0"));
        assert_eq!(config.radio.device, PathBuf::from("/dev/ttyUSB3"));
        assert_eq!(config.gps.baud_rate, 4800);
        assert_eq!(config.radio.baud_rate, 4800);
        assert_eq!(
            config.exit_pin,
            Some(PathBuf::from("/sys/class/gpio/gpio22/value"))
        );
        assert_eq!(config.global.bin_name, "fgps-bridged");
        assert_eq!(args.verbose, 2);
    }
}
