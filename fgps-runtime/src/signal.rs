use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

/// External stop request, polled once per loop iteration.
pub trait ExitSignal {
    fn is_asserted(&mut self) -> bool;
}

impl<S: ExitSignal> ExitSignal for Option<S> {
    fn is_asserted(&mut self) -> bool {
        self.as_mut().map_or(false, |signal| signal.is_asserted())
    }
}

impl<A: ExitSignal, B: ExitSignal> ExitSignal for (A, B) {
    fn is_asserted(&mut self) -> bool {
        self.0.is_asserted() || self.1.is_asserted()
    }
}

/// Flag raised from outside the loop, for example by a signal handler.
#[derive(Debug, Clone, Default)]
pub struct TerminationFlag(Arc<AtomicBool>);

impl TerminationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the loop to stop.
    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl ExitSignal for TerminationFlag {
    fn is_asserted(&mut self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Digital input read through the sysfs GPIO interface.
///
/// The pin is wired with a pull-up, so grounding it asserts the signal when
/// configured active low.
#[derive(Debug)]
pub struct GpioExitPin {
    /// Path to the `value` attribute of the exported GPIO.
    path: PathBuf,
    /// Level `0` means asserted.
    active_low: bool,
    /// Last read failed, avoids repeating the same warning every iteration.
    failing: bool,
}

impl GpioExitPin {
    pub fn new(path: impl Into<PathBuf>, active_low: bool) -> Self {
        Self {
            path: path.into(),
            active_low,
            failing: false,
        }
    }
}

impl ExitSignal for GpioExitPin {
    fn is_asserted(&mut self) -> bool {
        let level = match std::fs::read_to_string(&self.path) {
            Ok(value) => {
                self.failing = false;
                value.trim() != "0"
            }
            Err(e) => {
                if !self.failing {
                    log::warn!("Failed to read exit pin {}: {}", self.path.display(), e);
                    self.failing = true;
                }
                return false;
            }
        };

        level != self.active_low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Never;

    impl ExitSignal for Never {
        fn is_asserted(&mut self) -> bool {
            false
        }
    }

    #[test]
    fn termination_flag() {
        let mut flag = TerminationFlag::new();
        assert!(!flag.is_asserted());

        flag.clone().raise();
        assert!(flag.is_asserted());
    }

    #[test]
    fn combined_signals() {
        let flag = TerminationFlag::new();
        let mut signal = (None::<GpioExitPin>, flag.clone());
        assert!(!signal.is_asserted());

        flag.raise();
        assert!(signal.is_asserted());

        let mut signal = (Never, Some(Never));
        assert!(!signal.is_asserted());
    }

    #[test]
    fn gpio_pin_active_low() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("value");

        let mut pin = GpioExitPin::new(&path, true);

        std::fs::write(&path, "1\n").unwrap();
        assert!(!pin.is_asserted());

        std::fs::write(&path, "0\n").unwrap();
        assert!(pin.is_asserted());
    }

    #[test]
    fn gpio_pin_active_high() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("value");

        let mut pin = GpioExitPin::new(&path, false);

        std::fs::write(&path, "0\n").unwrap();
        assert!(!pin.is_asserted());

        std::fs::write(&path, "1\n").unwrap();
        assert!(pin.is_asserted());
    }

    #[test]
    fn gpio_pin_unreadable() {
        let mut pin = GpioExitPin::new("/sys/class/gpio/fgps-does-not-exist/value", true);

        assert!(!pin.is_asserted());
        assert!(pin.failing);
        assert!(!pin.is_asserted());
    }
}
