use crate::nmea::SentenceKind;

/// Fix status as reported by the most recent positioning sentence.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FixState {
    /// Receiver reported a UTC time.
    pub time_valid: bool,
    /// Receiver reported a valid position.
    pub position_valid: bool,
}

impl std::fmt::Display for FixState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "time {}; position {}",
            if self.time_valid { "valid" } else { "invalid" },
            if self.position_valid { "valid" } else { "invalid" },
        )
    }
}

/// Derives the fix state from incoming sentences.
///
/// The state is overwritten by every relevant sentence and never merged with
/// earlier readings. It starts out invalid and is only ever changed by
/// [`FixTracker::update`].
#[derive(Debug, Default)]
pub struct FixTracker {
    state: FixState,
}

impl FixTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the state from a parsed sentence.
    ///
    /// Only sentences with a time field are considered. The RMC status field
    /// is the only source of position validity, GGA leaves it untouched.
    pub fn update(&mut self, kind: SentenceKind, fields: &[&str]) {
        if !kind.has_time() {
            return;
        }

        let time_valid = fields.get(1).map_or(false, |time| !time.is_empty());
        if time_valid != self.state.time_valid {
            log::info!("Time fix {}", if time_valid { "acquired" } else { "lost" });
        }
        self.state.time_valid = time_valid;

        if kind == SentenceKind::Rmc {
            let position_valid = fields.get(2) == Some(&"A");
            if position_valid != self.state.position_valid {
                log::info!(
                    "Position fix {}",
                    if position_valid { "acquired" } else { "lost" }
                );
            }
            self.state.position_valid = position_valid;
        }
    }

    /// Current fix state.
    #[inline]
    pub fn snapshot(&self) -> FixState {
        self.state
    }
}
