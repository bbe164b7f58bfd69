use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite};

use crate::{
    error::{Error, Result},
    feedback::{BlinkPattern, BlinkTiming, FeedbackSink},
    fix::{FixState, FixTracker},
    nmea::{self, SentenceKind},
    reformat::reformat,
    signal::ExitSignal,
};

/// Translator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslatorConfig {
    /// Upper bound on a single read, and with it on the shutdown latency.
    pub read_timeout: Duration,
    /// Blink timing of the fix indicator.
    pub blink: BlinkTiming,
    /// Partial lines growing beyond this length are discarded.
    pub max_line_length: usize,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            read_timeout: crate::consts::DEFAULT_READ_TIMEOUT,
            blink: BlinkTiming::default(),
            max_line_length: crate::consts::MAX_LINE_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Progress of a multi-part satellite view sequence.
#[derive(Debug, Default)]
struct SatelliteView {
    in_progress: bool,
}

impl SatelliteView {
    /// Track a GSV sentence. Field 1 holds the number of parts, field 2 the
    /// current part.
    fn track(&mut self, fields: &[&str]) {
        let total = fields.get(1).and_then(|v| v.parse::<u8>().ok());
        let number = fields.get(2).and_then(|v| v.parse::<u8>().ok());

        self.in_progress = matches!((number, total), (Some(number), Some(total)) if number < total);
    }

    fn reset(&mut self) {
        if self.in_progress {
            log::debug!("Satellite view sequence interrupted");
        }
        self.in_progress = false;
    }
}

/// Sentence translator between the GPS receiver and the radio.
///
/// One call to [`Translator::step`] is one iteration: poll the exit signal,
/// read a line within the read timeout and process it. Errors on a line never
/// end the loop, only the exit signal does.
pub struct Translator<R, W, E, F> {
    reader: R,
    writer: W,
    exit: E,
    feedback: F,
    config: TranslatorConfig,
    fix: FixTracker,
    satellite_view: SatelliteView,
    buffer: Vec<u8>,
    state: LoopState,
}

impl<R, W, E, F> Translator<R, W, E, F>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    E: ExitSignal,
    F: FeedbackSink,
{
    pub fn new(reader: R, writer: W, exit: E, feedback: F, config: TranslatorConfig) -> Self {
        Self {
            reader,
            writer,
            exit,
            feedback,
            config,
            fix: FixTracker::new(),
            satellite_view: SatelliteView::default(),
            buffer: Vec::with_capacity(config.max_line_length),
            state: LoopState::Running,
        }
    }

    #[inline]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[inline]
    pub fn fix_state(&self) -> FixState {
        self.fix.snapshot()
    }

    /// Run until the exit signal is asserted.
    pub async fn run(&mut self) {
        log::info!("Translating sentences");

        while self.step().await == LoopState::Running {}

        log::info!("Translator stopped");
    }

    /// Run a single iteration of the loop.
    pub async fn step(&mut self) -> LoopState {
        if self.state == LoopState::Stopped {
            return self.state;
        }

        if self.exit.is_asserted() {
            log::info!("Exit signal asserted");
            self.state = LoopState::Stopped;
            return self.state;
        }

        match self.read_line().await {
            Ok(Some(raw)) => {
                if let Err(e) = self.handle_line(&raw).await {
                    self.report(&raw, e);
                }
            }
            Ok(None) => {}
            Err(e) => {
                log::error!("Failed to read from receiver: {}", e);
                tokio::time::sleep(self.config.read_timeout).await;
            }
        }

        self.state
    }

    /// Read one line, `None` if nothing complete arrived in time.
    ///
    /// Bytes of a partially received line are kept and completed by the next
    /// read.
    async fn read_line(&mut self) -> std::io::Result<Option<Vec<u8>>> {
        let read = self.reader.read_until(b'\n', &mut self.buffer);

        match tokio::time::timeout(self.config.read_timeout, read).await {
            Err(_elapsed) => {
                if self.buffer.len() > self.config.max_line_length {
                    log::warn!(
                        "Discarding {} bytes without line terminator",
                        self.buffer.len()
                    );
                    self.buffer.clear();
                }
                Ok(None)
            }
            Ok(Ok(0)) if self.buffer.is_empty() => {
                log::trace!("Receiver at end of stream");
                tokio::time::sleep(self.config.read_timeout).await;
                Ok(None)
            }
            Ok(Ok(_)) => Ok(Some(std::mem::take(&mut self.buffer))),
            Ok(Err(e)) => {
                self.buffer.clear();
                Err(e)
            }
        }
    }

    async fn handle_line(&mut self, raw: &[u8]) -> Result {
        let line = nmea::decode(raw)?;
        let payload = nmea::validate(line)?;

        log::debug!("GPS: {}", line.trim_end());

        let fields = nmea::parse(payload);
        let kind = match SentenceKind::from_tag(fields[0]) {
            Some(kind) => kind,
            None => {
                log::trace!("Ignoring {} sentence", fields[0]);
                return Ok(());
            }
        };

        self.fix.update(kind, &fields);
        if kind == SentenceKind::Gsv {
            self.satellite_view.track(&fields);
        }

        let forwarded = match reformat(kind, payload, &fields) {
            Ok(Some(output)) => nmea::emit(&output, &mut self.writer)
                .await
                .map_err(Error::from),
            Ok(None) => {
                log::debug!("Incomplete {} sentence, nothing to send", kind);
                Ok(())
            }
            Err(e) => Err(e.into()),
        };

        // Blink once per reporting cycle, the receiver sends one RMC per fix.
        if kind == SentenceKind::Rmc {
            let pattern = BlinkPattern::from(self.fix.snapshot());
            if let Err(e) = pattern.play(&mut self.feedback, &self.config.blink).await {
                log::warn!("Failed to signal fix state: {}", e);
            }
        }

        forwarded
    }

    fn report(&mut self, raw: &[u8], error: Error) {
        match error {
            Error::Decode(e) => {
                log::warn!("Unable to convert input data to ASCII: {}", e);
                log::debug!("Raw input: {:?}", String::from_utf8_lossy(raw));
                self.satellite_view.reset();
            }
            Error::Frame(e) => {
                log::warn!("Ignoring invalid data: {}", e);
                log::debug!("Rejected: {:?}", String::from_utf8_lossy(raw));
                self.satellite_view.reset();
            }
            Error::Reformat(e) => log::error!("Dropped sentence: {}", e),
            Error::Io(e) => log::error!("Failed to write to radio: {}", e),
        }
    }
}
