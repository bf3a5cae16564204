//! Test doubles implementing the `embedded-hal` digital traits.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Instant;

use blinker::ShutdownSignal;
use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin, PinState};

/// Input that replays a fixed sequence of raw values.
///
/// Any nonzero value reads as high. After the last value has been read the
/// shutdown signal (if any) is fired and the last value keeps being returned.
pub struct ScriptedInput<'a> {
    script: Vec<u8>,
    position: usize,
    shutdown: Option<&'a ShutdownSignal>,
    fail_at: Option<usize>,
}

impl<'a> ScriptedInput<'a> {
    pub fn new(script: &[u8]) -> Self {
        assert!(!script.is_empty(), "Script needs at least one value.");
        Self {
            script: script.to_vec(),
            position: 0,
            shutdown: None,
            fail_at: None,
        }
    }

    /// Fire `shutdown` once the whole script has been read.
    pub fn then_shutdown(mut self, shutdown: &'a ShutdownSignal) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Fail the read with the given (zero-based) index.
    pub fn failing_at(mut self, read: usize) -> Self {
        self.fail_at = Some(read);
        self
    }
}

impl ErrorType for ScriptedInput<'_> {
    type Error = ErrorKind;
}

impl InputPin for ScriptedInput<'_> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        if self.fail_at == Some(self.position) {
            return Err(ErrorKind::Other);
        }
        let value = self.script[self.position.min(self.script.len() - 1)];
        self.position += 1;
        if self.position == self.script.len() {
            if let Some(shutdown) = self.shutdown {
                shutdown.trigger();
            }
        }
        Ok(value != 0)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

/// A single write to a [`RecordingOutput`].
#[derive(Debug, Clone, Copy)]
pub struct Write {
    pub at: Instant,
    pub level: PinState,
}

/// Shared view of the writes made to a [`RecordingOutput`].
#[derive(Debug, Clone, Default)]
pub struct WriteLog(Arc<Mutex<Vec<Write>>>);

impl WriteLog {
    pub fn writes(&self) -> Vec<Write> {
        self.0.lock().unwrap().clone()
    }

    pub fn levels(&self) -> Vec<PinState> {
        self.writes().iter().map(|w| w.level).collect()
    }
}

/// Output that records every successful write.
pub struct RecordingOutput {
    log: WriteLog,
    attempts: usize,
    fail_at: Option<usize>,
}

impl RecordingOutput {
    pub fn new() -> (Self, WriteLog) {
        let log = WriteLog::default();
        let output = Self {
            log: log.clone(),
            attempts: 0,
            fail_at: None,
        };
        (output, log)
    }

    /// Fail the write attempt with the given (zero-based) index.
    pub fn failing_at(mut self, attempt: usize) -> Self {
        self.fail_at = Some(attempt);
        self
    }
}

impl ErrorType for RecordingOutput {
    type Error = ErrorKind;
}

impl OutputPin for RecordingOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_state(PinState::Low)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_state(PinState::High)
    }

    fn set_state(&mut self, level: PinState) -> Result<(), Self::Error> {
        let attempt = self.attempts;
        self.attempts += 1;
        if self.fail_at == Some(attempt) {
            return Err(ErrorKind::Other);
        }
        self.log.0.lock().unwrap().push(Write {
            at: Instant::now(),
            level,
        });
        Ok(())
    }
}

pub fn bits(levels: &[PinState]) -> Vec<u8> {
    levels.iter().map(|&l| u8::from(l == PinState::High)).collect()
}
