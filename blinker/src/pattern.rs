//! Consumer side of the relay: turns input events into an output pattern.
use std::sync::mpsc::{Receiver, RecvTimeoutError};

use embedded_hal::digital::{OutputPin, PinState};
use log::{debug, info, warn};

use crate::clock::Ticker;
use crate::config::{OutputPattern, WriteErrorPolicy};

/// Current state of the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputState {
    /// Input inactive, output low.
    #[default]
    Idle,
    /// Input active with [`OutputPattern::Blink`]; `on` is the current phase.
    Blinking {
        /// Whether the output is high in this phase.
        on: bool,
    },
    /// Input active with [`OutputPattern::Steady`], output high.
    Lit,
}

impl OutputState {
    /// The level the output pin should be at in this state.
    pub fn level(&self) -> PinState {
        match self {
            OutputState::Idle => PinState::Low,
            OutputState::Blinking { on } => PinState::from(*on),
            OutputState::Lit => PinState::High,
        }
    }

    /// Whether the input is considered active.
    pub fn is_active(&self) -> bool {
        !matches!(self, OutputState::Idle)
    }
}

/// Drives an output pin from the events produced by an
/// [`InputSampler`](crate::sampler::InputSampler).
#[derive(Debug)]
pub struct PatternDriver<P> {
    pin: P,
    pattern: OutputPattern,
    on_write_error: WriteErrorPolicy,
}

impl<P: OutputPin> PatternDriver<P> {
    /// Create a driver for `pin`.
    pub fn new(pin: P, pattern: OutputPattern, on_write_error: WriteErrorPolicy) -> Self {
        Self {
            pin,
            pattern,
            on_write_error,
        }
    }

    /// Consume events until the sending side closes the channel.
    ///
    /// The output is forced low before the first event and again on return.
    /// The final low is also written if this returns early with an error or
    /// unwinds from a panic.
    ///
    /// # Errors
    ///
    /// Returns the pin's error when a write fails under
    /// [`WriteErrorPolicy::Abort`].
    pub fn run(self, events: Receiver<PinState>) -> Result<(), P::Error> {
        let PatternDriver {
            pin,
            pattern,
            on_write_error,
        } = self;
        let mut out = LowOnExit::new(pin, on_write_error);
        let mut ticker = match pattern {
            OutputPattern::Blink { interval } => Some(Ticker::new(interval)),
            OutputPattern::Steady => None,
        };
        let mut state = OutputState::Idle;

        info!("Driving output with {pattern:?}");
        out.write(PinState::Low)?;

        loop {
            let received = match (&state, &ticker) {
                (OutputState::Blinking { .. }, Some(ticker)) => events.recv_timeout(ticker.remaining()),
                _ => events.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };

            let next = match received {
                Ok(PinState::Low) => OutputState::Idle,
                Ok(PinState::High) if state.is_active() => state,
                Ok(PinState::High) if ticker.is_some() => OutputState::Blinking { on: true },
                Ok(PinState::High) => OutputState::Lit,
                Err(RecvTimeoutError::Timeout) => match state {
                    OutputState::Blinking { on } => OutputState::Blinking { on: !on },
                    _ => continue,
                },
                Err(RecvTimeoutError::Disconnected) => break,
            };

            if next != state {
                debug!("Output {state:?} -> {next:?}");
                state = next;
                out.write(state.level())?;
                // The next toggle is measured from the write, so toggles are
                // never closer together than the interval.
                if let (OutputState::Blinking { .. }, Some(ticker)) = (&state, ticker.as_mut()) {
                    ticker.reset();
                }
            }
        }

        info!("Event channel closed, switching output off");
        out.release()
    }
}

/// Owns the output pin and writes it low when dropped.
///
/// [`LowOnExit::release`] performs the final write explicitly so its result
/// can be reported; the drop path only logs.
struct LowOnExit<P: OutputPin> {
    pin: P,
    policy: WriteErrorPolicy,
    armed: bool,
}

impl<P: OutputPin> LowOnExit<P> {
    fn new(pin: P, policy: WriteErrorPolicy) -> Self {
        Self {
            pin,
            policy,
            armed: true,
        }
    }

    fn write(&mut self, level: PinState) -> Result<(), P::Error> {
        match self.pin.set_state(level) {
            Ok(()) => Ok(()),
            Err(e) if self.policy == WriteErrorPolicy::Log => {
                warn!("Failed to set output {level:?}: {e:?}");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn release(mut self) -> Result<(), P::Error> {
        self.armed = false;
        self.write(PinState::Low)
    }
}

impl<P: OutputPin> Drop for LowOnExit<P> {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = self.pin.set_low() {
                warn!("Failed to switch output off: {e:?}");
            }
        }
    }
}
