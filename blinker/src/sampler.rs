//! Producer side of the relay: polls the input pin and emits debounced events.
use std::sync::mpsc::SyncSender;
use std::time::Duration;

use embedded_hal::digital::{InputPin, PinState};
use log::{debug, info};

use crate::clock::Ticker;
use crate::config::NoisePolicy;
use crate::debounce::Debouncer;
use crate::shutdown::Cancellation;

/// Polls an input pin at a fixed interval and forwards filtered changes.
#[derive(Debug)]
pub struct InputSampler<P> {
    pin: P,
    debouncer: Debouncer,
    interval: Duration,
}

impl<P: InputPin> InputSampler<P> {
    /// Create a sampler reading `pin` every `interval`.
    pub fn new(pin: P, policy: NoisePolicy, interval: Duration) -> Self {
        Self {
            pin,
            debouncer: Debouncer::new(policy),
            interval,
        }
    }

    /// Sample until `cancel` fires, sending every forwarded value on `events`.
    ///
    /// The channel is closed when this returns, whatever the reason, because
    /// the sender is dropped. Cancellation is checked once per sample, after
    /// any send, so no event is sent after the first check that sees it.
    ///
    /// If the receiving side has gone away the sampler stops quietly; the
    /// receiver reports its own failure.
    ///
    /// # Errors
    ///
    /// Returns the pin's error as soon as a read fails.
    pub fn run(mut self, events: SyncSender<PinState>, cancel: &Cancellation) -> Result<(), P::Error> {
        info!("Sampling input every {:?}", self.interval);
        let mut ticker = Ticker::new(self.interval);
        loop {
            let level = PinState::from(self.pin.is_high()?);

            if let Some(value) = self.debouncer.update(level) {
                debug!("Input changed to {value:?}");
                if events.send(value).is_err() {
                    debug!("Event receiver hung up, stopping sampler");
                    return Ok(());
                }
            }

            if cancel.is_cancelled() {
                info!("Sampler cancelled");
                return Ok(());
            }

            ticker.wait();
        }
    }
}
