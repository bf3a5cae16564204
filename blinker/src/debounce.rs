//! Noise filtering of raw input readings.
use embedded_hal::digital::PinState;

use crate::config::NoisePolicy;

/// Filter state for one input pin.
///
/// Feed every raw reading to [`Debouncer::update`]; it returns the reading
/// only when it should be forwarded downstream.
#[derive(Debug, Clone)]
pub struct Debouncer {
    policy: NoisePolicy,
    /// Last value actually forwarded.
    ///
    /// `None` until the first forward under the threshold policy. The edge
    /// policy starts from Low, so an input that is idle at startup produces
    /// no event.
    last_sent: Option<PinState>,
    /// Length of the current run of High readings (threshold policy only).
    consecutive_high: u32,
}

impl Debouncer {
    /// Create a filter in its startup state.
    pub fn new(policy: NoisePolicy) -> Self {
        let last_sent = match policy {
            NoisePolicy::Threshold { .. } => None,
            NoisePolicy::EdgeTriggered => Some(PinState::Low),
        };
        Self {
            policy,
            last_sent,
            consecutive_high: 0,
        }
    }

    /// Classify one raw reading, returning it if it is a real change.
    pub fn update(&mut self, level: PinState) -> Option<PinState> {
        let forward = match self.policy {
            NoisePolicy::Threshold { noise } => match level {
                PinState::Low => {
                    self.consecutive_high = 0;
                    self.last_sent != Some(PinState::Low)
                }
                PinState::High => {
                    self.consecutive_high = self.consecutive_high.saturating_add(1);
                    // Only the sample that crosses the threshold is forwarded,
                    // so a long run yields a single event.
                    u64::from(self.consecutive_high) == u64::from(noise) + 1
                }
            },
            NoisePolicy::EdgeTriggered => self.last_sent != Some(level),
        };

        if forward {
            self.last_sent = Some(level);
            Some(level)
        } else {
            None
        }
    }
}
