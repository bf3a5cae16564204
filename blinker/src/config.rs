//! Tunables for the relay pipeline.
use std::time::Duration;

/// Default period between two reads of the input pin.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(1);
/// Default period between two toggles of the output while blinking.
pub const DEFAULT_BLINK_INTERVAL: Duration = Duration::from_millis(100);
/// Shortest sample or blink interval; shorter ones are raised to this.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);
/// Default number of High samples treated as noise by [`NoisePolicy::Threshold`].
pub const DEFAULT_NOISE_THRESHOLD: u32 = 99;

/// How the sampler decides that a reading is a real change of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoisePolicy {
    /// Forward High only once it has been read `noise + 1` times in a row.
    ///
    /// Low readings are never considered noisy and are forwarded as soon as
    /// they follow anything other than Low.
    Threshold {
        /// Number of consecutive High readings that are still discarded.
        noise: u32,
    },
    /// Forward a reading only when it differs from the last forwarded value.
    EdgeTriggered,
}

impl Default for NoisePolicy {
    fn default() -> Self {
        Self::Threshold {
            noise: DEFAULT_NOISE_THRESHOLD,
        }
    }
}

/// What the output does while the input is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputPattern {
    /// Toggle the output every `interval` until the input is released.
    Blink {
        /// Time between two toggles, at least [`MIN_INTERVAL`].
        interval: Duration,
    },
    /// Hold the output high until the input is released.
    Steady,
}

impl Default for OutputPattern {
    fn default() -> Self {
        Self::Blink {
            interval: DEFAULT_BLINK_INTERVAL,
        }
    }
}

/// What the pattern driver does when writing the output pin fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteErrorPolicy {
    /// Stop the pipeline and report [`Error::Write`](crate::Error::Write).
    #[default]
    Abort,
    /// Log the failure and keep driving the output.
    Log,
}

/// Settings for [`relay::run`](crate::relay::run).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Filter applied to input readings.
    pub noise_policy: NoisePolicy,
    /// Time between two reads of the input pin.
    ///
    /// Cancellation is noticed between samples, so this also bounds the
    /// shutdown latency. Values below [`MIN_INTERVAL`], including zero, are
    /// raised to it.
    pub sample_interval: Duration,
    /// Output behaviour while the input is active.
    pub pattern: OutputPattern,
    /// Handling of output write failures.
    pub on_write_error: WriteErrorPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            noise_policy: NoisePolicy::default(),
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            pattern: OutputPattern::default(),
            on_write_error: WriteErrorPolicy::default(),
        }
    }
}

impl Config {
    /// Create a config with the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the input filter.
    pub fn with_noise_policy(mut self, policy: NoisePolicy) -> Self {
        self.noise_policy = policy;
        self
    }

    /// Set the time between two input samples.
    pub fn with_sample_interval(mut self, interval: Duration) -> Self {
        self.sample_interval = interval;
        self
    }

    /// Set the output behaviour while the input is active.
    pub fn with_pattern(mut self, pattern: OutputPattern) -> Self {
        self.pattern = pattern;
        self
    }

    /// Set the handling of output write failures.
    pub fn with_write_error_policy(mut self, policy: WriteErrorPolicy) -> Self {
        self.on_write_error = policy;
        self
    }
}
