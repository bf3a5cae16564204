use std::time::Duration;

use blinker::mcp2221::PinNumber;
use blinker::{Config, NoisePolicy, OutputPattern, WriteErrorPolicy};
use clap::{Parser, ValueEnum};

use crate::util;

/// Relay a switch to a blinking LED through an MCP2221
///
/// The switch is read from one GP pin of the MCP2221 and the LED driven from
/// another. Readings are filtered for electrical noise; while the switch is
/// closed the LED blinks, otherwise it is off. Press Ctrl-C to stop, which
/// always leaves the LED off.
///
/// Set RUST_LOG (for example RUST_LOG=debug) to change the log output.
#[derive(Debug, Parser)]
#[command(version, about)]
pub(crate) struct Cli {
    /// Device vendor ID in hexadecimal
    #[arg(short, long = "vid", default_value = "0x4D8", value_parser = util::u16_from_hex)]
    pub(crate) vid: u16,
    /// Device product ID in hexadecimal
    #[arg(short, long = "pid", default_value = "0xDD", value_parser = util::u16_from_hex)]
    pub(crate) pid: u16,
    /// GP pin to read the switch state from (gp0 to gp3)
    #[arg(long = "in", default_value = "gp0", value_parser = util::pin)]
    pub(crate) input: PinNumber,
    /// GP pin to supply current to the LED on (gp0 to gp3)
    #[arg(long = "out", default_value = "gp1", value_parser = util::pin)]
    pub(crate) output: PinNumber,
    /// How to filter noise on the switch input
    #[arg(long, value_enum, default_value_t = Policy::Threshold)]
    pub(crate) policy: Policy,
    /// Number of consecutive high readings still treated as noise
    ///
    /// Only used with the threshold policy.
    #[arg(long, default_value_t = blinker::config::DEFAULT_NOISE_THRESHOLD)]
    pub(crate) noise: u32,
    /// Time between two reads of the switch, e.g. 1ms or 2.5ms
    ///
    /// Values below 1ms are raised to 1ms.
    #[arg(long, default_value = "1ms", value_parser = util::interval)]
    pub(crate) sample_interval: Duration,
    /// Time between two toggles of the LED while blinking, e.g. 100ms or 1.5s
    #[arg(long, default_value = "100ms", value_parser = util::interval)]
    pub(crate) blink_interval: Duration,
    /// Keep the LED on while the switch is closed instead of blinking
    #[arg(long)]
    pub(crate) steady: bool,
    /// Log failed LED writes and carry on instead of stopping
    #[arg(long)]
    pub(crate) keep_going: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Policy {
    /// Accept a closed switch once it has been read more than NOISE times in a row.
    Threshold,
    /// Accept any change of the switch state.
    #[value(aliases = ["edge-triggered"])]
    Edge,
}

impl Cli {
    pub(crate) fn config(&self) -> Config {
        let noise_policy = match self.policy {
            Policy::Threshold => NoisePolicy::Threshold { noise: self.noise },
            Policy::Edge => NoisePolicy::EdgeTriggered,
        };
        let pattern = if self.steady {
            OutputPattern::Steady
        } else {
            OutputPattern::Blink {
                interval: self.blink_interval,
            }
        };
        let on_write_error = if self.keep_going {
            WriteErrorPolicy::Log
        } else {
            WriteErrorPolicy::Abort
        };
        Config::new()
            .with_noise_policy(noise_policy)
            .with_sample_interval(self.sample_interval)
            .with_pattern(pattern)
            .with_write_error_policy(on_write_error)
    }
}
