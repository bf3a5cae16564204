#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod clock;
pub mod config;
pub mod debounce;
mod error;
pub mod mcp2221;
pub mod pattern;
pub mod relay;
pub mod sampler;
pub mod shutdown;

pub use config::{Config, NoisePolicy, OutputPattern, WriteErrorPolicy};
pub use error::Error;
pub use shutdown::{Cancellation, ShutdownSignal};
