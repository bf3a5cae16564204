//! Wiring of sampler and driver into one running pipeline.
use std::panic;
use std::sync::mpsc;
use std::thread;

use embedded_hal::digital::{InputPin, OutputPin};
use log::{debug, info, warn};

use crate::config::Config;
use crate::error::Error;
use crate::pattern::PatternDriver;
use crate::sampler::InputSampler;
use crate::shutdown::ShutdownSignal;

/// Relay `input` to `output` until `shutdown` fires or a pin fails.
///
/// The sampler and the pattern driver each run on their own thread and are
/// joined by a channel of capacity one. The pins are moved into the threads,
/// so the input is only ever read by the sampler and the output only written
/// by the driver. Both pins are dropped before this returns.
///
/// Shutdown always starts at the sampler: it stops, closes the channel, and
/// the driver drains the remaining events, switches the output off, and
/// exits. If the driver stops first because of a write failure, `shutdown` is
/// fired so the sampler stops within one sample interval.
///
/// # Errors
///
/// [`Error::Read`] if reading the input failed, otherwise [`Error::Write`] if
/// writing the output failed.
pub fn run<I, O>(
    input: I,
    output: O,
    config: &Config,
    shutdown: &ShutdownSignal,
) -> Result<(), Error<I::Error, O::Error>>
where
    I: InputPin + Send,
    O: OutputPin + Send,
    I::Error: Send,
    O::Error: Send,
{
    let (events, received) = mpsc::sync_channel(1);
    let cancel = shutdown.subscribe();
    let sampler = InputSampler::new(input, config.noise_policy, config.sample_interval);
    let driver = PatternDriver::new(output, config.pattern, config.on_write_error);

    let (sampled, driven) = thread::scope(|s| {
        let sampler = s.spawn(move || sampler.run(events, &cancel));
        let driver = s.spawn(move || {
            let result = driver.run(received);
            if result.is_err() {
                shutdown.trigger();
            }
            result
        });
        (join(sampler), join(driver))
    });

    match (sampled, driven) {
        (Err(e), driven) => {
            debug!("Input read failed: {e:?}");
            if let Err(lost) = driven {
                warn!("Output write also failed: {lost:?}");
            }
            Err(Error::Read(e))
        }
        (Ok(()), Err(e)) => {
            debug!("Output write failed: {e:?}");
            Err(Error::Write(e))
        }
        (Ok(()), Ok(())) => {
            info!("Relay stopped");
            Ok(())
        }
    }
}

fn join<T>(handle: thread::ScopedJoinHandle<'_, T>) -> T {
    handle
        .join()
        .unwrap_or_else(|payload| panic::resume_unwind(payload))
}
