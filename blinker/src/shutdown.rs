//! One-shot shutdown notification fed by process termination signals.
use std::process;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{info, warn};

/// Exit status used when a termination request can no longer be delivered.
pub const FORCED_EXIT_CODE: i32 = 130;

#[derive(Debug, Default)]
struct Inner {
    fired: Mutex<bool>,
    changed: Condvar,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, bool> {
        // The flag is a plain bool, so a poisoned lock still holds a valid value.
        self.fired.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fire(&self) -> bool {
        let mut fired = self.lock();
        if *fired {
            return false;
        }
        *fired = true;
        self.changed.notify_all();
        true
    }
}

/// Notifier that fires at most once and wakes every subscribed [`Cancellation`].
///
/// Hook it up to SIGINT and SIGTERM with [`ShutdownSignal::on_termination`], or
/// fire it directly with [`ShutdownSignal::trigger`].
#[derive(Debug, Default)]
pub struct ShutdownSignal {
    inner: Arc<Inner>,
}

impl ShutdownSignal {
    /// Create a signal that has not fired.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a handle that observes this signal.
    ///
    /// Any number of handles can be taken; each sees the signal fire once.
    pub fn subscribe(&self) -> Cancellation {
        Cancellation {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Fire the signal.
    ///
    /// Returns `true` if this call fired it, `false` if it had already fired.
    pub fn trigger(&self) -> bool {
        self.inner.fire()
    }

    /// Whether the signal has fired.
    pub fn has_fired(&self) -> bool {
        *self.inner.lock()
    }

    /// Fire this signal when the process receives SIGINT or SIGTERM.
    ///
    /// Only the first request is delivered to the signal. Any later request,
    /// or any request after this signal and all of its [`Cancellation`]
    /// handles are dropped, gets the default behaviour back: the process exits
    /// at once with [`FORCED_EXIT_CODE`]. Destructors do not run on that path.
    ///
    /// # Errors
    ///
    /// The OS handler can only be installed once per process. A second call
    /// returns [`ctrlc::Error::MultipleHandlers`].
    pub fn on_termination(&self) -> Result<(), ctrlc::Error> {
        let inner = Arc::downgrade(&self.inner);
        ctrlc::set_handler(move || match inner.upgrade() {
            Some(inner) if inner.fire() => info!("Termination requested, shutting down"),
            _ => {
                warn!("Termination requested again, exiting");
                process::exit(FORCED_EXIT_CODE);
            }
        })
    }
}

/// Observer side of a [`ShutdownSignal`].
#[derive(Debug, Clone)]
pub struct Cancellation {
    inner: Arc<Inner>,
}

impl Cancellation {
    /// Non-blocking check for whether the signal has fired.
    pub fn is_cancelled(&self) -> bool {
        *self.inner.lock()
    }

    /// Block until the signal fires or `timeout` passes.
    ///
    /// Returns `true` if the signal fired.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let fired = self.inner.lock();
        let (fired, _) = self
            .inner
            .changed
            .wait_timeout_while(fired, timeout, |fired| !*fired)
            .unwrap_or_else(PoisonError::into_inner);
        *fired
    }
}
