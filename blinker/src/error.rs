use std::fmt;

/// Failure that stopped the relay pipeline.
///
/// `I` is the error type of the input pin and `O` that of the output pin. Both
/// variants are fatal: the pipeline does not retry reads or writes.
#[derive(Debug)]
pub enum Error<I, O> {
    /// Reading the input pin failed, so the sampler stopped.
    ///
    /// A stale reading could leave the output in the wrong state, so this is
    /// never masked.
    Read(I),
    /// Writing the output pin failed, so the pattern driver stopped.
    ///
    /// Only returned when the driver is configured with
    /// [`WriteErrorPolicy::Abort`](crate::WriteErrorPolicy::Abort).
    Write(O),
}

impl<I: fmt::Debug, O: fmt::Debug> fmt::Display for Error<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Read(e) => write!(f, "failed to read input pin: {e:?}"),
            Error::Write(e) => write!(f, "failed to write output pin: {e:?}"),
        }
    }
}

impl<I: fmt::Debug, O: fmt::Debug> std::error::Error for Error<I, O> {}
