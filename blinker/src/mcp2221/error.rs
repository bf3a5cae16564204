use std::fmt;

use super::PinNumber;

/// Wrapper for problems when using GP pins of the MCP2221.
#[derive(Debug)]
pub enum Error {
    /// A command issued to the MCP2221 via USB HID did not complete successfully.
    ///
    /// The enclosed `u8` is the value returned by the MCP2221 in place of the success
    /// code (0).
    CommandFailed(u8),
    /// The command code echoed by the MCP2221 was not the command code written to it.
    MismatchedCommandCodeEcho {
        /// Command code that was sent to the MCP2221.
        sent: u8,
        /// Command code echoed from the MCP2221.
        received: u8,
    },
    /// Fewer bytes than a full USB report were transferred.
    ShortTransfer {
        /// Bytes expected.
        expected: usize,
        /// Bytes actually transferred.
        actual: usize,
    },
    /// The pin has already been taken and not yet released.
    PinInUse(PinNumber),
    /// The pin is no longer set for GPIO operation or its direction was changed.
    PinModeChanged(PinNumber),
    /// A pin name did not match any GP pin.
    UnknownPin(String),
    /// An error occurred when communicating with the MCP2221 USB device.
    HidApi(hidapi::HidError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CommandFailed(code) => write!(f, "MCP2221 command failed with code {code:#04X}"),
            Error::MismatchedCommandCodeEcho { sent, received } => write!(
                f,
                "MCP2221 echoed command code {received:#04X}, expected {sent:#04X}"
            ),
            Error::ShortTransfer { expected, actual } => {
                write!(f, "transferred {actual} bytes, expected {expected}")
            }
            Error::PinInUse(pin) => write!(f, "{pin} is already in use"),
            Error::PinModeChanged(pin) => write!(f, "{pin} is no longer configured as expected"),
            Error::UnknownPin(name) => write!(f, "unknown pin {name:?}, expected gp0 to gp3"),
            Error::HidApi(e) => write!(f, "USB HID error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::HidApi(e) => Some(e),
            _ => None,
        }
    }
}

#[doc(hidden)]
impl From<hidapi::HidError> for Error {
    fn from(value: hidapi::HidError) -> Self {
        Self::HidApi(value)
    }
}

impl embedded_hal::digital::Error for Error {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}
