//! GPIO pins of the Microchip MCP2221 USB to GPIO converter.
//!
//! This is the host-side pin provider used by the `blinker` binary. Only GPIO
//! operation is supported: pins are taken from the driver by number, set up as
//! a digital input or output, and used through the [`embedded_hal::digital`]
//! traits.
//!
//! ```no_run
//! use blinker::mcp2221::{MCP2221, PinNumber};
//! use embedded_hal::digital::{InputPin, PinState};
//!
//! # fn main() -> Result<(), blinker::mcp2221::Error> {
//! let device = MCP2221::connect()?;
//! let mut switch = device.take_pin(PinNumber::Gp0)?.into_input()?;
//! let _led = device.take_pin(PinNumber::Gp1)?.into_output(PinState::Low)?;
//! println!("switch high: {}", switch.is_high()?);
//! # Ok(())
//! # }
//! ```
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, PoisonError};

use embedded_hal::digital::PinState;
use hidapi::{HidApi, HidDevice};
use log::debug;

use commands::{McpCommand, UsbReport};
use gpio::{GpSetting, SramGpSettings};

mod commands;
mod error;
mod gpio;
mod pins;

pub use error::Error;
pub use gpio::{GpioChanges, GpioDirection, GpioValues, PinValue};
pub use pins::{GpPin, Input, Output, PinNumber};

/// Default USB vendor ID (Microchip).
pub const MICROCHIP_VID: u16 = 0x04D8;
/// Default USB product ID of the MCP2221 and MCP2221A.
pub const MCP2221_PID: u16 = 0x00DD;

/// Success code returned in byte 1 of every response.
const COMMAND_SUCCESS: u8 = 0x00;

/// Driver for the GP pins of an MCP2221.
///
/// The driver can be shared between threads: each USB transfer takes a lock
/// on the device, so pins taken from it can be used from different threads.
#[derive(Debug)]
pub struct MCP2221 {
    /// Underlying [`hidapi`] device.
    ///
    /// `HidDevice` is `Send` but not `Sync`, so transfers are serialised here.
    inner: Mutex<HidDevice>,
    /// One bit per GP pin, set while the pin is taken.
    pins_taken: AtomicU8,
}

impl MCP2221 {
    /// Connect to the first USB device found with the default vendor and product ID.
    ///
    /// # Errors
    ///
    /// An error will be returned if the USB device cannot be opened.
    pub fn connect() -> Result<Self, Error> {
        MCP2221::connect_with_vid_and_pid(MICROCHIP_VID, MCP2221_PID)
    }

    /// Connect to the first USB device found with the given vendor and product ID.
    ///
    /// Use this constructor if you have changed the USB VID or PID of your MCP2221.
    ///
    /// # Errors
    ///
    /// An error will be returned if the USB device cannot be opened.
    pub fn connect_with_vid_and_pid(vendor_id: u16, product_id: u16) -> Result<Self, Error> {
        let hidapi = HidApi::new()?;
        let device = hidapi.open(vendor_id, product_id)?;
        debug!("Opened USB device {vendor_id:#06X}:{product_id:#06X}");
        Ok(Self {
            inner: Mutex::new(device),
            pins_taken: AtomicU8::new(0),
        })
    }

    /// Take a GP pin for GPIO operation.
    ///
    /// # Errors
    ///
    /// [`Error::PinInUse`] if the pin has been taken and not yet dropped.
    pub fn take_pin(&self, number: PinNumber) -> Result<GpPin<'_>, Error> {
        let previous = self.pins_taken.fetch_or(number.mask(), Ordering::AcqRel);
        if previous & number.mask() != 0 {
            return Err(Error::PinInUse(number));
        }
        Ok(GpPin::new(self, number))
    }

    pub(crate) fn release_pin(&self, number: PinNumber) {
        self.pins_taken.fetch_and(!number.mask(), Ordering::AcqRel);
    }

    /// Get GPIO pin direction and current logic levels.
    ///
    /// # Datasheet
    ///
    /// See section 3.1.12 for the underlying Get GPIO Values HID command.
    pub fn gpio_read(&self) -> Result<GpioValues, Error> {
        let buf = self.transfer(&UsbReport::new(McpCommand::GetGpioValues))?;
        Ok(GpioValues::from_buffer(&buf))
    }

    /// Change GPIO pins' direction and output logic level.
    ///
    /// This will not put a pin into GPIO mode; use [`GpPin::into_input`] or
    /// [`GpPin::into_output`] for that.
    ///
    /// # Datasheet
    ///
    /// See section 3.1.11 for the underlying Set GPIO Output Values HID command.
    pub fn gpio_write(&self, changes: &GpioChanges) -> Result<(), Error> {
        let mut command = UsbReport::new(McpCommand::SetGpioOutputValues);
        changes.apply_to_buffer(&mut command.write_buffer);
        self.transfer(&command)?;
        Ok(())
    }

    /// Put a single GP pin into GPIO mode in SRAM, leaving the others as they are.
    ///
    /// This does not persist across a device reset.
    ///
    /// # Datasheet
    ///
    /// See sections 3.1.13 and 3.1.14 for the Set and Get SRAM Settings commands.
    pub(crate) fn sram_set_gpio(
        &self,
        number: PinNumber,
        direction: GpioDirection,
        level: PinState,
    ) -> Result<(), Error> {
        let current = self.transfer(&UsbReport::new(McpCommand::GetSramSettings))?;
        let mut settings = SramGpSettings::from_buffer(&current);
        settings.pins[number.index()] = GpSetting::gpio(direction, level);

        let mut command = UsbReport::new(McpCommand::SetSramSettings);
        settings.apply_to_buffer(&mut command.write_buffer);
        self.transfer(&command)?;
        debug!("Configured {number} as GPIO {direction:?}");
        Ok(())
    }

    /// Write the given command to the MCP2221 and read the 64-byte response.
    fn transfer(&self, command: &UsbReport) -> Result<[u8; 64], Error> {
        let out_command_byte = command.command_code();
        let mut read_buffer = [0u8; 64];
        let (written, read) = {
            let device = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            let written = device.write(&command.report_bytes())?;
            let read = device.read(&mut read_buffer)?;
            (written, read)
        };

        if written != 65 {
            return Err(Error::ShortTransfer {
                expected: 65,
                actual: written,
            });
        }
        if read != 64 {
            return Err(Error::ShortTransfer {
                expected: 64,
                actual: read,
            });
        }

        let read_command_byte = read_buffer[0];
        if read_command_byte != out_command_byte {
            return Err(Error::MismatchedCommandCodeEcho {
                sent: out_command_byte,
                received: read_command_byte,
            });
        }

        match read_buffer[1] {
            COMMAND_SUCCESS => Ok(read_buffer),
            code => Err(Error::CommandFailed(code)),
        }
    }
}
