use std::fmt;
use std::str::FromStr;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin, PinState, StatefulOutputPin};

use super::{Error, GpioChanges, GpioDirection, MCP2221, PinValue};

/// The specific GP pin number of a given pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinNumber {
    /// Pin GP0.
    Gp0,
    /// Pin GP1.
    Gp1,
    /// Pin GP2.
    Gp2,
    /// Pin GP3.
    Gp3,
}

impl PinNumber {
    /// All four GP pins in order.
    pub const ALL: [PinNumber; 4] = [PinNumber::Gp0, PinNumber::Gp1, PinNumber::Gp2, PinNumber::Gp3];

    pub(crate) fn index(&self) -> usize {
        match self {
            PinNumber::Gp0 => 0,
            PinNumber::Gp1 => 1,
            PinNumber::Gp2 => 2,
            PinNumber::Gp3 => 3,
        }
    }

    pub(crate) fn mask(&self) -> u8 {
        1 << self.index()
    }
}

impl fmt::Display for PinNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GP{}", self.index())
    }
}

impl FromStr for PinNumber {
    type Err = Error;

    /// Accepts `gp0` to `gp3` (any case) or a bare `0` to `3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let digit = lower.strip_prefix("gp").unwrap_or(lower.as_str());
        match digit {
            "0" => Ok(PinNumber::Gp0),
            "1" => Ok(PinNumber::Gp1),
            "2" => Ok(PinNumber::Gp2),
            "3" => Ok(PinNumber::Gp3),
            _ => Err(Error::UnknownPin(s.to_owned())),
        }
    }
}

/// A GP pin taken from the driver that can be configured for GPIO input or output.
///
/// The pin goes back to the driver, and can be taken again, when this value
/// (or the [`Input`] or [`Output`] made from it) is dropped.
#[derive(Debug)]
pub struct GpPin<'a> {
    driver: &'a MCP2221,
    number: PinNumber,
}

impl<'a> GpPin<'a> {
    pub(super) fn new(driver: &'a MCP2221, number: PinNumber) -> Self {
        Self { driver, number }
    }

    /// Set up the GP pin as a GPIO digital input.
    pub fn into_input(self) -> Result<Input<'a>, Error> {
        self.driver
            .sram_set_gpio(self.number, GpioDirection::Input, PinState::Low)?;
        Ok(Input(self))
    }

    /// Set up the GP pin as a GPIO digital output driven at `initial`.
    pub fn into_output(self, initial: PinState) -> Result<Output<'a>, Error> {
        self.driver
            .sram_set_gpio(self.number, GpioDirection::Output, initial)?;
        Ok(Output(self))
    }

    fn current(&self) -> Result<PinValue, Error> {
        self.driver
            .gpio_read()?
            .for_pin(self.number)
            .ok_or(Error::PinModeChanged(self.number))
    }
}

impl Drop for GpPin<'_> {
    fn drop(&mut self) {
        self.driver.release_pin(self.number);
    }
}

/// A GP pin in GPIO input mode.
#[derive(Debug)]
pub struct Input<'a>(GpPin<'a>);

impl Input<'_> {
    /// Read the input level of this pin.
    pub fn level(&self) -> Result<PinState, Error> {
        self.0.current().map(|v| v.level)
    }
}

impl ErrorType for Input<'_> {
    type Error = Error;
}

impl InputPin for Input<'_> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.level().map(|level| level == PinState::High)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.level().map(|level| level == PinState::Low)
    }
}

/// A GP pin in GPIO output mode.
#[derive(Debug)]
pub struct Output<'a>(GpPin<'a>);

impl Output<'_> {
    /// Drive this pin to `level`.
    ///
    /// This is a single Set GPIO Output Values transfer; the pin mode is not
    /// re-checked on every write.
    pub fn set_level(&self, level: PinState) -> Result<(), Error> {
        let mut changes = GpioChanges::new();
        changes.with_level(self.0.number, level);
        self.0.driver.gpio_write(&changes)
    }

    /// The level this pin is currently driven to.
    pub fn output_level(&self) -> Result<PinState, Error> {
        let value = self.0.current()?;
        if value.direction.is_output() {
            Ok(value.level)
        } else {
            Err(Error::PinModeChanged(self.0.number))
        }
    }
}

impl ErrorType for Output<'_> {
    type Error = Error;
}

impl OutputPin for Output<'_> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_level(PinState::Low)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_level(PinState::High)
    }
}

impl StatefulOutputPin for Output<'_> {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        self.output_level().map(|level| level == PinState::High)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        self.output_level().map(|level| level == PinState::Low)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_pin_names() {
        for (name, expected) in [
            ("gp0", PinNumber::Gp0),
            ("GP1", PinNumber::Gp1),
            ("2", PinNumber::Gp2),
            (" gp3 ", PinNumber::Gp3),
        ] {
            assert_eq!(name.parse::<PinNumber>().unwrap(), expected, "{name}");
        }
    }

    #[test]
    fn reject_unknown_pin_names() {
        for name in ["gp4", "", "gp", "7", "led"] {
            assert!(
                matches!(name.parse::<PinNumber>(), Err(Error::UnknownPin(_))),
                "{name}"
            );
        }
    }

    #[test]
    fn display_matches_datasheet_names() {
        assert_eq!(PinNumber::Gp2.to_string(), "GP2");
    }
}
