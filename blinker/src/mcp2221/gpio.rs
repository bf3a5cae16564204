use bit_field::BitField;
use embedded_hal::digital::PinState;

use super::PinNumber;

/// GPIO pin direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioDirection {
    /// Digital input.
    Input,
    /// Digital output.
    Output,
}

impl GpioDirection {
    /// Whether the pin is an output.
    pub fn is_output(&self) -> bool {
        matches!(self, GpioDirection::Output)
    }
}

impl From<bool> for GpioDirection {
    /// The MCP2221 uses a set bit for input.
    fn from(value: bool) -> Self {
        if value { Self::Input } else { Self::Output }
    }
}

impl From<GpioDirection> for bool {
    fn from(value: GpioDirection) -> Self {
        matches!(value, GpioDirection::Input)
    }
}

/// Direction and level of a pin set for GPIO operation.
///
/// For an input the level is the value read at the pin, for an output it is
/// the level the pin is driven to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinValue {
    /// Current pin direction.
    pub direction: GpioDirection,
    /// Current pin level.
    pub level: PinState,
}

/// Status of the GPIO pins, as returned by the Get GPIO Values command.
///
/// An entry is `None` if the pin is not configured for GPIO operation.
///
/// ## Datasheet
///
/// See table 3-35 for the response layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioValues([Option<PinValue>; 4]);

impl GpioValues {
    pub(crate) fn from_buffer(buf: &[u8; 64]) -> Self {
        // Each pin has a level byte then a direction byte, starting at byte 2.
        Self(PinNumber::ALL.map(|pin| {
            let offset = 2 + 2 * pin.index();
            parse_bytes(buf[offset], buf[offset + 1])
        }))
    }

    /// Values for a single pin.
    pub fn for_pin(&self, pin: PinNumber) -> Option<PinValue> {
        self.0[pin.index()]
    }
}

/// Parse the level and direction bytes for one pin.
///
/// The MCP2221 returns sentinel values (0xEE for the level, 0xEF for the
/// direction) when the pin is not in GPIO mode.
fn parse_bytes(level_byte: u8, direction_byte: u8) -> Option<PinValue> {
    let level = match level_byte {
        0x00 => PinState::Low,
        0x01 => PinState::High,
        _ => return None,
    };
    let direction = match direction_byte {
        0x00 => GpioDirection::Output,
        0x01 => GpioDirection::Input,
        _ => return None,
    };
    Some(PinValue { direction, level })
}

/// Changes to GPIO direction and output level, for the Set GPIO Output Values
/// command.
///
/// Settings that are left unset are not changed on the device. These changes
/// do not put a pin into GPIO mode; see [`GpSetting`] for that.
///
/// ## Datasheet
///
/// See section 3.1.11 for the command layout.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GpioChanges {
    directions: [Option<GpioDirection>; 4],
    levels: [Option<PinState>; 4],
}

impl GpioChanges {
    /// Create a struct with no pending changes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the direction of a pin.
    pub fn with_direction(&mut self, pin: PinNumber, direction: GpioDirection) -> &mut Self {
        self.directions[pin.index()] = Some(direction);
        self
    }

    /// Set the output level of a pin.
    pub fn with_level(&mut self, pin: PinNumber, level: PinState) -> &mut Self {
        self.levels[pin.index()] = Some(level);
        self
    }

    /// Write the changes into a zeroed command buffer.
    pub(crate) fn apply_to_buffer(&self, buf: &mut [u8; 64]) {
        // Each setting is preceded by an "enable" byte; only non-zero enables
        // cause the following byte to be loaded.
        const ENABLE_SETTING: u8 = 0x01;

        for pin in PinNumber::ALL {
            let offset = 2 + 4 * pin.index();
            if let Some(level) = self.levels[pin.index()] {
                buf[offset] = ENABLE_SETTING;
                buf[offset + 1] = u8::from(level == PinState::High);
            }
            if let Some(direction) = self.directions[pin.index()] {
                buf[offset + 2] = ENABLE_SETTING;
                buf[offset + 3] = u8::from(bool::from(direction));
            }
        }
    }
}

/// Mode of a GP pin that selects GPIO operation.
///
/// The value is the same for all four pins. See table 1-5 of the datasheet.
pub(crate) const GPIO_MODE: u8 = 0b000;

/// Run-time designation of one GP pin, as held in SRAM.
///
/// ## Datasheet
///
/// See table 3-39 (Get SRAM Settings) and table 3-37 (Set SRAM Settings). Both
/// use the same bit layout per pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GpSetting {
    /// Pin function, [`GPIO_MODE`] for GPIO operation.
    pub(crate) mode: u8,
    pub(crate) direction: GpioDirection,
    pub(crate) value: PinState,
}

impl GpSetting {
    /// GPIO operation with the given direction and output level.
    pub(crate) fn gpio(direction: GpioDirection, value: PinState) -> Self {
        Self {
            mode: GPIO_MODE,
            direction,
            value,
        }
    }

    pub(crate) fn from_byte(byte: u8) -> Self {
        Self {
            mode: byte.get_bits(0..=2),
            direction: byte.get_bit(3).into(),
            value: PinState::from(byte.get_bit(4)),
        }
    }

    pub(crate) fn to_byte(self) -> u8 {
        let mut byte = 0u8;
        byte.set_bit(4, self.value == PinState::High);
        byte.set_bit(3, self.direction.into());
        byte.set_bits(0..=2, self.mode);
        byte
    }
}

/// The four GP pin settings plus the analog references from SRAM.
///
/// Writing GP settings without also writing the DAC and ADC voltage
/// references resets both to "off" (see the note in section 1.8.1.1 of the
/// datasheet), so the raw reference bits are carried along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SramGpSettings {
    pub(crate) pins: [GpSetting; 4],
    /// Reference source bit and Vrm level bits for the DAC.
    dac_reference: (bool, u8),
    /// Reference source bit and Vrm level bits for the ADC.
    adc_reference: (bool, u8),
}

impl SramGpSettings {
    /// Parse a Get SRAM Settings response.
    pub(crate) fn from_buffer(buf: &[u8; 64]) -> Self {
        // GP settings start at byte 22.
        const GP_START_BYTE: usize = 22;
        Self {
            pins: PinNumber::ALL.map(|pin| GpSetting::from_byte(buf[GP_START_BYTE + pin.index()])),
            dac_reference: (buf[6].get_bit(5), buf[6].get_bits(6..=7)),
            adc_reference: (buf[7].get_bit(2), buf[7].get_bits(3..=4)),
        }
    }

    /// Write a Set SRAM Settings command that alters the GP designation.
    pub(crate) fn apply_to_buffer(&self, buf: &mut [u8; 64]) {
        // Byte 3: DAC voltage reference, byte 5: ADC voltage reference.
        for (byte, (vrm, level)) in [(3, self.dac_reference), (5, self.adc_reference)] {
            buf[byte].set_bit(7, true);
            buf[byte].set_bits(1..=2, if vrm { level } else { 0 });
            buf[byte].set_bit(0, vrm);
        }
        // Byte 7: alter GP designation, bytes 8..=11: GP0 to GP3.
        buf[7].set_bit(7, true);
        for pin in PinNumber::ALL {
            buf[8 + pin.index()] = self.pins[pin.index()].to_byte();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_gpio_values_response() {
        let mut buf = [0u8; 64];
        buf[0] = 0x51;
        // GP0 input reading high.
        buf[2] = 0x01;
        buf[3] = 0x01;
        // GP1 output driven low.
        buf[4] = 0x00;
        buf[5] = 0x00;
        // GP2 and GP3 not in GPIO mode.
        buf[6..10].copy_from_slice(&[0xEE, 0xEF, 0xEE, 0xEF]);

        let values = GpioValues::from_buffer(&buf);
        assert_eq!(
            values.for_pin(PinNumber::Gp0),
            Some(PinValue {
                direction: GpioDirection::Input,
                level: PinState::High
            })
        );
        assert_eq!(
            values.for_pin(PinNumber::Gp1),
            Some(PinValue {
                direction: GpioDirection::Output,
                level: PinState::Low
            })
        );
        assert_eq!(values.for_pin(PinNumber::Gp2), None);
        assert_eq!(values.for_pin(PinNumber::Gp3), None);
    }

    #[test]
    fn gpio_changes_only_enable_set_fields() {
        let mut buf = [0u8; 64];
        GpioChanges::new()
            .with_level(PinNumber::Gp1, PinState::High)
            .with_direction(PinNumber::Gp3, GpioDirection::Input)
            .apply_to_buffer(&mut buf);

        let mut expected = [0u8; 64];
        // GP1 level: bytes 6 and 7.
        expected[6] = 0x01;
        expected[7] = 0x01;
        // GP3 direction: bytes 16 and 17.
        expected[16] = 0x01;
        expected[17] = 0x01;
        assert_eq!(buf, expected);
    }

    #[test]
    fn gp_setting_byte_layout() {
        let setting = GpSetting::gpio(GpioDirection::Input, PinState::High);
        assert_eq!(setting.to_byte(), 0b0001_1000);
        let adc = GpSetting::from_byte(0b0000_0010);
        assert_eq!(adc.mode, 0b010);
        assert_eq!(adc.direction, GpioDirection::Output);
        assert_eq!(adc.value, PinState::Low);
    }

    #[test]
    fn sram_write_keeps_analog_references() {
        let mut response = [0u8; 64];
        response[0] = 0x61;
        // DAC: Vrm at level 0b10. ADC: Vdd.
        response[6] = 0b1010_0000;
        response[7] = 0b0000_0000;
        response[22] = 0b0000_0010;
        let mut settings = SramGpSettings::from_buffer(&response);
        settings.pins[1] = GpSetting::gpio(GpioDirection::Output, PinState::Low);

        let mut buf = [0u8; 64];
        settings.apply_to_buffer(&mut buf);
        assert_eq!(buf[3], 0b1000_0101);
        assert_eq!(buf[5], 0b1000_0000);
        assert_eq!(buf[7], 0b1000_0000);
        assert_eq!(buf[8], 0b0000_0010);
        assert_eq!(buf[9], 0b0000_0000);
    }
}
