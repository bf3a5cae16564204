/// The subset of MCP2221 HID commands needed for GPIO operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum McpCommand {
    /// Configure the run-time chip and GP pin settings.
    ///
    /// See section 3.1.13 of the datasheet.
    SetSramSettings,
    /// Retrieve the run-time chip and GP pin settings.
    ///
    /// See section 3.1.14 of the datasheet.
    GetSramSettings,
    /// Change GPIO pin output direction and logic level.
    ///
    /// See section 3.1.11 of the datasheet.
    SetGpioOutputValues,
    /// Retrieve the GPIO direction and pin value for those pins set to GPIO operation.
    ///
    /// See section 3.1.12 of the datasheet.
    GetGpioValues,
}

impl McpCommand {
    /// Command code written to byte 0 of the outgoing buffer.
    pub(crate) fn code(&self) -> u8 {
        match self {
            McpCommand::SetSramSettings => 0x60,
            McpCommand::GetSramSettings => 0x61,
            McpCommand::SetGpioOutputValues => 0x50,
            McpCommand::GetGpioValues => 0x51,
        }
    }
}

/// Outgoing command buffer.
pub(crate) struct UsbReport {
    /// Buffer sized to match those in the datasheet.
    ///
    /// The actual outgoing buffer is 65 bytes, as `hidapi` requires the USB HID
    /// report number to be prepended to the data bytes.
    pub(crate) write_buffer: [u8; 64],
}

impl UsbReport {
    pub(crate) fn new(command: McpCommand) -> Self {
        let mut write_buffer = [0u8; 64];
        write_buffer[0] = command.code();
        Self { write_buffer }
    }

    pub(crate) fn command_code(&self) -> u8 {
        self.write_buffer[0]
    }

    /// The buffer handed to `hidapi`, with the default report number (0) first.
    pub(crate) fn report_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[1..65].copy_from_slice(&self.write_buffer);
        out
    }
}
