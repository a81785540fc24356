//! Command set of the SDS011
//!
//! | ID   | reply      | meaning                            |
//! |------|------------|------------------------------------|
//! | 0x02 | C5, 02     | set reporting mode (active/query)  |
//! | 0x04 | C0         | query measurement data             |
//! | 0x05 | C5, 05     | set device ID                      |
//! | 0x06 | C5, 06     | sleep / work                       |
//! | 0x07 | C5, 07     | firmware version and device ID     |
//! | 0x08 | C5, 08     | set working period                 |
//!
//! Measurement replies carry class `C0` and no command echo; everything else
//! replies with class `C5` and echoes the ID in the first payload byte.

use crate::constants::protocol::{
    COMMAND_FRAME_LEN, COMMAND_REPLY, DATA_REPLY, START_COMMAND, STOP_COMMAND, VERSION_COMMAND,
};

/// A request the host can have outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    /// Set or query the reporting mode
    ReportingMode = 0x02,
    /// Query measurement data (also matches autonomous pushes)
    QueryData = 0x04,
    /// Set the device ID
    SetDeviceId = 0x05,
    /// Switch between sleeping and working
    SleepWork = 0x06,
    /// Read firmware date and device ID
    FirmwareVersion = 0x07,
    /// Set or query the working period
    WorkingPeriod = 0x08,
}

impl Command {
    /// Raw command ID byte
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Look up a command by its ID byte
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0x02 => Some(Self::ReportingMode),
            0x04 => Some(Self::QueryData),
            0x05 => Some(Self::SetDeviceId),
            0x06 => Some(Self::SleepWork),
            0x07 => Some(Self::FirmwareVersion),
            0x08 => Some(Self::WorkingPeriod),
            _ => None,
        }
    }

    /// Reply class byte the sensor answers this command with
    pub const fn reply_class(self) -> u8 {
        match self {
            Self::QueryData => DATA_REPLY,
            _ => COMMAND_REPLY,
        }
    }

    /// Whether the reply echoes the command ID in its first payload byte
    pub const fn expects_echo(self) -> bool {
        !matches!(self, Self::QueryData)
    }
}

/// Frame that switches the sensor to working mode
pub const fn start_frame() -> &'static [u8; COMMAND_FRAME_LEN] {
    &START_COMMAND
}

/// Frame that puts the sensor to sleep
pub const fn stop_frame() -> &'static [u8; COMMAND_FRAME_LEN] {
    &STOP_COMMAND
}

/// Frame that asks for firmware date and device ID
pub const fn version_frame() -> &'static [u8; COMMAND_FRAME_LEN] {
    &VERSION_COMMAND
}
