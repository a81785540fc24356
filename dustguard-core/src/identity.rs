//! Sensor identity from the firmware-version reply
//!
//! The version reply carries the firmware build date and the factory device
//! ID:
//!
//! ```text
//! payload: 07 yy mm dd id_hi id_lo
//! ```
//!
//! The date is rendered as `20{yy}.{mm}.{dd}` without zero padding, so
//! `07 12 0C 1F ...` becomes `2018.12.31` and `07 0F 07 0A ...` becomes
//! `2015.7.10`.

use core::fmt::{self, Write};

use heapless::String;

use crate::{
    constants::buffers::FIRMWARE_STRING_CAPACITY,
    protocol::{Command, Frame},
};

/// Firmware date and device ID reported by the sensor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    firmware: String<FIRMWARE_STRING_CAPACITY>,
    device_id: u16,
}

impl DeviceIdentity {
    /// Parse a firmware-version reply.
    ///
    /// Returns `None` for any frame that does not echo the version command.
    pub fn from_frame(frame: &Frame) -> Option<Self> {
        if frame.command_id() != Command::FirmwareVersion.id() {
            return None;
        }

        let [_, year, month, day, id_hi, id_lo] = *frame.payload();

        let mut firmware = String::new();
        // Longest possible date is "20255.255.255", well under capacity
        let _ = write!(firmware, "20{}.{}.{}", year, month, day);

        Some(Self {
            firmware,
            device_id: u16::from_be_bytes([id_hi, id_lo]),
        })
    }

    /// Firmware build date, e.g. `2018.12.31`
    pub fn firmware(&self) -> &str {
        &self.firmware
    }

    /// Factory device ID
    pub fn device_id(&self) -> u16 {
        self.device_id
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Device-Firmware = {}    Device-ID = {:x}",
            self.firmware, self.device_id
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DeviceIdentity {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "Device-Firmware = {}    Device-ID = {:x}",
            self.firmware.as_str(),
            self.device_id
        )
    }
}
