//! SDS011 Serial Protocol Constants
//!
//! Values from the Nova Fitness SDS011 laser dust sensor control protocol
//! (V1.3). The link runs at 9600 baud, 8N1.
//!
//! Every reply from the sensor is a 10-byte frame:
//!
//! ```text
//! ┌────┬────┬────┬────┬────┬────┬────┬────┬─────┬────┐
//! │ AA │ C0 │ D1 │ D2 │ D3 │ D4 │ D5 │ D6 │ sum │ AB │
//! └────┴────┴────┴────┴────┴────┴────┴────┴─────┴────┘
//!  head class └──────── payload ────────┘ check tail
//! ```
//!
//! `sum` is the low byte of D1 + ... + D6. For command replies (class `C5`)
//! D1 echoes the command ID that was sent.

/// Total length of a reply frame on the wire
pub const FRAME_LEN: usize = 10;

/// Number of payload bytes (D1..D6), including the command-ID slot
pub const PAYLOAD_LEN: usize = 6;

/// Frame head marker
pub const HEAD: u8 = 0xAA;

/// Frame tail marker
pub const TAIL: u8 = 0xAB;

/// Reply class of an autonomous or queried measurement frame
pub const DATA_REPLY: u8 = 0xC0;

/// Reply class of every other command answer
pub const COMMAND_REPLY: u8 = 0xC5;

/// Length of a host-to-sensor command frame
pub const COMMAND_FRAME_LEN: usize = 19;

/// Put the sensor in working mode (laser and fan on).
///
/// While working in active reporting mode the sensor pushes a measurement
/// frame roughly once per second.
pub const START_COMMAND: [u8; COMMAND_FRAME_LEN] = [
    0xAA, 0xB4, 0x06, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0x06, 0xAB,
];

/// Put the sensor to sleep (laser and fan off)
pub const STOP_COMMAND: [u8; COMMAND_FRAME_LEN] = [
    0xAA, 0xB4, 0x06, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0x05, 0xAB,
];

/// Ask for firmware date and device ID
pub const VERSION_COMMAND: [u8; COMMAND_FRAME_LEN] = [
    0xAA, 0xB4, 0x07, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0x05, 0xAB,
];

/// Divisor turning a raw reading into µg/m³ (readings are ×10)
pub const READING_SCALE: f32 = 10.0;
