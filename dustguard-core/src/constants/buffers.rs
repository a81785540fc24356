//! Buffer Sizes and Memory Constraints
//!
//! Sized for ESP8266-class devices with ~40KB of usable RAM.

/// Samples per channel held during one working window.
///
/// 1000 samples × 2 channels × 2 bytes = 4KB. At the default 1s sample
/// interval this covers a working window of more than 16 minutes.
pub const SAMPLE_CAPACITY: usize = 1000;

/// Capacity of the firmware version string ("2018.12.31" is 10 bytes)
pub const FIRMWARE_STRING_CAPACITY: usize = 16;
