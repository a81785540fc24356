//! Constants for the Sensor Core
//!
//! Centralized numeric values used throughout the crate. Every value is
//! defined once, with its unit in the name, and documented with where it
//! comes from.
//!
//! ## Organization
//!
//! - **Protocol**: SDS011 frame layout, reply markers and command frames
//! - **Schedule**: default duty-cycle timings
//! - **Buffers**: sample capacity and result sizes

/// SDS011 serial protocol layout and fixed command frames.
pub mod protocol;

/// Default duty-cycle timings and the identity settle delay.
pub mod schedule;

/// Buffer capacities for samples and identity strings.
pub mod buffers;

// Re-export commonly used constants for convenience
pub use protocol::{
    FRAME_LEN, PAYLOAD_LEN, HEAD, TAIL, DATA_REPLY, COMMAND_REPLY,
    START_COMMAND, STOP_COMMAND, VERSION_COMMAND, COMMAND_FRAME_LEN,
};

pub use schedule::{
    DEFAULT_WORKING_MS, DEFAULT_PAUSE_MS, DEFAULT_SAMPLE_INTERVAL_MS,
    DEFAULT_SKIP_COUNT, IDENTITY_SETTLE_MS,
};

pub use buffers::SAMPLE_CAPACITY;
