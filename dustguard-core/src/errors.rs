//! Error Types for the Sensor Core
//!
//! ## Design Philosophy
//!
//! The core is designed to degrade to "no new result this cycle" rather than
//! stop, so very few conditions ever become an error value:
//!
//! 1. **Small Size**: every variant carries at most a `&'static str` or a
//!    `usize`, so the enum stays `Copy` and cheap to return.
//!
//! 2. **No Heap Allocation**: context is static text only.
//!
//! 3. **Local Recovery First**: malformed frames are never errors. The frame
//!    decoder resynchronizes on its own and only logs what it skipped.
//!
//! ## Error Categories
//!
//! ### Collaborator Failures
//! - `Transport`: the serial link refused a read or a write
//! - `NoResponse`: the sensor did not answer an identity query in time
//!
//! ### Resource Limits
//! - `BufferFull`: a working phase produced more samples than the accumulator
//!   holds
//!
//! ### Configuration
//! - `InvalidSchedule`: a duty-cycle schedule that can never produce a result
//!
//! ### Output
//! - `Encoding`: a cycle result could not be serialized
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use dustguard_core::{Error, ScheduleConfig};
//!
//! match ScheduleConfig::new(20_000, 120_000, 1_000, 25) {
//!     Ok(config) => {
//!         // apply with controller.set_schedule_config(config)
//!         # let _ = config;
//!     }
//!     Err(Error::InvalidSchedule { reason }) => {
//!         // keep the previous schedule, report `reason` to the operator
//!         # let _ = reason;
//!     }
//!     Err(_) => {}
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for sensor core operations
pub type Result<T> = core::result::Result<T, Error>;

/// Sensor core errors - kept small for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The serial link reported a failure
    #[error("Transport failure during {operation}")]
    Transport {
        /// What the core was doing when the link failed
        operation: &'static str,
    },

    /// No valid frame arrived in answer to a command
    #[error("No response from sensor")]
    NoResponse,

    /// The sample accumulator cannot take another sample
    #[error("Sample buffer full ({capacity} samples)")]
    BufferFull {
        /// Fixed capacity of each channel buffer
        capacity: usize,
    },

    /// A duty-cycle schedule was rejected
    #[error("Invalid schedule: {reason}")]
    InvalidSchedule {
        /// Which constraint the schedule violates
        reason: &'static str,
    },

    /// A cycle result could not be serialized
    #[error("Result encoding failed")]
    Encoding,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Transport { operation } =>
                defmt::write!(fmt, "Transport failure during {}", operation),
            Self::NoResponse =>
                defmt::write!(fmt, "No response from sensor"),
            Self::BufferFull { capacity } =>
                defmt::write!(fmt, "Sample buffer full ({})", capacity),
            Self::InvalidSchedule { reason } =>
                defmt::write!(fmt, "Invalid schedule: {}", reason),
            Self::Encoding =>
                defmt::write!(fmt, "Result encoding failed"),
        }
    }
}
