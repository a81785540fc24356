//! Core logic for a duty-cycled SDS011 particulate-matter sensor
//!
//! Powers the sensor's laser and fan on a schedule, decodes its binary
//! response frames from the serial stream, accumulates PM2.5/PM10 samples
//! over each working window and turns them into a compact result string.
//!
//! Key constraints:
//! - Runs on small microcontrollers (ESP8266 class)
//! - No heap allocation in the sampling path
//! - Never blocks in `poll()`; the outer loop owns timing
//!
//! ```no_run
//! use dustguard_core::{DutyCycleController, ScheduleConfig, Transport};
//! use dustguard_core::time::SystemTime;
//! # struct Uart;
//! # impl Transport for Uart {
//! #     type Error = ();
//! #     fn write(&mut self, _: &[u8]) -> Result<(), ()> { Ok(()) }
//! #     fn read(&mut self) -> nb::Result<u8, ()> { Err(nb::Error::WouldBlock) }
//! # }
//! # let uart = Uart;
//!
//! let mut sensor = DutyCycleController::new(uart, SystemTime, ScheduleConfig::default());
//!
//! loop {
//!     sensor.poll();
//!     let result = sensor.result_text();
//!     if !result.is_empty() {
//!         // hand `result` to the uploader
//!     }
//! #   break;
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

#[macro_use]
mod logging;

pub mod accumulator;
pub mod config;
pub mod constants;
pub mod controller;
pub mod encoder;
pub mod errors;
pub mod identity;
pub mod protocol;
pub mod stats;
pub mod time;
pub mod traits;

// Public API
pub use accumulator::{SampleAccumulator, SamplePair};
pub use config::ScheduleConfig;
pub use controller::{DutyCycleController, Phase, PhaseEvent};
pub use errors::{Error, Result};
pub use identity::DeviceIdentity;
pub use protocol::{Command, Frame, FrameDecoder};
pub use stats::{ChannelStatistics, CycleStatistics};
pub use traits::{Delay, Transport};

/// Crate version, as published
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
