//! SDS011 Serial Protocol
//!
//! ## Overview
//!
//! The sensor talks over a 9600 baud UART. The host sends 19-byte command
//! frames; the sensor answers with 10-byte reply frames and, while working in
//! active reporting mode, pushes a measurement frame about once per second
//! without being asked.
//!
//! This module covers the three pieces the duty cycle needs:
//! - [`Command`]: the command-ID table and the fixed command frames
//! - [`Frame`]: one validated reply
//! - [`FrameDecoder`]: a resynchronizing parser that pulls frames out of the
//!   byte stream
//!
//! ## Why Resynchronize?
//!
//! Command replies and autonomous measurement pushes share the same link, so
//! when the host waits for, say, a firmware reply, it routinely has to skip
//! over data frames first. Add line noise and a sensor that can be powered on
//! halfway through a frame, and the parser has to be able to start over at
//! any byte without losing the next good frame.

pub mod command;
pub mod decoder;
pub mod frame;

pub use command::Command;
pub use decoder::FrameDecoder;
pub use frame::Frame;
