//! Resynchronizing Frame Decoder
//!
//! ## Overview
//!
//! Pulls validated [`Frame`]s out of the sensor's byte stream. Each call to
//! [`FrameDecoder::decode`] reads whatever the transport has buffered and
//! returns as soon as one frame completes, leaving later bytes in the
//! transport for the next call. It never waits for bytes that have not
//! arrived yet.
//!
//! ## Parser States
//!
//! ```text
//!            AA          class ok       echo ok        6th payload byte
//!   Head ───────► Class ─────────► CommandId ─────► Payload{1..5} ─────► Checksum
//!    ▲              │                  │                                    │
//!    │              │ mismatch         │ undesired answer         sum ok    │
//!    │              ▼                  ▼                                    ▼
//!    └──────────── resynchronize ◄─────────────────────────────────────── Tail ──AB──► Frame
//!                                          bad sum / bad tail
//! ```
//!
//! - **Class** must be `C0` while waiting for measurements and `C5` for every
//!   other command.
//! - **CommandId** must echo the command that was sent, except for
//!   measurements. A mismatch here is routine (measurement pushes interleave
//!   with command replies) so it is only traced.
//! - **Checksum** is the low byte of the six payload bytes.
//!
//! ## Resynchronization
//!
//! Any mismatch throws away the current candidate and rescans the bytes that
//! followed its head, so a frame whose head was swallowed by a truncated
//! predecessor is still found. Malformed input is never an error.
//!
//! ## Partial Frames
//!
//! A frame split across two `decode` calls is completed by the second call;
//! the parser keeps its position between calls. Switching the expected
//! command drops any partial frame, since its class and echo were checked
//! against the old command.

use heapless::Vec;

use crate::{
    constants::protocol::{FRAME_LEN, HEAD, PAYLOAD_LEN, TAIL},
    errors::{Error, Result},
    traits::Transport,
};

use super::{frame::Frame, Command};

/// Position of the parser inside a candidate frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    /// Scanning for the `AA` head
    Head,
    /// Expecting the reply class
    Class,
    /// Expecting the command echo (first payload byte)
    CommandId,
    /// Expecting payload byte `index` (1..PAYLOAD_LEN)
    Payload { index: usize },
    /// Expecting the checksum
    Checksum,
    /// Expecting the `AB` tail
    Tail,
}

/// What one byte does to the parser
enum Transition {
    /// Not part of any frame
    Skip,
    /// Accept the byte and move on
    Advance(ParserState),
    /// Candidate complete and valid
    Complete(Frame),
    /// Candidate is malformed
    Restart,
}

/// Byte-at-a-time SDS011 reply parser
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    state: ParserState,
    expected: Command,
    class: u8,
    payload: [u8; PAYLOAD_LEN],
    sum: u8,
    /// Bytes of the current candidate, head first
    candidate: Vec<u8, FRAME_LEN>,
    frames: u32,
    resyncs: u32,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    /// Create an idle decoder waiting for measurement frames
    pub fn new() -> Self {
        Self {
            state: ParserState::Head,
            expected: Command::QueryData,
            class: 0,
            payload: [0; PAYLOAD_LEN],
            sum: 0,
            candidate: Vec::new(),
            frames: 0,
            resyncs: 0,
        }
    }

    /// Read available bytes until one frame answering `expected` completes.
    ///
    /// Returns `Ok(None)` once the transport has nothing more buffered. A
    /// transport failure drops any partial frame.
    pub fn decode<T: Transport>(
        &mut self,
        transport: &mut T,
        expected: Command,
    ) -> Result<Option<Frame>> {
        self.expect(expected);

        loop {
            let byte = match transport.read() {
                Ok(byte) => byte,
                Err(nb::Error::WouldBlock) => return Ok(None),
                Err(nb::Error::Other(e)) => {
                    log_error!("Sensor read failed: {:?}", e);
                    self.reset();
                    return Err(Error::Transport { operation: "read" });
                }
            };

            if let Some(frame) = self.feed(byte) {
                return Ok(Some(frame));
            }
        }
    }

    /// Set the command the next frame must answer.
    ///
    /// Drops any partial frame if the command changes.
    pub fn expect(&mut self, expected: Command) {
        if self.expected != expected {
            self.reset();
            self.expected = expected;
        }
    }

    /// Push one byte through the parser
    pub fn feed(&mut self, byte: u8) -> Option<Frame> {
        let transition = match self.state {
            ParserState::Head => self.on_head(byte),
            ParserState::Class => self.on_class(byte),
            ParserState::CommandId => self.on_command_id(byte),
            ParserState::Payload { index } => self.on_payload(index, byte),
            ParserState::Checksum => self.on_checksum(byte),
            ParserState::Tail => self.on_tail(byte),
        };

        match transition {
            Transition::Skip => {
                log_trace!("skip {:02x}", byte);
                None
            }
            Transition::Advance(next) => {
                // Capacity is FRAME_LEN and a candidate never outgrows it
                let _ = self.candidate.push(byte);
                self.state = next;
                None
            }
            Transition::Complete(frame) => {
                self.clear_candidate();
                self.frames = self.frames.wrapping_add(1);
                Some(frame)
            }
            Transition::Restart => {
                let _ = self.candidate.push(byte);
                self.resynchronize();
                None
            }
        }
    }

    /// Drop any partial frame
    pub fn reset(&mut self) {
        self.clear_candidate();
    }

    /// True when no partial frame is held
    pub fn is_idle(&self) -> bool {
        self.state == ParserState::Head
    }

    /// Command the decoder is currently matching replies against
    pub fn expected(&self) -> Command {
        self.expected
    }

    /// Frames decoded since creation
    pub fn frames_decoded(&self) -> u32 {
        self.frames
    }

    /// Candidates abandoned since creation
    pub fn resync_count(&self) -> u32 {
        self.resyncs
    }

    fn on_head(&mut self, byte: u8) -> Transition {
        if byte == HEAD {
            Transition::Advance(ParserState::Class)
        } else {
            Transition::Skip
        }
    }

    fn on_class(&mut self, byte: u8) -> Transition {
        if byte == self.expected.reply_class() {
            self.class = byte;
            Transition::Advance(ParserState::CommandId)
        } else {
            Transition::Restart
        }
    }

    fn on_command_id(&mut self, byte: u8) -> Transition {
        if self.expected.expects_echo() && byte != self.expected.id() {
            log_trace!(
                "Undesired answer: echo {:02x}, waiting for {:02x}",
                byte,
                self.expected.id()
            );
            return Transition::Restart;
        }

        self.payload[0] = byte;
        self.sum = byte;
        Transition::Advance(ParserState::Payload { index: 1 })
    }

    fn on_payload(&mut self, index: usize, byte: u8) -> Transition {
        self.payload[index] = byte;
        self.sum = self.sum.wrapping_add(byte);

        if index + 1 == PAYLOAD_LEN {
            Transition::Advance(ParserState::Checksum)
        } else {
            Transition::Advance(ParserState::Payload { index: index + 1 })
        }
    }

    fn on_checksum(&mut self, byte: u8) -> Transition {
        if byte == self.sum {
            log_trace!("Checksum OK");
            Transition::Advance(ParserState::Tail)
        } else {
            log_trace!("Checksum mismatch: got {:02x}, computed {:02x}", byte, self.sum);
            Transition::Restart
        }
    }

    fn on_tail(&mut self, byte: u8) -> Transition {
        if byte == TAIL {
            Transition::Complete(Frame::new(self.class, self.payload))
        } else {
            log_debug!("Last byte wrong: {:02x}", byte);
            Transition::Restart
        }
    }

    /// Abandon the candidate and rescan everything after its head
    fn resynchronize(&mut self) {
        let pending = core::mem::take(&mut self.candidate);
        self.clear_candidate();
        self.resyncs = self.resyncs.wrapping_add(1);

        // Fewer than FRAME_LEN bytes follow the old head, so the rescan can
        // only leave a partial candidate behind, never a complete frame.
        for &byte in pending.iter().skip(1) {
            let _ = self.feed(byte);
        }
    }

    fn clear_candidate(&mut self) {
        self.state = ParserState::Head;
        self.sum = 0;
        self.candidate.clear();
    }
}
