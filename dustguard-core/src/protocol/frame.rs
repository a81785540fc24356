//! Validated reply frame

use crate::accumulator::SamplePair;
use crate::constants::protocol::{DATA_REPLY, FRAME_LEN, HEAD, PAYLOAD_LEN, TAIL};

/// One checksum-verified reply from the sensor
///
/// Only the decoder (or a test building synthetic traffic) creates frames,
/// and it only creates them after the checksum and tail matched, so there is
/// no "invalid frame" value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    class: u8,
    payload: [u8; PAYLOAD_LEN],
}

impl Frame {
    /// Build a frame from its reply class and six payload bytes
    pub const fn new(class: u8, payload: [u8; PAYLOAD_LEN]) -> Self {
        Self { class, payload }
    }

    /// Build a measurement frame as the sensor would push it.
    ///
    /// `pm2_5` and `pm10` are the raw ×10 readings.
    pub fn measurement(pm2_5: u16, pm10: u16, device_id: u16) -> Self {
        let [pm2_5_lo, pm2_5_hi] = pm2_5.to_le_bytes();
        let [pm10_lo, pm10_hi] = pm10.to_le_bytes();
        let [id_lo, id_hi] = device_id.to_le_bytes();
        Self::new(DATA_REPLY, [pm2_5_lo, pm2_5_hi, pm10_lo, pm10_hi, id_lo, id_hi])
    }

    /// Reply class (`0xC0` measurement, `0xC5` command reply)
    pub fn class(&self) -> u8 {
        self.class
    }

    /// First payload byte; the echoed command ID for command replies
    pub fn command_id(&self) -> u8 {
        self.payload[0]
    }

    /// The six payload bytes
    pub fn payload(&self) -> &[u8; PAYLOAD_LEN] {
        &self.payload
    }

    /// Payload length; always six for a decoded frame
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Low byte of the payload sum
    pub fn checksum(&self) -> u8 {
        checksum(&self.payload)
    }

    /// Read the PM2.5 / PM10 pair out of a measurement frame
    pub fn sample(&self) -> SamplePair {
        SamplePair {
            pm2_5: u16::from_le_bytes([self.payload[0], self.payload[1]]),
            pm10: u16::from_le_bytes([self.payload[2], self.payload[3]]),
        }
    }

    /// Wire representation, head to tail
    pub fn to_bytes(&self) -> [u8; FRAME_LEN] {
        let mut bytes = [0u8; FRAME_LEN];
        bytes[0] = HEAD;
        bytes[1] = self.class;
        bytes[2..2 + PAYLOAD_LEN].copy_from_slice(&self.payload);
        bytes[8] = self.checksum();
        bytes[9] = TAIL;
        bytes
    }
}

/// Low byte of the sum of `bytes`
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}
