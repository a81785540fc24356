//! Bounded sample storage for one working window
//!
//! Two parallel channel buffers with a fixed capacity chosen at compile
//! time. Appending past the end is refused with [`Error::BufferFull`]
//! instead of overwriting: unlike a history ring, a working window has a
//! defined start, and losing its first samples would shift every index the
//! slope is computed over.

use heapless::Vec;

use crate::{
    constants::{buffers::SAMPLE_CAPACITY, protocol::READING_SCALE},
    errors::{Error, Result},
};

/// One measurement: raw PM2.5 and PM10 readings, both ×10 µg/m³
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SamplePair {
    /// PM2.5 concentration ×10
    pub pm2_5: u16,
    /// PM10 concentration ×10
    pub pm10: u16,
}

impl SamplePair {
    /// PM2.5 in µg/m³
    pub fn pm2_5_ugm3(&self) -> f32 {
        f32::from(self.pm2_5) / READING_SCALE
    }

    /// PM10 in µg/m³
    pub fn pm10_ugm3(&self) -> f32 {
        f32::from(self.pm10) / READING_SCALE
    }
}

/// Fixed-capacity PM2.5 / PM10 sample buffers
#[derive(Debug, Clone, Default)]
pub struct SampleAccumulator<const N: usize = SAMPLE_CAPACITY> {
    pm2_5: Vec<u16, N>,
    pm10: Vec<u16, N>,
}

impl<const N: usize> SampleAccumulator<N> {
    /// Create an empty accumulator
    pub const fn new() -> Self {
        Self {
            pm2_5: Vec::new(),
            pm10: Vec::new(),
        }
    }

    /// Append one sample to both channels
    pub fn push(&mut self, sample: SamplePair) -> Result<()> {
        if self.is_full() {
            return Err(Error::BufferFull { capacity: N });
        }

        // Both channels have the same length, so neither push can fail here
        let _ = self.pm2_5.push(sample.pm2_5);
        let _ = self.pm10.push(sample.pm10);
        Ok(())
    }

    /// Number of samples held
    pub fn len(&self) -> usize {
        self.pm2_5.len()
    }

    /// Check if no samples are held
    pub fn is_empty(&self) -> bool {
        self.pm2_5.is_empty()
    }

    /// Check if another sample would be refused
    pub fn is_full(&self) -> bool {
        self.len() == N
    }

    /// Fixed capacity per channel
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Raw PM2.5 readings, oldest first
    pub fn pm2_5(&self) -> &[u16] {
        &self.pm2_5
    }

    /// Raw PM10 readings, oldest first
    pub fn pm10(&self) -> &[u16] {
        &self.pm10
    }

    /// Most recent sample
    pub fn last(&self) -> Option<SamplePair> {
        match (self.pm2_5.last(), self.pm10.last()) {
            (Some(&pm2_5), Some(&pm10)) => Some(SamplePair { pm2_5, pm10 }),
            _ => None,
        }
    }

    /// Drop all samples
    pub fn clear(&mut self) {
        self.pm2_5.clear();
        self.pm10.clear();
    }
}
