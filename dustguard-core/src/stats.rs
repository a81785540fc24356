//! Statistics Engine for Completed Working Windows
//!
//! ## Overview
//!
//! At the end of every working window the controller hands the accumulated
//! raw readings to [`CycleStatistics::compute`]. Per channel it produces:
//!
//! - **min / max**: plain scan
//! - **mean**: Σ v / M
//! - **standard deviation**: sqrt(Σ (v − mean)² / M), population form
//! - **slope**: least-squares trend of v against sample index, in µg/m³ per
//!   sample
//!
//! where the first `skip` samples (sensor warm-up) are left out and `M` is
//! the number of samples that remain. Raw readings are ×10, so every value is
//! divided by 10 before it enters a sum.
//!
//! ## Slope Approximation
//!
//! The textbook least-squares slope centres the index on its true mean,
//! (M − 1) / 2. This engine centres on ⌊M / 2⌋ instead:
//!
//! ```text
//! slope = Σ (k − ⌊M/2⌋)(v_k − mean) / Σ (k − ⌊M/2⌋)²      k = 0..M
//! ```
//!
//! For odd M the two agree exactly. For even M the centre is half a sample
//! too late, which shrinks the slope by a factor of about 1 − 3/M² (3% at
//! M = 10, under 1% at M = 20). Collected result histories were produced with
//! this centring, so it is kept for comparability; do not change it without
//! re-baselining those consumers.
//!
//! ## Degenerate Windows
//!
//! - M = 0: no statistics at all (`None`)
//! - M = 1: standard deviation is 0 and the slope denominator is 0; the slope
//!   is defined as 0

use crate::constants::protocol::READING_SCALE;

/// Summary of one channel over a working window, in µg/m³
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChannelStatistics {
    /// Arithmetic mean
    pub mean: f32,
    /// Smallest reading
    pub min: f32,
    /// Largest reading
    pub max: f32,
    /// Population standard deviation
    pub std_dev: f32,
    /// Trend per sample (see module docs for the centring used)
    pub slope: f32,
}

impl ChannelStatistics {
    /// Summarize `values[skip..]`.
    ///
    /// Returns `None` when nothing is left after skipping.
    pub fn compute(values: &[u16], skip: usize) -> Option<Self> {
        let window = values.get(skip..).filter(|w| !w.is_empty())?;
        let m = window.len();

        let mut sum: u32 = 0;
        let mut min = u16::MAX;
        let mut max = u16::MIN;
        for &raw in window {
            sum += u32::from(raw);
            min = min.min(raw);
            max = max.max(raw);
        }

        let mean = sum as f32 / (READING_SCALE * m as f32);
        // Centring on ⌊M/2⌋ rather than (M-1)/2, see module docs
        let x_mean = (m / 2) as f32;

        let mut sum_dxdy = 0.0f32;
        let mut sum_dx2 = 0.0f32;
        let mut sum_dy2 = 0.0f32;
        for (k, &raw) in window.iter().enumerate() {
            let dx = k as f32 - x_mean;
            let dy = f32::from(raw) / READING_SCALE - mean;
            sum_dxdy += dx * dy;
            sum_dx2 += dx * dx;
            sum_dy2 += dy * dy;
        }

        let slope = if sum_dx2 > 0.0 { sum_dxdy / sum_dx2 } else { 0.0 };

        Some(Self {
            mean,
            min: f32::from(min) / READING_SCALE,
            max: f32::from(max) / READING_SCALE,
            std_dev: libm::sqrtf(sum_dy2 / m as f32),
            slope,
        })
    }
}

/// Both channels of one completed working window
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CycleStatistics {
    /// Samples that entered the statistics (total minus skipped)
    pub samples: usize,
    /// PM2.5 summary
    pub pm2_5: ChannelStatistics,
    /// PM10 summary
    pub pm10: ChannelStatistics,
}

impl CycleStatistics {
    /// Summarize both channels, ignoring the first `skip` samples.
    ///
    /// The channel slices must have equal length. Returns `None` when no
    /// sample is left after skipping.
    pub fn compute(pm2_5: &[u16], pm10: &[u16], skip: usize) -> Option<Self> {
        debug_assert_eq!(pm2_5.len(), pm10.len());

        Some(Self {
            samples: pm2_5.len().checked_sub(skip)?,
            pm2_5: ChannelStatistics::compute(pm2_5, skip)?,
            pm10: ChannelStatistics::compute(pm10, skip)?,
        })
    }
}
