//! Result Encoder
//!
//! Turns [`CycleStatistics`] into the two text artifacts the rest of the
//! firmware consumes.
//!
//! ## Result entries
//!
//! One JSON object per channel, PM10 first, each followed by a comma so the
//! uploader can splice them straight into its `sensordatavalues` array:
//!
//! ```text
//! {"value_type":"SDS_P1","value":"25.00"},{"value_type":"SDS_P2","value":"12.50"},
//! ```
//!
//! Values are the channel means in µg/m³, formatted to two decimals and sent
//! as strings, as the collectors expect.
//!
//! ## Diagnostic line
//!
//! Tab-separated, for pasting serial output into a spreadsheet:
//!
//! ```text
//! timestamp  M  mean2.5  mean10  sd2.5  sd10  min2.5  max2.5  min10  max10  slope2.5  slope10
//! ```

use alloc::{format, string::String};

use serde::Serialize;

use crate::{
    errors::{Error, Result},
    stats::CycleStatistics,
    time::Timestamp,
};

/// Collector value type for PM10
pub const PM10_VALUE_TYPE: &str = "SDS_P1";

/// Collector value type for PM2.5
pub const PM2_5_VALUE_TYPE: &str = "SDS_P2";

/// One entry of the collectors' `sensordatavalues` array
#[derive(Debug, Serialize)]
struct SensorDataValue<'a> {
    value_type: &'a str,
    value: String,
}

/// Render the result entries for one completed cycle
pub fn encode_result(stats: &CycleStatistics) -> Result<String> {
    let mut out = String::new();

    for (value_type, mean) in [
        (PM10_VALUE_TYPE, stats.pm10.mean),
        (PM2_5_VALUE_TYPE, stats.pm2_5.mean),
    ] {
        let entry = SensorDataValue {
            value_type,
            value: format!("{:.2}", mean),
        };
        let json = serde_json::to_string(&entry).map_err(|_| Error::Encoding)?;
        out.push_str(&json);
        out.push(',');
    }

    Ok(out)
}

/// Render the tab-separated diagnostic line
pub fn diagnostic_line(timestamp: Timestamp, stats: &CycleStatistics) -> String {
    format!(
        "{}\t{}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{:.2}",
        timestamp,
        stats.samples,
        stats.pm2_5.mean,
        stats.pm10.mean,
        stats.pm2_5.std_dev,
        stats.pm10.std_dev,
        stats.pm2_5.min,
        stats.pm2_5.max,
        stats.pm10.min,
        stats.pm10.max,
        stats.pm2_5.slope,
        stats.pm10.slope,
    )
}
