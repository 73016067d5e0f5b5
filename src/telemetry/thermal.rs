use std::{fs, path::Path};

use tracing::debug;

use crate::telemetry::TelemetryError;

// SoC temperature in millidegrees Celsius
pub const THERMAL_ZONE_PATH: &str = "/sys/class/thermal/thermal_zone0/temp";

// Readings outside of absolute zero to 1000°C are sensor faults
const MILLIDEGREES_RANGE: std::ops::RangeInclusive<i64> = -273_150..=1_000_000;

// Read the thermal zone file in one shot and convert it to degrees
pub fn try_read_temperature(path: &Path) -> Result<f64, TelemetryError> {
    let content =
        fs::read_to_string(path).map_err(|source| TelemetryError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let millidegrees = parse_millidegrees(&content).ok_or_else(|| {
        TelemetryError::Parse {
            path: path.to_path_buf(),
            content: content.trim().to_string(),
        }
    })?;

    if !MILLIDEGREES_RANGE.contains(&millidegrees) {
        return Err(TelemetryError::OutOfRange {
            path: path.to_path_buf(),
            millidegrees,
        });
    }

    Ok(millidegrees as f64 / 1000.0)
}

// Display form: a failed read is shown as 0.0, which can not be told
// apart from a real zero reading
pub fn read_temperature_at(path: &Path) -> f64 {
    try_read_temperature(path).unwrap_or_else(|err| {
        debug!("{err}");
        0.0
    })
}

pub fn read_temperature() -> f64 {
    read_temperature_at(Path::new(THERMAL_ZONE_PATH))
}

pub fn parse_millidegrees(content: &str) -> Option<i64> {
    content.trim().parse().ok()
}
