use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::telemetry::{
    format_disk_usage, format_load_average, format_ram_usage,
    format_temperature_label, network, system, thermal,
};

// One reading of every telemetry source, a missing value means the
// corresponding read failed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TelemetrySnapshot {
    pub load_average: Option<f64>,
    pub ram_free_percent: Option<f64>,
    pub disk_free_percent: Option<f64>,
    pub primary_ip: Option<String>,
    pub temperature: Option<f64>,
}

impl TelemetrySnapshot {
    pub fn collect(thermal_path: &Path) -> Self {
        Self {
            load_average: system::try_read_load_average()
                .inspect_err(|err| debug!("{err}"))
                .ok(),
            ram_free_percent: system::try_read_ram_usage()
                .inspect_err(|err| debug!("{err}"))
                .ok(),
            disk_free_percent: system::try_read_disk_usage()
                .inspect_err(|err| debug!("{err}"))
                .ok(),
            primary_ip: network::try_read_primary_ip()
                .inspect_err(|err| debug!("{err}"))
                .ok()
                .map(|ip| ip.to_string()),
            temperature: thermal::try_read_temperature(thermal_path)
                .inspect_err(|err| debug!("{err}"))
                .ok(),
        }
    }

    // Render the lines shown on the display, failed reads keep the
    // historical empty string and 0.0 temperature
    pub fn display_lines(&self) -> Vec<String> {
        vec![
            self.load_average.map(format_load_average).unwrap_or_default(),
            self.ram_free_percent.map(format_ram_usage).unwrap_or_default(),
            self.disk_free_percent.map(format_disk_usage).unwrap_or_default(),
            self.primary_ip.clone().unwrap_or_default(),
            format_temperature_label(self.temperature.unwrap_or(0.0)),
        ]
    }
}
