// Host telemetry for the HAT display. Every reading comes in two forms:
// `try_*` returns the value or the reason it is missing, the plain form
// renders the display string with an empty string or 0.0 on failure.
pub mod labels;
pub mod network;
pub mod snapshot;
pub mod system;
pub mod thermal;

use std::{io, path::PathBuf};

use thiserror::Error;

pub use labels::{
    format_disk_usage, format_fan_speed_label, format_fan_status,
    format_load_average, format_ram_usage, format_temperature_label,
};
pub use network::{
    PrimaryIp, primary_ip_label, read_primary_ip, try_read_primary_ip,
};
pub use snapshot::TelemetrySnapshot;
pub use system::{
    read_disk_usage, read_load_average, read_ram_usage, try_read_disk_usage,
    try_read_load_average, try_read_ram_usage,
};
pub use thermal::{
    THERMAL_ZONE_PATH, read_temperature, read_temperature_at,
    try_read_temperature,
};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("sysinfo call failed")]
    SysInfo(#[source] nix::Error),
    #[error("statvfs failed for \"{}\"", path.display())]
    StatVfs {
        path: PathBuf,
        #[source]
        source: nix::Error,
    },
    #[error("Failed to read the network interface table")]
    InterfaceTable(#[source] nix::Error),
    #[error("No IPv4 address on any of {0:?}")]
    NoInterface(&'static [&'static str]),
    #[error("Failed to read \"{}\"", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse {content:?} from \"{}\"", path.display())]
    Parse { path: PathBuf, content: String },
    #[error("Reading of {millidegrees} millidegrees from \"{}\" is out of range", path.display())]
    OutOfRange { path: PathBuf, millidegrees: i64 },
    #[error("{0} reports a total size of zero")]
    ZeroTotal(&'static str),
}
