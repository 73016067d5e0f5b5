use std::path::Path;

use nix::sys::{statvfs::statvfs, sysinfo::sysinfo};
use tracing::debug;

use crate::telemetry::{
    TelemetryError, format_disk_usage, format_load_average, format_ram_usage,
};

const ROOT_MOUNT: &str = "/";

// One minute load average
pub fn try_read_load_average() -> Result<f64, TelemetryError> {
    let info = sysinfo().map_err(TelemetryError::SysInfo)?;

    Ok(info.load_average().0)
}

pub fn read_load_average() -> String {
    try_read_load_average()
        .map(format_load_average)
        .unwrap_or_else(|err| {
            debug!("{err}");
            String::new()
        })
}

// Percentage of RAM that is free
pub fn try_read_ram_usage() -> Result<f64, TelemetryError> {
    let info = sysinfo().map_err(TelemetryError::SysInfo)?;

    ram_usage_from(info.ram_total(), info.ram_unused())
}

pub fn read_ram_usage() -> String {
    try_read_ram_usage()
        .map(format_ram_usage)
        .unwrap_or_else(|err| {
            debug!("{err}");
            String::new()
        })
}

// Percentage of the root filesystem that is free
pub fn try_read_disk_usage() -> Result<f64, TelemetryError> {
    let path = Path::new(ROOT_MOUNT);
    let stat = statvfs(path).map_err(|source| TelemetryError::StatVfs {
        path: path.to_path_buf(),
        source,
    })?;

    let block_size = stat.block_size() as u64;

    disk_usage_from(
        stat.blocks() as u64 * block_size,
        stat.blocks_free() as u64 * block_size,
    )
}

pub fn read_disk_usage() -> String {
    try_read_disk_usage()
        .map(format_disk_usage)
        .unwrap_or_else(|err| {
            debug!("{err}");
            String::new()
        })
}

// Both amounts are truncated to whole MiB before the ratio is taken
pub fn ram_usage_from(
    total_bytes: u64,
    free_bytes: u64,
) -> Result<f64, TelemetryError> {
    free_percent(total_bytes, free_bytes).ok_or(TelemetryError::ZeroTotal("RAM"))
}

pub fn disk_usage_from(
    total_bytes: u64,
    free_bytes: u64,
) -> Result<f64, TelemetryError> {
    free_percent(total_bytes, free_bytes).ok_or(TelemetryError::ZeroTotal("Disk"))
}

fn free_percent(total_bytes: u64, free_bytes: u64) -> Option<f64> {
    let total_mib = total_bytes >> 20;
    let free_mib = free_bytes >> 20;

    if total_mib == 0 {
        return None;
    }

    Some(free_mib as f64 / total_mib as f64 * 100.0)
}
