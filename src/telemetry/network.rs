use std::{fmt, net::Ipv4Addr};

use nix::ifaddrs::getifaddrs;
use tracing::debug;

use crate::telemetry::TelemetryError;

// Wired first, then wireless
pub const PREFERRED_INTERFACES: &[&str] = &["eth0", "wlan0"];

// An IPv4 address together with the interface it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryIp {
    pub interface: String,
    pub address: Ipv4Addr,
}

impl fmt::Display for PrimaryIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.interface, self.address)
    }
}

// IPv4 entries of the host interface table, in table order
fn interface_table()
-> Result<impl Iterator<Item = (String, Ipv4Addr)>, TelemetryError> {
    let addresses = getifaddrs().map_err(TelemetryError::InterfaceTable)?;

    Ok(addresses.filter_map(|ifaddr| {
        let address = ifaddr.address?.as_sockaddr_in()?.ip();

        Some((ifaddr.interface_name, address))
    }))
}

pub fn try_read_primary_ip() -> Result<PrimaryIp, TelemetryError> {
    select_primary_ip(interface_table()?)
        .ok_or(TelemetryError::NoInterface(PREFERRED_INTERFACES))
}

pub fn read_primary_ip() -> String {
    match interface_table() {
        Ok(entries) => primary_ip_label(entries),
        Err(err) => {
            debug!("{err}");
            String::new()
        }
    }
}

// Display form of the selection, empty when no preferred interface
// has an address
pub fn primary_ip_label<I, S>(entries: I) -> String
where
    I: IntoIterator<Item = (S, Ipv4Addr)>,
    S: Into<String> + AsRef<str>,
{
    select_primary_ip(entries)
        .map(|ip| ip.to_string())
        .unwrap_or_default()
}

// Walk the interface table in order and return the first IPv4 entry
// belonging to one of the preferred interfaces
pub fn select_primary_ip<I, S>(entries: I) -> Option<PrimaryIp>
where
    I: IntoIterator<Item = (S, Ipv4Addr)>,
    S: Into<String> + AsRef<str>,
{
    entries
        .into_iter()
        .find(|(name, _)| {
            let name: &str = name.as_ref();
            PREFERRED_INTERFACES.contains(&name)
        })
        .map(|(name, address)| PrimaryIp {
            interface: name.into(),
            address,
        })
}
