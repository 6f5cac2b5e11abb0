//! LLDP and CDP neighbor tables.
//!
//! Both `show lldp neighbors detail` and `show cdp neighbors detail` print
//! one record per neighbor between dashed separator lines. A record without
//! its local interface line ends parsing for that table: everything after
//! it is dropped and the records gathered so far are returned.

use indexmap::IndexMap;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use super::base::first_group;
use super::tree::Neighbor;
use crate::normalize::InterfaceNameNormalizer;

/// Neighbors keyed by local interface.
pub type NeighborTable = IndexMap<String, Vec<Neighbor>>;

const LLDP_SEPARATOR: &str = "------------------------------------------------";
const CDP_SEPARATOR: &str = "-------------------------";

static LLDP_LOCAL_INTF: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^Local Intf: (.+)$").unwrap());
static LLDP_SYSTEM_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)System Name: (.+)$").unwrap());
static LLDP_PORT_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)Port id: (.+)$").unwrap());
static LLDP_IP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^    IP: (.+)$").unwrap());

static CDP_INTF_PORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^Interface: (.+),  Port ID \(outgoing port\): (.+)$").unwrap()
});
static CDP_DEVICE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^Device ID: (.+)$").unwrap());
static CDP_PLATFORM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^Platform: (.+),").unwrap());
static CDP_IP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^  IP address: (.+)$").unwrap());

/// Split detail output into records, skipping blank segments.
fn records<'a>(data: &'a str, separator: &'a str) -> impl Iterator<Item = &'a str> {
    data.split(separator).filter(|entry| !entry.trim().is_empty())
}

/// Parse `show lldp neighbors detail` output.
pub fn parse_lldp_neighbors(data: &str, normalizer: &dyn InterfaceNameNormalizer) -> NeighborTable {
    let mut table = NeighborTable::new();

    for entry in records(data, LLDP_SEPARATOR) {
        let Some(intf) = first_group(&LLDP_LOCAL_INTF, entry) else {
            warn!("LLDP record without local interface, ignoring remaining records");
            return table;
        };

        table
            .entry(normalizer.normalize(&intf))
            .or_default()
            .push(Neighbor {
                host: first_group(&LLDP_SYSTEM_NAME, entry),
                port: first_group(&LLDP_PORT_ID, entry),
                platform: None,
                ip: first_group(&LLDP_IP, entry),
            });
    }

    table
}

/// Parse `show cdp neighbors detail` output.
pub fn parse_cdp_neighbors(data: &str) -> NeighborTable {
    let mut table = NeighborTable::new();

    for entry in records(data, CDP_SEPARATOR) {
        let Some(caps) = CDP_INTF_PORT.captures(entry) else {
            warn!("CDP record without interface line, ignoring remaining records");
            return table;
        };

        table
            .entry(caps[1].to_string())
            .or_default()
            .push(Neighbor {
                host: first_group(&CDP_DEVICE_ID, entry),
                port: Some(caps[2].to_string()),
                platform: first_group(&CDP_PLATFORM, entry),
                ip: first_group(&CDP_IP, entry),
            });
    }

    table
}
