//! Typed facts tree.
//!
//! Each extractor owns one sub-struct. All of them are flattened when
//! serialized, so the output is a single mapping keyed by fact name
//! (`iostype`, `filesystems`, `interfaces`, ...). Facts that were not
//! gathered or not parseable are omitted.

use indexmap::IndexMap;
use serde::Serialize;

/// Complete facts collected from one device.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Facts {
    /// Subsets that were gathered.
    pub gather_subset: Vec<String>,

    #[serde(flatten)]
    pub device: DeviceFacts,

    #[serde(flatten)]
    pub hardware: HardwareFacts,

    /// Running configuration with the banner stripped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,

    #[serde(flatten)]
    pub network: NetworkFacts,
}

/// Software family reported by `show version`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IosType {
    #[serde(rename = "IOS")]
    Ios,
    #[serde(rename = "IOS-XE")]
    IosXe,
}

/// Wireless operating mode of IOS-XE platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    Autonomous,
    Controller,
}

/// Multi-chassis virtualization mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VirtualSwitch {
    /// Switch stack (StackWise).
    Stack,
    /// Virtual Switching System.
    Vss,
}

/// Identity facts from the default extractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceFacts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api: Option<String>,
    /// Version of the collector that produced these facts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collector_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub iostype: Option<IosType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operatingmode: Option<OperatingMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serialnum: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stacked_models: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stacked_serialnums: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_switch: Option<VirtualSwitch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_switch_domain: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub virtual_switch_serialnums: Vec<String>,
}

/// Resource facts from the hardware extractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HardwareFacts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filesystems: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filesystems_info: Option<IndexMap<String, FilesystemInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_utilization: Option<IndexMap<String, CpuUtilization>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memtotal_mb: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memfree_mb: Option<u64>,
}

/// Space on one filesystem, in KiB.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilesystemInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacetotal_kb: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacefree_kb: Option<u64>,
}

/// CPU load percentages for one core (or the whole CPU).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CpuUtilization {
    pub five_seconds: u32,
    pub one_minute: u32,
    pub five_minutes: u32,
    /// Share of the five-second load spent at interrupt level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub five_seconds_interrupt: Option<u32>,
}

/// Interface and neighbor facts from the interfaces extractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkFacts {
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub interfaces: IndexMap<String, Interface>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_ipv4_addresses: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_ipv6_addresses: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighbors: Option<IndexMap<String, Vec<Neighbor>>>,
}

impl NetworkFacts {
    /// Get an interface record, creating an empty one if absent.
    pub fn interface_mut(&mut self, name: &str) -> &mut Interface {
        self.interfaces.entry(name.to_string()).or_default()
    }
}

/// Attributes of a single interface.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Interface {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macaddress: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mediatype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lineprotocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operstatus: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub hardware_type: Option<String>,
    /// Set, possibly empty, once the IPv4 address stage has seen the interface.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<Vec<IpAddress>>,
    /// Set, possibly empty, once the IPv6 address stage has seen the interface.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<Vec<IpAddress>>,
}

/// An address with its subnet, as printed by the device.
///
/// For IPv4 the subnet is the prefix length (`"24"`); for IPv6 it is the
/// full prefix (`"2001:DB8::/64"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IpAddress {
    pub address: String,
    pub subnet: String,
}

impl IpAddress {
    pub fn new(address: impl Into<String>, subnet: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            subnet: subnet.into(),
        }
    }
}

/// One neighbor seen on a local interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Neighbor {
    pub host: Option<String>,
    pub port: Option<String>,
    /// Reported by CDP only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    pub ip: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flattened_keys() {
        let mut facts = Facts::default();
        facts.device.iostype = Some(IosType::IosXe);
        facts.device.operatingmode = Some(OperatingMode::Autonomous);
        facts.device.virtual_switch = Some(VirtualSwitch::Stack);
        facts.hardware.memtotal_mb = Some(1024);
        facts.network.interface_mut("Gi0/1").hardware_type = Some("Gigabit Ethernet".into());

        let json = serde_json::to_value(&facts).unwrap();
        assert_eq!(json["iostype"], "IOS-XE");
        assert_eq!(json["operatingmode"], "autonomous");
        assert_eq!(json["virtual_switch"], "STACK");
        assert_eq!(json["memtotal_mb"], 1024);
        assert_eq!(json["interfaces"]["Gi0/1"]["type"], "Gigabit Ethernet");
        assert!(json.get("config").is_none());
        assert!(json.get("stacked_models").is_none());
        assert!(json.get("neighbors").is_none());
        assert!(json["interfaces"]["Gi0/1"].get("ipv4").is_none());
    }

    #[test]
    fn test_empty_address_list_serialized() {
        let mut network = NetworkFacts::default();
        network.interface_mut("Gi0/2").ipv4 = Some(Vec::new());

        let json = serde_json::to_value(&network).unwrap();
        assert_eq!(json["interfaces"]["Gi0/2"]["ipv4"], serde_json::json!([]));
        assert!(json["interfaces"]["Gi0/2"].get("ipv6").is_none());
    }

    #[test]
    fn test_interface_mut_is_idempotent() {
        let mut network = NetworkFacts::default();
        network.interface_mut("Vlan1").mtu = Some(1500);
        network.interface_mut("Vlan1").duplex = Some("Full".into());
        assert_eq!(network.interfaces.len(), 1);
        assert_eq!(network.interfaces["Vlan1"].mtu, Some(1500));
    }
}
