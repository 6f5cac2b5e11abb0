//! Interface name normalization.
//!
//! LLDP reports local interfaces in their abbreviated form (`Gi1/0/1`)
//! while `show interfaces` uses the full name (`GigabitEthernet1/0/1`).
//! Normalizing lets neighbor entries line up with interface records.

/// Trait for interface name canonicalization.
pub trait InterfaceNameNormalizer: Send + Sync {
    /// Return the canonical form of an interface name.
    fn normalize(&self, name: &str) -> String;
}

/// Any `Fn(&str) -> String` closure is a normalizer.
impl<F> InterfaceNameNormalizer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn normalize(&self, name: &str) -> String {
        self(name)
    }
}

/// Abbreviated prefix → canonical interface type, checked in order.
const IOS_INTERFACE_TYPES: &[(&str, &str)] = &[
    ("gi", "GigabitEthernet"),
    ("te", "TenGigabitEthernet"),
    ("fa", "FastEthernet"),
    ("fo", "FortyGigabitEthernet"),
    ("et", "Ethernet"),
    ("vl", "Vlan"),
    ("lo", "Loopback"),
    ("po", "Port-channel"),
    ("nv", "nve"),
    ("twe", "TwentyFiveGigE"),
    ("hu", "HundredGigE"),
];

/// Cisco IOS interface name normalizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct IosInterfaceNames;

impl InterfaceNameNormalizer for IosInterfaceNames {
    fn normalize(&self, name: &str) -> String {
        let lower = name.to_ascii_lowercase();
        let Some(if_type) = IOS_INTERFACE_TYPES
            .iter()
            .find(|(prefix, _)| lower.starts_with(prefix))
            .map(|(_, if_type)| *if_type)
        else {
            return name.to_string();
        };

        // "Gi 1/0/1" keeps its number token verbatim
        let parts: Vec<&str> = name.split(' ').collect();
        let number = if parts.len() == 2 {
            parts[1].trim().to_string()
        } else {
            name.chars()
                .filter(|c| c.is_ascii_digit() || *c == '/' || *c == '.')
                .collect()
        };

        format!("{}{}", if_type, number)
    }
}
