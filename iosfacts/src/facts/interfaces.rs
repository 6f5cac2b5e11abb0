//! Interface, address and neighbor facts.
//!
//! Stages run in a fixed order: `show interfaces` builds the records, then
//! `show ip interface` and `show ipv6 interface` attach addresses, then the
//! LLDP and CDP tables fill `neighbors`. The address stages create records
//! for interfaces the primary listing did not show (deleted or shut
//! subinterfaces), so they must run after it.

use indexmap::IndexMap;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::base::{
    FactsBuilder, FactsModule, collect_first_group, first_group, run_batch, usable,
};
use super::blocks::parse_blocks;
use super::neighbors::{NeighborTable, parse_cdp_neighbors, parse_lldp_neighbors};
use super::tree::{Interface, IpAddress, NetworkFacts};
use crate::error::Result;
use crate::normalize::{InterfaceNameNormalizer, IosInterfaceNames};
use crate::runner::{CommandRunner, INVALID_INPUT};

static DESCRIPTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)Description: (.+)$").unwrap());
static MACADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Hardware is (?:.*), address is (\S+)").unwrap());
static MTU: Lazy<Regex> = Lazy::new(|| Regex::new(r"MTU (\d+)").unwrap());
static BANDWIDTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"BW (\d+)").unwrap());
static DUPLEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w+) Duplex").unwrap());
static MEDIATYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)media type is (.+)$").unwrap());
static HARDWARE_TYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)Hardware is (.+),").unwrap());
static LINEPROTOCOL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)line protocol is (up|down)(.+)?$").unwrap());
static OPERSTATUS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(?:.+) is (.+),").unwrap());

static IPV4_PRIMARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)Internet address is (.+)$").unwrap());
static IPV4_SECONDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)Secondary address (.+)$").unwrap());
static IPV6_ADDRESS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+(.+), subnet").unwrap());
static IPV6_SUBNET: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m), subnet is (.+)$").unwrap());

const LLDP_ERRORS: &[&str] = &[INVALID_INPUT, "LLDP is not enabled"];
const CDP_ERRORS: &[&str] = &["CDP is not enabled"];

const LLDP_DETAIL: &str = "show lldp neighbors detail";
const CDP_DETAIL: &str = "show cdp neighbors detail";

const DELETED: &str = "deleted";

fn first_number<T: std::str::FromStr>(re: &Regex, data: &str) -> Option<T> {
    re.captures(data).and_then(|c| c[1].parse().ok())
}

/// Interfaces extractor.
pub struct InterfacesModule<'n> {
    normalizer: &'n dyn InterfaceNameNormalizer,
}

impl Default for InterfacesModule<'static> {
    fn default() -> Self {
        Self {
            normalizer: &IosInterfaceNames,
        }
    }
}

impl<'n> InterfacesModule<'n> {
    /// Create the extractor with a custom LLDP interface name normalizer.
    pub fn new(normalizer: &'n dyn InterfaceNameNormalizer) -> Self {
        Self { normalizer }
    }

    /// Parse the attributes of one `show interfaces` block.
    pub fn parse_interface(block: &str) -> Interface {
        Interface {
            description: first_group(&DESCRIPTION, block),
            macaddress: first_group(&MACADDRESS, block),
            mtu: first_number(&MTU, block),
            bandwidth: first_number(&BANDWIDTH, block),
            mediatype: first_group(&MEDIATYPE, block),
            duplex: first_group(&DUPLEX, block),
            lineprotocol: first_group(&LINEPROTOCOL, block),
            operstatus: parse_operstatus(block),
            hardware_type: first_group(&HARDWARE_TYPE, block),
            ..Interface::default()
        }
    }

    /// Build interface records from `show interfaces` output.
    pub fn populate_interfaces(data: &str, network: &mut NetworkFacts) {
        for (name, block) in parse_blocks(data) {
            network.interfaces.insert(name, Self::parse_interface(&block));
        }
    }

    /// Attach addresses from `show ip interface` output.
    ///
    /// Secondary addresses come first, the primary last. Every interface
    /// in the output gets a list; one without a primary address keeps it
    /// empty.
    pub fn populate_ipv4(data: &str, network: &mut NetworkFacts) {
        let all = network.all_ipv4_addresses.get_or_insert_with(Vec::new);

        for (name, block) in parse_blocks(data) {
            let intf = lazy_interface(&mut network.interfaces, &name, &block);
            let ipv4 = intf.ipv4.insert(Vec::new());

            let Some(primary) = first_group(&IPV4_PRIMARY, &block) else {
                continue;
            };
            let mut addresses = collect_first_group(&IPV4_SECONDARY, &block);
            addresses.push(primary);

            for address in addresses {
                let Some((addr, subnet)) = address.split_once('/') else {
                    debug!("{}: malformed IPv4 address '{}'", name, address);
                    continue;
                };
                let addr = addr.trim();
                all.push(addr.to_string());
                ipv4.push(IpAddress::new(addr, subnet.trim()));
            }
        }
    }

    /// Attach addresses from `show ipv6 interface` output.
    ///
    /// The n-th address line is paired with the n-th subnet line.
    pub fn populate_ipv6(data: &str, network: &mut NetworkFacts) {
        let all = network.all_ipv6_addresses.get_or_insert_with(Vec::new);

        for (name, block) in parse_blocks(data) {
            let intf = lazy_interface(&mut network.interfaces, &name, &block);
            let ipv6 = intf.ipv6.insert(Vec::new());

            let addresses = collect_first_group(&IPV6_ADDRESS, &block);
            let subnets = collect_first_group(&IPV6_SUBNET, &block);

            for (addr, subnet) in addresses.iter().zip(&subnets) {
                let addr = addr.trim();
                all.push(addr.to_string());
                ipv6.push(IpAddress::new(addr, subnet.trim()));
            }
        }
    }

    async fn lldp_neighbors<R: CommandRunner>(&self, runner: &mut R) -> Result<NeighborTable> {
        let detail = runner.run_one(LLDP_DETAIL).await?;
        Ok(parse_lldp_neighbors(&detail, self.normalizer))
    }

    async fn cdp_neighbors<R: CommandRunner>(runner: &mut R) -> Result<NeighborTable> {
        let detail = runner.run_one(CDP_DETAIL).await?;
        Ok(parse_cdp_neighbors(&detail))
    }
}

impl FactsModule for InterfacesModule<'_> {
    const NAME: &'static str = "interfaces";
    const COMMANDS: &'static [&'static str] = &[
        "show interfaces",
        "show ip interface",
        "show ipv6 interface",
        "show lldp",
        "show cdp",
    ];

    async fn populate<R: CommandRunner>(
        &self,
        runner: &mut R,
        facts: &mut FactsBuilder,
    ) -> Result<()> {
        let responses = run_batch(runner, Self::COMMANDS).await?;

        let mut network = NetworkFacts {
            all_ipv4_addresses: Some(Vec::new()),
            all_ipv6_addresses: Some(Vec::new()),
            ..NetworkFacts::default()
        };

        if !responses[0].is_empty() {
            Self::populate_interfaces(&responses[0], &mut network);
        }
        if !responses[1].is_empty() {
            Self::populate_ipv4(&responses[1], &mut network);
        }
        if !responses[2].is_empty() {
            Self::populate_ipv6(&responses[2], &mut network);
        }

        // CDP is merged last and wins when both report the same interface
        let mut neighbors = NeighborTable::new();
        if usable(&responses[3], LLDP_ERRORS) {
            neighbors.extend(self.lldp_neighbors(runner).await?);
        }
        if usable(&responses[4], CDP_ERRORS) {
            neighbors.extend(Self::cdp_neighbors(runner).await?);
        }
        network.neighbors = Some(neighbors);

        facts.facts_mut().network = network;
        Ok(())
    }
}

/// First comma-delimited clause after "is", e.g. `administratively down`.
fn parse_operstatus(data: &str) -> Option<String> {
    OPERSTATUS
        .captures(data)
        .map(|c| c[1].trim_start().to_string())
}

/// Get an interface record, creating it if the primary listing lacked it.
///
/// A freshly created record takes its status from the address block, but
/// only when that status is `deleted`.
fn lazy_interface<'a>(
    interfaces: &'a mut IndexMap<String, Interface>,
    name: &str,
    block: &str,
) -> &'a mut Interface {
    interfaces.entry(name.to_string()).or_insert_with(|| {
        debug!("{}: not in interface listing, creating record", name);
        Interface {
            operstatus: parse_operstatus(block).filter(|s| s == DELETED),
            ..Interface::default()
        }
    })
}
