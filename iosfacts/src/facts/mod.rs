//! Facts extractors and the collection pipeline.
//!
//! Each extractor implements [`FactsModule`]: it issues a fixed batch of
//! show-commands, parses the text, and writes its part of the [`Facts`]
//! tree. The [`FactsCollector`] picks extractors by gather subset and runs
//! them in order.

mod base;
mod blocks;
mod collector;
mod config;
mod default;
mod hardware;
mod interfaces;
mod neighbors;
mod subset;
mod tree;

pub use base::{FactsBuilder, FactsModule, GatheredFacts};
pub use blocks::parse_blocks;
pub use collector::{FactsCollector, FactsCollectorBuilder};
pub use config::ConfigModule;
pub use default::DefaultModule;
pub use hardware::HardwareModule;
pub use interfaces::InterfacesModule;
pub use neighbors::{NeighborTable, parse_cdp_neighbors, parse_lldp_neighbors};
pub use subset::{GatherSubset, Subset};
pub use tree::{
    CpuUtilization, DeviceFacts, Facts, FilesystemInfo, HardwareFacts, Interface, IosType,
    IpAddress, Neighbor, NetworkFacts, OperatingMode, VirtualSwitch,
};
