//! # iosfacts
//!
//! Facts gathering for Cisco IOS and IOS-XE devices.
//!
//! iosfacts turns the text of a handful of show-commands into a typed,
//! serializable facts tree: software family, serial numbers, stacking and
//! VSS membership, filesystems, memory and CPU load, the running
//! configuration, and per-interface attributes with addresses and LLDP/CDP
//! neighbors.
//!
//! ## Features
//!
//! - Transport agnostic: commands go through the [`CommandRunner`] trait
//! - Selectable gather subsets (`all`, `min`, `!config`, ...)
//! - Tolerant parsing: unsupported commands leave facts absent
//! - Replay of captured sessions via [`ScriptedRunner`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use iosfacts::{FactsCollector, ScriptedRunner};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), iosfacts::Error> {
//!     let mut runner = ScriptedRunner::from_file("catalyst.txt")?;
//!
//!     let collector = FactsCollector::builder()
//!         .gather_subset(["all"])
//!         .build()?;
//!
//!     let gathered = collector.collect(&mut runner).await?;
//!     println!("{:?}", gathered.facts.device.hostname);
//!     Ok(())
//! }
//! ```

pub mod capabilities;
pub mod error;
pub mod facts;
pub mod normalize;
pub mod runner;

// Re-export main types for convenience
pub use capabilities::{Capabilities, CapabilityProvider, CliCapabilities};
pub use error::Error;
pub use facts::{Facts, FactsCollector, FactsCollectorBuilder, GatherSubset, GatheredFacts};
pub use normalize::{InterfaceNameNormalizer, IosInterfaceNames};
pub use runner::{CommandRunner, ScriptedRunner};
