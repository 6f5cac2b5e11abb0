//! Facts collection pipeline.

use log::{debug, info};

use super::base::{FactsBuilder, FactsModule, GatheredFacts};
use super::config::ConfigModule;
use super::default::DefaultModule;
use super::hardware::HardwareModule;
use super::interfaces::InterfacesModule;
use super::subset::{GatherSubset, Subset};
use crate::capabilities::{Capabilities, CapabilityProvider, CliCapabilities};
use crate::error::Result;
use crate::normalize::{InterfaceNameNormalizer, IosInterfaceNames};
use crate::runner::CommandRunner;

/// Builder for constructing a [`FactsCollector`].
///
/// # Example
///
/// ```rust
/// use iosfacts::FactsCollector;
///
/// # fn example() -> Result<(), iosfacts::Error> {
/// let collector = FactsCollector::builder()
///     .gather_subset(["all", "!config"])
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct FactsCollectorBuilder {
    gather_subset: Vec<String>,
    capabilities: Option<Capabilities>,
    normalizer: Box<dyn InterfaceNameNormalizer>,
}

impl FactsCollectorBuilder {
    /// Create a builder gathering the `min` subset.
    pub fn new() -> Self {
        Self {
            gather_subset: vec!["min".to_string()],
            capabilities: None,
            normalizer: Box::new(IosInterfaceNames),
        }
    }

    /// Set the subset list (e.g. `["all", "!config"]`).
    pub fn gather_subset<I, S>(mut self, subsets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.gather_subset = subsets.into_iter().map(Into::into).collect();
        self
    }

    /// Use fixed capabilities instead of discovering them from `show version`.
    pub fn capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    /// Set the normalizer applied to LLDP local interface names.
    pub fn normalizer(mut self, normalizer: impl InterfaceNameNormalizer + 'static) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    /// Build the collector.
    ///
    /// Fails if the subset list names an unknown subset.
    pub fn build(self) -> Result<FactsCollector> {
        let subset = GatherSubset::parse(&self.gather_subset)?;
        debug!("resolved gather subset {:?}", subset.names());

        Ok(FactsCollector {
            subset,
            capabilities: self.capabilities,
            normalizer: self.normalizer,
        })
    }
}

impl Default for FactsCollectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the selected extractors against a device.
///
/// A collector holds no session state and can be reused across devices.
pub struct FactsCollector {
    subset: GatherSubset,
    capabilities: Option<Capabilities>,
    normalizer: Box<dyn InterfaceNameNormalizer>,
}

impl FactsCollector {
    /// Create a builder.
    pub fn builder() -> FactsCollectorBuilder {
        FactsCollectorBuilder::new()
    }

    /// The resolved subset selection.
    pub fn subset(&self) -> &GatherSubset {
        &self.subset
    }

    /// Gather facts over the given runner.
    ///
    /// Extractors run one at a time in subset order. Commands the device
    /// rejects leave facts absent; only runner failures abort collection.
    pub async fn collect<R: CommandRunner>(&self, runner: &mut R) -> Result<GatheredFacts> {
        let capabilities = match &self.capabilities {
            Some(caps) => caps.clone(),
            None => CliCapabilities::new(&mut *runner).discover().await?,
        };
        debug!(
            "device {} ({})",
            capabilities.network_os_hostname.as_deref().unwrap_or("<unknown>"),
            capabilities.network_os_model.as_deref().unwrap_or("<unknown>")
        );

        let mut builder = FactsBuilder::new();

        for subset in self.subset.iter() {
            info!("gathering {} facts", subset);
            match subset {
                Subset::Default => {
                    DefaultModule::new(capabilities.clone())
                        .populate(runner, &mut builder)
                        .await?
                }
                Subset::Hardware => HardwareModule.populate(runner, &mut builder).await?,
                Subset::Config => ConfigModule.populate(runner, &mut builder).await?,
                Subset::Interfaces => {
                    InterfacesModule::new(&*self.normalizer)
                        .populate(runner, &mut builder)
                        .await?
                }
            }
        }

        builder.facts_mut().gather_subset = self.subset.names();
        Ok(builder.finish())
    }
}
