//! Gather subset selection.

use std::fmt;

use super::base::FactsModule;
use super::config::ConfigModule;
use super::default::DefaultModule;
use super::hardware::HardwareModule;
use super::interfaces::InterfacesModule;
use crate::error::{FactsError, Result};

/// A group of facts that can be gathered independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Subset {
    Default,
    Hardware,
    Config,
    Interfaces,
}

impl Subset {
    /// Subsets that can be selected or excluded, in run order.
    pub const OPTIONAL: [Subset; 3] = [Subset::Hardware, Subset::Config, Subset::Interfaces];

    /// Name used in subset lists and in the `gather_subset` fact.
    ///
    /// This is the `NAME` of the extractor that gathers the subset.
    pub fn name(self) -> &'static str {
        match self {
            Subset::Default => DefaultModule::NAME,
            Subset::Hardware => HardwareModule::NAME,
            Subset::Config => ConfigModule::NAME,
            Subset::Interfaces => InterfacesModule::NAME,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::OPTIONAL.into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for Subset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolved set of subsets to gather.
///
/// Built from a list such as `["all", "!config"]`:
/// - `all` selects every subset, `!all` excludes every optional one
/// - `min` selects nothing beyond `default`
/// - a bare name selects that subset, `!name` excludes it
/// - with no positive selection, every subset is selected
/// - exclusions are applied after selections
///
/// `default` is always gathered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatherSubset {
    subsets: Vec<Subset>,
}

impl GatherSubset {
    /// Resolve a subset list.
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let mut include: Vec<Subset> = Vec::new();
        let mut exclude: Vec<Subset> = Vec::new();
        let mut selected_any = false;

        for name in names {
            let name = name.as_ref().trim();
            let (negate, name) = match name.strip_prefix('!') {
                Some(rest) => (true, rest),
                None => (false, name),
            };

            match (negate, name) {
                (false, "all") => {
                    selected_any = true;
                    include.extend(Subset::OPTIONAL);
                }
                (true, "all") => exclude.extend(Subset::OPTIONAL),
                (false, "min") => selected_any = true,
                (true, "min") => {}
                _ => {
                    let subset = Subset::from_name(name).ok_or_else(|| FactsError::InvalidSubset {
                        name: name.to_string(),
                        valid: Self::valid_names(),
                    })?;
                    if negate {
                        exclude.push(subset);
                    } else {
                        selected_any = true;
                        include.push(subset);
                    }
                }
            }
        }

        if !selected_any {
            include.extend(Subset::OPTIONAL);
        }

        let mut subsets = vec![Subset::Default];
        subsets.extend(
            Subset::OPTIONAL
                .into_iter()
                .filter(|s| include.contains(s) && !exclude.contains(s)),
        );

        Ok(Self { subsets })
    }

    /// Every subset.
    pub fn all() -> Self {
        let mut subsets = vec![Subset::Default];
        subsets.extend(Subset::OPTIONAL);
        Self { subsets }
    }

    /// Only the default subset.
    pub fn min() -> Self {
        Self {
            subsets: vec![Subset::Default],
        }
    }

    /// Check if a subset is selected.
    pub fn contains(&self, subset: Subset) -> bool {
        self.subsets.contains(&subset)
    }

    /// Selected subsets in run order.
    pub fn iter(&self) -> impl Iterator<Item = Subset> + '_ {
        self.subsets.iter().copied()
    }

    /// Selected subset names in run order.
    pub fn names(&self) -> Vec<String> {
        self.iter().map(|s| s.name().to_string()).collect()
    }

    fn valid_names() -> String {
        let mut names = vec!["all", "min"];
        names.extend(Subset::OPTIONAL.iter().map(|s| s.name()));
        names.join(", ")
    }
}

impl Default for GatherSubset {
    fn default() -> Self {
        Self::min()
    }
}
