//! Per-call options for runnables.
//!
//! Options travel explicitly with every call. When a runnable has bound
//! defaults (see [`RunnableBinding`]) the effective options are built with
//! [`merge_configs`] in this order, later entries winning:
//! library defaults ([`RunnableConfig::default`]), bound defaults, call-time
//! options.
//!
//! [`RunnableBinding`]: super::binding::RunnableBinding

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Options accepted by `invoke`, `batch` and `stream`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunnableConfig {
    /// Labels for this call and everything it calls.
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub metadata: HashMap<String, Value>,

    /// Display name of the run. Falls back to the runnable's name.
    #[serde(default)]
    pub run_name: Option<String>,

    /// Upper bound on invocations a batch keeps in flight. Unbounded when
    /// unset.
    #[serde(default)]
    pub max_concurrency: Option<usize>,

    /// Values for runtime-configurable fields of a runnable.
    #[serde(default)]
    pub configurable: HashMap<String, Value>,

    #[serde(default)]
    pub run_id: Option<Uuid>,
}

impl RunnableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_metadata(mut self, metadata: HashMap<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_run_name(mut self, run_name: impl Into<String>) -> Self {
        self.run_name = Some(run_name.into());
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = Some(max_concurrency);
        self
    }

    pub fn with_configurable(mut self, configurable: HashMap<String, Value>) -> Self {
        self.configurable = configurable;
        self
    }

    pub fn with_run_id(mut self, run_id: Uuid) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Layer `overrides` on top of `self`.
    ///
    /// Tags are unioned and kept sorted. Map entries from `overrides`
    /// replace entries with the same key. Scalar options are replaced only
    /// when `overrides` sets them.
    pub fn merge(mut self, overrides: RunnableConfig) -> Self {
        self.tags.extend(overrides.tags);
        self.tags.sort();
        self.tags.dedup();

        self.metadata.extend(overrides.metadata);
        self.configurable.extend(overrides.configurable);

        self.run_name = overrides.run_name.or(self.run_name);
        self.max_concurrency = overrides.max_concurrency.or(self.max_concurrency);
        self.run_id = overrides.run_id.or(self.run_id);
        self
    }

    /// Options for a nested step: the same config without the run identity,
    /// which belongs to the enclosing run.
    pub fn for_child(&self) -> Self {
        RunnableConfig {
            run_id: None,
            run_name: None,
            ..self.clone()
        }
    }
}

/// Batch options: one config for every input, or one config per input.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigOrList {
    Single(Box<RunnableConfig>),
    List(Vec<RunnableConfig>),
}

impl ConfigOrList {
    /// Apply [`RunnableConfig::for_child`] to every config.
    pub fn for_child(&self) -> Self {
        match self {
            ConfigOrList::Single(config) => ConfigOrList::Single(Box::new(config.for_child())),
            ConfigOrList::List(list) => {
                ConfigOrList::List(list.iter().map(RunnableConfig::for_child).collect())
            }
        }
    }
}

impl From<RunnableConfig> for ConfigOrList {
    fn from(config: RunnableConfig) -> Self {
        ConfigOrList::Single(Box::new(config))
    }
}

impl From<Vec<RunnableConfig>> for ConfigOrList {
    fn from(configs: Vec<RunnableConfig>) -> Self {
        ConfigOrList::List(configs)
    }
}

/// The given config, or the library defaults.
pub fn ensure_config(config: Option<RunnableConfig>) -> RunnableConfig {
    config.unwrap_or_default()
}

/// Expand batch options into exactly one config per input.
///
/// A single config is repeated `length` times; a run id is unique per run,
/// so only the first copy keeps it. A list is used as is and must have
/// `length` entries.
pub fn get_config_list(config: Option<ConfigOrList>, length: usize) -> Result<Vec<RunnableConfig>> {
    let shared = match config {
        None => RunnableConfig::default(),
        Some(ConfigOrList::Single(shared)) => *shared,
        Some(ConfigOrList::List(list)) if list.len() == length => return Ok(list),
        Some(ConfigOrList::List(list)) => {
            return Err(Error::configuration(format!(
                "config must be a list of the same length as inputs, but got {} configs for {} inputs",
                list.len(),
                length
            )));
        }
    };

    if length > 1 && shared.run_id.is_some() {
        tracing::warn!(
            target: "chain_core::runnables",
            run_id = ?shared.run_id,
            items = length,
            "run_id applies to the first batch item only"
        );
    }

    let rest = RunnableConfig {
        run_id: None,
        ..shared.clone()
    };
    Ok(std::iter::once(shared)
        .chain(std::iter::repeat_n(rest, length.saturating_sub(1)))
        .take(length)
        .collect())
}

/// Copy of `config` with the given options replaced. `configurable` entries
/// are added to the existing ones.
pub fn patch_config(
    config: Option<RunnableConfig>,
    run_name: Option<String>,
    max_concurrency: Option<usize>,
    configurable: Option<HashMap<String, Value>>,
) -> RunnableConfig {
    ensure_config(config).merge(RunnableConfig {
        run_name,
        max_concurrency,
        configurable: configurable.unwrap_or_default(),
        ..RunnableConfig::default()
    })
}

/// Fold configs left to right with [`RunnableConfig::merge`]. `None`
/// entries are skipped.
pub fn merge_configs(configs: Vec<Option<RunnableConfig>>) -> RunnableConfig {
    configs
        .into_iter()
        .flatten()
        .fold(RunnableConfig::default(), RunnableConfig::merge)
}
