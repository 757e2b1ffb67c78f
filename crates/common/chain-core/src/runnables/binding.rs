//! Wrappers that change how a runnable is called without changing what it
//! computes: bound default config, and mapping over lists.

use std::fmt::Debug;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::Result;

use super::base::Runnable;
use super::config::{ConfigOrList, RunnableConfig, ensure_config, merge_configs};

// =============================================================================
// RunnableBinding
// =============================================================================

/// A Runnable with default config bound to it.
///
/// The effective config of every call is `merge_configs([bound, call])`, so
/// call-time options override the bound defaults.
pub struct RunnableBinding<R>
where
    R: Runnable,
{
    bound: R,
    config: RunnableConfig,
}

impl<R> Debug for RunnableBinding<R>
where
    R: Runnable,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunnableBinding")
            .field("bound", &self.bound)
            .field("config", &self.config)
            .finish()
    }
}

impl<R> RunnableBinding<R>
where
    R: Runnable,
{
    /// Create a new RunnableBinding.
    pub fn new(bound: R, config: RunnableConfig) -> Self {
        Self { bound, config }
    }

    pub fn bound(&self) -> &R {
        &self.bound
    }

    pub fn config(&self) -> &RunnableConfig {
        &self.config
    }

    fn merge_config(&self, config: Option<RunnableConfig>) -> RunnableConfig {
        merge_configs(vec![Some(self.config.clone()), config])
    }

    fn merge_config_list(&self, config: Option<ConfigOrList>) -> ConfigOrList {
        match config {
            None => ConfigOrList::from(self.config.clone()),
            Some(ConfigOrList::Single(c)) => ConfigOrList::from(self.merge_config(Some(*c))),
            Some(ConfigOrList::List(list)) => ConfigOrList::List(
                list.into_iter()
                    .map(|c| self.merge_config(Some(c)))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl<R> Runnable for RunnableBinding<R>
where
    R: Runnable + 'static,
{
    type Input = R::Input;
    type Output = R::Output;

    fn name(&self) -> Option<String> {
        self.bound.name()
    }

    fn get_name(&self) -> String {
        self.bound.get_name()
    }

    fn step_count(&self) -> usize {
        self.bound.step_count()
    }

    async fn invoke(&self, input: Self::Input, config: Option<RunnableConfig>) -> Result<Self::Output> {
        self.bound.invoke(input, Some(self.merge_config(config))).await
    }

    async fn batch(
        &self,
        inputs: Vec<Self::Input>,
        config: Option<ConfigOrList>,
    ) -> Result<Vec<Self::Output>> {
        self.bound
            .batch(inputs, Some(self.merge_config_list(config)))
            .await
    }

    async fn batch_results(
        &self,
        inputs: Vec<Self::Input>,
        config: Option<ConfigOrList>,
    ) -> Result<Vec<Result<Self::Output>>> {
        self.bound
            .batch_results(inputs, Some(self.merge_config_list(config)))
            .await
    }

    fn stream(
        &self,
        input: Self::Input,
        config: Option<RunnableConfig>,
    ) -> BoxStream<'_, Result<Self::Output>> {
        self.bound.stream(input, Some(self.merge_config(config)))
    }
}

// =============================================================================
// RunnableEach
// =============================================================================

/// A Runnable that maps over a list of inputs using the bound Runnable's
/// `batch`.
pub struct RunnableEach<R>
where
    R: Runnable,
{
    bound: R,
}

impl<R> Debug for RunnableEach<R>
where
    R: Runnable,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunnableEach")
            .field("bound", &self.bound)
            .finish()
    }
}

impl<R> RunnableEach<R>
where
    R: Runnable,
{
    /// Create a new RunnableEach.
    pub fn new(bound: R) -> Self {
        Self { bound }
    }
}

#[async_trait]
impl<R> Runnable for RunnableEach<R>
where
    R: Runnable + 'static,
{
    type Input = Vec<R::Input>;
    type Output = Vec<R::Output>;

    fn name(&self) -> Option<String> {
        Some(format!("RunnableEach<{}>", self.bound.get_name()))
    }

    async fn invoke(&self, inputs: Self::Input, config: Option<RunnableConfig>) -> Result<Self::Output> {
        let config = ensure_config(config);
        self.bound.batch(inputs, Some(config.into())).await
    }
}
