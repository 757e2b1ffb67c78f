//! Parallel fan-out of `invoke` across a batch of inputs.
//!
//! Every input is paired with its own resolved config. All invocations are
//! launched together and joined; the optional `max_concurrency` of the first
//! config caps how many are in flight at once. Results always come back in
//! input order.

use std::future::Future;

use futures::future::{join_all, try_join_all};
use tokio::sync::Semaphore;

use crate::error::{Error, Result};

use super::base::Runnable;
use super::config::{ConfigOrList, RunnableConfig, get_config_list};

/// Runs `invoke` for each input of a batch concurrently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchExecutor {
    max_concurrency: Option<usize>,
}

impl BatchExecutor {
    /// Create an executor with no concurrency cap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of invocations in flight. Zero means unbounded.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = Some(max_concurrency).filter(|&n| n > 0);
        self
    }

    /// Build an executor from resolved per-item configs.
    ///
    /// The cap is read from the first config, matching how a broadcast
    /// config is applied to the whole batch.
    pub fn from_configs(configs: &[RunnableConfig]) -> Self {
        match configs.first().and_then(|c| c.max_concurrency) {
            Some(limit) => Self::new().with_max_concurrency(limit),
            None => Self::new(),
        }
    }

    pub fn max_concurrency(&self) -> Option<usize> {
        self.max_concurrency
    }

    /// Invoke `runnable` once per input, failing on the first error.
    ///
    /// Outstanding invocations are dropped as soon as one fails.
    pub async fn run<R>(
        &self,
        runnable: &R,
        inputs: Vec<R::Input>,
        configs: Vec<RunnableConfig>,
    ) -> Result<Vec<R::Output>>
    where
        R: Runnable + ?Sized,
    {
        check_lengths(inputs.len(), configs.len())?;
        let semaphore = self.semaphore(inputs.len());
        self.log_launch(runnable, inputs.len());

        let calls = inputs.into_iter().zip(configs).map(|(input, config)| {
            with_permit(semaphore.as_ref(), runnable.invoke(input, Some(config)))
        });
        try_join_all(calls).await
    }

    /// Invoke `runnable` once per input, keeping every item's outcome.
    pub async fn run_settled<R>(
        &self,
        runnable: &R,
        inputs: Vec<R::Input>,
        configs: Vec<RunnableConfig>,
    ) -> Result<Vec<Result<R::Output>>>
    where
        R: Runnable + ?Sized,
    {
        check_lengths(inputs.len(), configs.len())?;
        let semaphore = self.semaphore(inputs.len());
        self.log_launch(runnable, inputs.len());

        let calls = inputs.into_iter().zip(configs).map(|(input, config)| {
            with_permit(semaphore.as_ref(), runnable.invoke(input, Some(config)))
        });
        Ok(join_all(calls).await)
    }

    fn semaphore(&self, len: usize) -> Option<Semaphore> {
        self.max_concurrency
            .filter(|&limit| limit < len)
            .map(Semaphore::new)
    }

    fn log_launch<R: Runnable + ?Sized>(&self, runnable: &R, len: usize) {
        tracing::debug!(
            target: "chain_core::runnables",
            runnable = %runnable.get_name(),
            items = len,
            max_concurrency = ?self.max_concurrency,
            "launching batch"
        );
    }
}

fn check_lengths(inputs: usize, configs: usize) -> Result<()> {
    if inputs != configs {
        return Err(Error::configuration(format!(
            "config must be a list of the same length as inputs, but got {} configs for {} inputs",
            configs, inputs
        )));
    }
    Ok(())
}

async fn with_permit<T>(
    semaphore: Option<&Semaphore>,
    call: impl Future<Output = Result<T>>,
) -> Result<T> {
    let _permit = match semaphore {
        Some(semaphore) => Some(
            semaphore
                .acquire()
                .await
                .map_err(|_| Error::other("batch semaphore closed"))?,
        ),
        None => None,
    };
    call.await
}

/// Resolve `config` against `inputs` and run the batch, all or nothing.
pub async fn batch_invoke<R>(
    runnable: &R,
    inputs: Vec<R::Input>,
    config: Option<ConfigOrList>,
) -> Result<Vec<R::Output>>
where
    R: Runnable + ?Sized,
{
    let configs = get_config_list(config, inputs.len())?;
    if inputs.is_empty() {
        return Ok(Vec::new());
    }
    BatchExecutor::from_configs(&configs)
        .run(runnable, inputs, configs)
        .await
}

/// Resolve `config` against `inputs` and run the batch, one result per item.
pub async fn batch_invoke_results<R>(
    runnable: &R,
    inputs: Vec<R::Input>,
    config: Option<ConfigOrList>,
) -> Result<Vec<Result<R::Output>>>
where
    R: Runnable + ?Sized,
{
    let configs = get_config_list(config, inputs.len())?;
    if inputs.is_empty() {
        return Ok(Vec::new());
    }
    BatchExecutor::from_configs(&configs)
        .run_settled(runnable, inputs, configs)
        .await
}
