//! Sequential composition of runnables.
//!
//! A `RunnableSequence` links two runnables whose types line up at compile
//! time. Longer chains are nested sequences; since each mode is defined in
//! terms of the links' own modes, `pipe(pipe(a, b), c)` and
//! `pipe(a, pipe(b, c))` behave identically.

use std::fmt::Debug;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;

use crate::error::{Error, Result};

use super::base::Runnable;
use super::config::{ConfigOrList, RunnableConfig, ensure_config};

/// A sequence of Runnables that are executed one after another.
///
/// The output of `first` is the input of `last`.
pub struct RunnableSequence<R1, R2>
where
    R1: Runnable,
    R2: Runnable<Input = R1::Output>,
{
    first: R1,
    last: R2,
    name: Option<String>,
}

impl<R1, R2> Debug for RunnableSequence<R1, R2>
where
    R1: Runnable,
    R2: Runnable<Input = R1::Output>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunnableSequence")
            .field("first", &self.first)
            .field("last", &self.last)
            .field("name", &self.name)
            .finish()
    }
}

impl<R1, R2> RunnableSequence<R1, R2>
where
    R1: Runnable,
    R2: Runnable<Input = R1::Output>,
{
    /// Create a new RunnableSequence.
    pub fn new(first: R1, last: R2) -> Self {
        Self {
            first,
            last,
            name: None,
        }
    }

    /// Create a new RunnableSequence with a name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn first(&self) -> &R1 {
        &self.first
    }

    pub fn last(&self) -> &R2 {
        &self.last
    }
}

#[async_trait]
impl<R1, R2> Runnable for RunnableSequence<R1, R2>
where
    R1: Runnable + 'static,
    R2: Runnable<Input = R1::Output> + 'static,
{
    type Input = R1::Input;
    type Output = R2::Output;

    fn name(&self) -> Option<String> {
        self.name.clone()
    }

    fn step_count(&self) -> usize {
        self.first.step_count() + self.last.step_count()
    }

    async fn invoke(&self, input: Self::Input, config: Option<RunnableConfig>) -> Result<Self::Output> {
        let config = ensure_config(config).for_child();

        tracing::debug!(
            target: "chain_core::runnables",
            sequence = %self.get_name(),
            step = %self.first.get_name(),
            "seq:step:first"
        );
        let intermediate = self.first.invoke(input, Some(config.clone())).await?;

        tracing::debug!(
            target: "chain_core::runnables",
            sequence = %self.get_name(),
            step = %self.last.get_name(),
            "seq:step:last"
        );
        self.last.invoke(intermediate, Some(config)).await
    }

    async fn batch(
        &self,
        inputs: Vec<Self::Input>,
        config: Option<ConfigOrList>,
    ) -> Result<Vec<Self::Output>> {
        let config = config.as_ref().map(ConfigOrList::for_child);
        let expected = inputs.len();

        let intermediate = self.first.batch(inputs, config.clone()).await?;
        check_result_count(&self.first, expected, intermediate.len())?;

        let outputs = self.last.batch(intermediate, config).await?;
        check_result_count(&self.last, expected, outputs.len())?;
        Ok(outputs)
    }

    async fn batch_results(
        &self,
        inputs: Vec<Self::Input>,
        config: Option<ConfigOrList>,
    ) -> Result<Vec<Result<Self::Output>>> {
        let config = config.as_ref().map(ConfigOrList::for_child);
        let expected = inputs.len();

        let first_results = self.first.batch_results(inputs, config.clone()).await?;
        check_result_count(&self.first, expected, first_results.len())?;

        // Only items that survived the first link move on; positional
        // configs follow their items.
        let mut survivors = Vec::new();
        let mut positions = Vec::new();
        let mut outcomes: Vec<Option<Result<Self::Output>>> = Vec::with_capacity(expected);
        for (index, result) in first_results.into_iter().enumerate() {
            match result {
                Ok(value) => {
                    survivors.push(value);
                    positions.push(index);
                    outcomes.push(None);
                }
                Err(err) => outcomes.push(Some(Err(err))),
            }
        }

        let last_config = match config {
            Some(ConfigOrList::List(list)) => Some(ConfigOrList::List(
                positions
                    .iter()
                    .filter_map(|&i| list.get(i).cloned())
                    .collect(),
            )),
            other => other,
        };
        let last_results = self.last.batch_results(survivors, last_config).await?;
        check_result_count(&self.last, positions.len(), last_results.len())?;

        for (index, result) in positions.into_iter().zip(last_results) {
            outcomes[index] = Some(result);
        }
        Ok(outcomes
            .into_iter()
            .enumerate()
            .map(|(index, outcome)| {
                outcome.unwrap_or_else(|| {
                    Err(Error::execution(format!("no result for batch item {}", index)))
                })
            })
            .collect())
    }

    /// Invoke every link but the last, then stream the last link.
    fn stream(
        &self,
        input: Self::Input,
        config: Option<RunnableConfig>,
    ) -> BoxStream<'_, Result<Self::Output>> {
        Box::pin(async_stream::stream! {
            let config = ensure_config(config).for_child();

            let intermediate = match self.first.invoke(input, Some(config.clone())).await {
                Ok(output) => output,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            let mut stream = self.last.stream(intermediate, Some(config));
            while let Some(output) = stream.next().await {
                yield output;
            }
        })
    }
}

/// A link's batch must answer every item it was given, in order.
fn check_result_count<R: Runnable>(link: &R, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        return Ok(());
    }
    Err(Error::execution(format!(
        "{} returned {} batch results for {} inputs",
        link.get_name(),
        actual,
        expected
    )))
}

/// Create a RunnableSequence by piping two Runnables together.
pub fn pipe<R1, R2>(first: R1, second: R2) -> RunnableSequence<R1, R2>
where
    R1: Runnable,
    R2: Runnable<Input = R1::Output>,
{
    RunnableSequence::new(first, second)
}
