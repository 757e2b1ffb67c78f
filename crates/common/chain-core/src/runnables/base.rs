//! The core `Runnable` trait and the function-backed `RunnableLambda`.

use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::stream::BoxStream;

use crate::error::Result;

use super::batch::{batch_invoke, batch_invoke_results};
use super::binding::{RunnableBinding, RunnableEach};
use super::config::{ConfigOrList, RunnableConfig, ensure_config};
use super::map::RunnableMap;
use super::sequence::RunnableSequence;

/// A unit of work that can be invoked, batched, streamed and composed.
///
/// Key methods:
/// - `invoke`: transforms a single input into an output.
/// - `batch`: transforms many inputs concurrently, keeping input order.
/// - `stream`: yields the output of a single input as it is produced.
///
/// Only `invoke` is required. The default `batch` fans out `invoke` through
/// the batch executor and the default `stream` emits the `invoke` result as
/// a single chunk, so every unit supports all three modes.
///
/// All methods accept an optional config, which carries tags, metadata and
/// execution limits down the call tree.
#[async_trait]
pub trait Runnable: Send + Sync + Debug {
    type Input: Send + Sync + Clone + Debug + 'static;
    type Output: Send + Sync + Clone + Debug + 'static;

    /// Explicit name, if one was given.
    fn name(&self) -> Option<String> {
        None
    }

    /// Get the name of this Runnable, falling back to its type name.
    fn get_name(&self) -> String {
        self.name()
            .unwrap_or_else(|| short_type_name(std::any::type_name::<Self>()))
    }

    /// Number of links this Runnable contributes to a sequence.
    fn step_count(&self) -> usize {
        1
    }

    /// Run once on `input`.
    async fn invoke(&self, input: Self::Input, config: Option<RunnableConfig>)
    -> Result<Self::Output>;

    /// Transform multiple inputs into outputs concurrently.
    ///
    /// `config` is either broadcast to every input or matched positionally.
    /// A positional list of the wrong length fails before any invocation
    /// starts. The first failing item fails the whole batch.
    async fn batch(
        &self,
        inputs: Vec<Self::Input>,
        config: Option<ConfigOrList>,
    ) -> Result<Vec<Self::Output>> {
        batch_invoke(self, inputs, config).await
    }

    /// Like [`Runnable::batch`] but reports one result per input instead of
    /// failing the whole call. Configuration errors are still returned as
    /// the outer error.
    async fn batch_results(
        &self,
        inputs: Vec<Self::Input>,
        config: Option<ConfigOrList>,
    ) -> Result<Vec<Result<Self::Output>>> {
        batch_invoke_results(self, inputs, config).await
    }

    /// Run once on `input`, yielding output chunks as they are produced.
    ///
    /// Units without native streaming yield their `invoke` result as the
    /// only chunk.
    fn stream(
        &self,
        input: Self::Input,
        config: Option<RunnableConfig>,
    ) -> BoxStream<'_, Result<Self::Output>> {
        Box::pin(futures::stream::once(self.invoke(input, config)))
    }

    /// Chain `next` after this Runnable.
    fn pipe<R>(self, next: R) -> RunnableSequence<Self, R>
    where
        Self: Sized,
        R: Runnable<Input = Self::Output>,
    {
        RunnableSequence::new(self, next)
    }

    /// Bind default config to this Runnable. Call-time config still wins.
    fn with_config(self, config: RunnableConfig) -> RunnableBinding<Self>
    where
        Self: Sized,
    {
        RunnableBinding::new(self, config)
    }

    /// Apply a pure transform to every output of this Runnable.
    #[allow(clippy::type_complexity)]
    fn map_output<F, O>(self, func: F) -> RunnableSequence<Self, RunnableMap<F, Self::Output, O>>
    where
        Self: Sized,
        F: Fn(Self::Output) -> O + Send + Sync,
        O: Send + Sync + Clone + Debug + 'static,
    {
        RunnableSequence::new(self, RunnableMap::new(func).with_name("map_output"))
    }

    /// Return a Runnable that maps a list of inputs to a list of outputs.
    fn each(self) -> RunnableEach<Self>
    where
        Self: Sized,
    {
        RunnableEach::new(self)
    }
}

#[async_trait]
impl<R> Runnable for Arc<R>
where
    R: Runnable + ?Sized + 'static,
{
    type Input = R::Input;
    type Output = R::Output;

    fn name(&self) -> Option<String> {
        (**self).name()
    }

    fn get_name(&self) -> String {
        (**self).get_name()
    }

    fn step_count(&self) -> usize {
        (**self).step_count()
    }

    async fn invoke(&self, input: Self::Input, config: Option<RunnableConfig>) -> Result<Self::Output> {
        (**self).invoke(input, config).await
    }

    async fn batch(
        &self,
        inputs: Vec<Self::Input>,
        config: Option<ConfigOrList>,
    ) -> Result<Vec<Self::Output>> {
        (**self).batch(inputs, config).await
    }

    async fn batch_results(
        &self,
        inputs: Vec<Self::Input>,
        config: Option<ConfigOrList>,
    ) -> Result<Vec<Result<Self::Output>>> {
        (**self).batch_results(inputs, config).await
    }

    fn stream(
        &self,
        input: Self::Input,
        config: Option<RunnableConfig>,
    ) -> BoxStream<'_, Result<Self::Output>> {
        (**self).stream(input, config)
    }
}

/// Type-erased runnable, composable like a concrete one.
pub type DynRunnable<I, O> = Arc<dyn Runnable<Input = I, Output = O>>;

pub fn to_dyn<R>(runnable: R) -> DynRunnable<R::Input, R::Output>
where
    R: Runnable + 'static,
{
    Arc::new(runnable)
}

fn short_type_name(full: &str) -> String {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

// =============================================================================
// RunnableLambda
// =============================================================================

/// The function wrapped by a [`RunnableLambda`].
#[allow(clippy::type_complexity)]
enum LambdaFn<I, O> {
    /// A function that only takes input.
    InputOnly(Box<dyn Fn(I) -> Result<O> + Send + Sync>),
    /// A function that takes input and the call's config.
    WithConfig(Box<dyn Fn(I, &RunnableConfig) -> Result<O> + Send + Sync>),
    /// An async function that only takes input.
    Async(Box<dyn Fn(I) -> BoxFuture<'static, Result<O>> + Send + Sync>),
}

/// Function-backed runnable.
///
/// Lifts a plain (sync or async) fallible function into the Runnable
/// contract so it can be embedded in a sequence, batched or streamed.
pub struct RunnableLambda<I, O>
where
    I: Send + Sync + Clone + Debug + 'static,
    O: Send + Sync + Clone + Debug + 'static,
{
    func: LambdaFn<I, O>,
    name: Option<String>,
}

impl<I, O> Debug for RunnableLambda<I, O>
where
    I: Send + Sync + Clone + Debug + 'static,
    O: Send + Sync + Clone + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.func {
            LambdaFn::InputOnly(_) => "sync",
            LambdaFn::WithConfig(_) => "sync_with_config",
            LambdaFn::Async(_) => "async",
        };
        f.debug_struct("RunnableLambda")
            .field("name", &self.name)
            .field("kind", &kind)
            .finish()
    }
}

impl<I, O> RunnableLambda<I, O>
where
    I: Send + Sync + Clone + Debug + 'static,
    O: Send + Sync + Clone + Debug + 'static,
{
    /// Lift a fallible sync function.
    pub fn new(func: impl Fn(I) -> Result<O> + Send + Sync + 'static) -> Self {
        Self {
            func: LambdaFn::InputOnly(Box::new(func)),
            name: None,
        }
    }

    /// Lift a sync function that also reads the call config.
    pub fn new_with_config(
        func: impl Fn(I, &RunnableConfig) -> Result<O> + Send + Sync + 'static,
    ) -> Self {
        Self {
            func: LambdaFn::WithConfig(Box::new(func)),
            name: None,
        }
    }

    /// Lift an async function.
    pub fn new_async<F, Fut>(func: F) -> Self
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O>> + Send + 'static,
    {
        Self {
            func: LambdaFn::Async(Box::new(move |input| Box::pin(func(input)))),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[async_trait]
impl<I, O> Runnable for RunnableLambda<I, O>
where
    I: Send + Sync + Clone + Debug + 'static,
    O: Send + Sync + Clone + Debug + 'static,
{
    type Input = I;
    type Output = O;

    fn name(&self) -> Option<String> {
        self.name.clone()
    }

    async fn invoke(&self, input: Self::Input, config: Option<RunnableConfig>) -> Result<Self::Output> {
        match &self.func {
            LambdaFn::InputOnly(func) => func(input),
            LambdaFn::WithConfig(func) => func(input, &ensure_config(config)),
            LambdaFn::Async(func) => func(input).await,
        }
    }
}

/// Shorthand for [`RunnableLambda::new`].
pub fn runnable_lambda<I, O>(
    func: impl Fn(I) -> Result<O> + Send + Sync + 'static,
) -> RunnableLambda<I, O>
where
    I: Send + Sync + Clone + Debug + 'static,
    O: Send + Sync + Clone + Debug + 'static,
{
    RunnableLambda::new(func)
}
