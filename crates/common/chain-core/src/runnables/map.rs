//! Pure input/output mapping adapters.

use std::fmt::Debug;
use std::marker::PhantomData;

use async_trait::async_trait;

use crate::error::Result;

use super::base::Runnable;
use super::config::RunnableConfig;

/// A Runnable that applies a pure, infallible, synchronous transform.
///
/// Used to reshape a pipeline's input before it reaches a templating or
/// model unit, or to reshape a unit's output afterwards. Holds no state
/// between calls.
pub struct RunnableMap<F, I, O>
where
    F: Fn(I) -> O + Send + Sync,
    I: Send + Sync + Clone + Debug + 'static,
    O: Send + Sync + Clone + Debug + 'static,
{
    func: F,
    name: Option<String>,
    _phantom: PhantomData<fn(I) -> O>,
}

impl<F, I, O> Debug for RunnableMap<F, I, O>
where
    F: Fn(I) -> O + Send + Sync,
    I: Send + Sync + Clone + Debug + 'static,
    O: Send + Sync + Clone + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunnableMap")
            .field("name", &self.name)
            .finish()
    }
}

impl<F, I, O> RunnableMap<F, I, O>
where
    F: Fn(I) -> O + Send + Sync,
    I: Send + Sync + Clone + Debug + 'static,
    O: Send + Sync + Clone + Debug + 'static,
{
    pub fn new(func: F) -> Self {
        Self {
            func,
            name: None,
            _phantom: PhantomData,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[async_trait]
impl<F, I, O> Runnable for RunnableMap<F, I, O>
where
    F: Fn(I) -> O + Send + Sync,
    I: Send + Sync + Clone + Debug + 'static,
    O: Send + Sync + Clone + Debug + 'static,
{
    type Input = I;
    type Output = O;

    fn name(&self) -> Option<String> {
        self.name.clone()
    }

    async fn invoke(&self, input: Self::Input, _config: Option<RunnableConfig>) -> Result<Self::Output> {
        Ok((self.func)(input))
    }
}

/// Lift a transform of the pipeline input into a Runnable.
pub fn map_input<F, I, O>(func: F) -> RunnableMap<F, I, O>
where
    F: Fn(I) -> O + Send + Sync,
    I: Send + Sync + Clone + Debug + 'static,
    O: Send + Sync + Clone + Debug + 'static,
{
    RunnableMap::new(func).with_name("map_input")
}

/// Lift a transform of a unit's output into a Runnable.
pub fn map_output<F, I, O>(func: F) -> RunnableMap<F, I, O>
where
    F: Fn(I) -> O + Send + Sync,
    I: Send + Sync + Clone + Debug + 'static,
    O: Send + Sync + Clone + Debug + 'static,
{
    RunnableMap::new(func).with_name("map_output")
}
