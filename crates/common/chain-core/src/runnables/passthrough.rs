//! A Runnable that passes its input through unchanged.

use std::fmt::Debug;
use std::marker::PhantomData;

use async_trait::async_trait;

use crate::error::Result;

use super::base::Runnable;
use super::config::RunnableConfig;

/// Returns its input unchanged. Useful as an echo link in a sequence.
pub struct RunnablePassthrough<T> {
    name: Option<String>,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Debug for RunnablePassthrough<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunnablePassthrough")
            .field("name", &self.name)
            .finish()
    }
}

impl<T> RunnablePassthrough<T> {
    pub fn new() -> Self {
        Self {
            name: None,
            _phantom: PhantomData,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl<T> Default for RunnablePassthrough<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> Runnable for RunnablePassthrough<T>
where
    T: Send + Sync + Clone + Debug + 'static,
{
    type Input = T;
    type Output = T;

    fn name(&self) -> Option<String> {
        self.name.clone()
    }

    async fn invoke(&self, input: Self::Input, _config: Option<RunnableConfig>) -> Result<Self::Output> {
        Ok(input)
    }
}
