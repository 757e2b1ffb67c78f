//! Runnables: the composable unit of work and its adapters.

pub mod base;
pub mod batch;
pub mod binding;
pub mod config;
pub mod map;
pub mod passthrough;
pub mod sequence;

pub use base::{DynRunnable, Runnable, RunnableLambda, runnable_lambda, to_dyn};
pub use batch::{BatchExecutor, batch_invoke, batch_invoke_results};
pub use binding::{RunnableBinding, RunnableEach};
pub use config::{
    ConfigOrList, RunnableConfig, ensure_config, get_config_list, merge_configs, patch_config,
};
pub use map::{RunnableMap, map_input, map_output};
pub use passthrough::RunnablePassthrough;
pub use sequence::{RunnableSequence, pipe};
