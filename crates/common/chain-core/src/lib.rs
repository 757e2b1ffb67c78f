//! Chain Core - composable units of work over typed inputs and outputs.
//!
//! This crate provides:
//! - The [`Runnable`] trait with three execution modes: `invoke`, `batch`
//!   and `stream`
//! - Composition adapters: sequences, function lifting, input and output
//!   mapping, config binding
//! - A batch executor with ordered results and optional concurrency caps
//! - Chat message and generation types whose streamed chunks fold back
//!   into one value through [`Concat`]
//!
//! # Architecture
//!
//! - **Runnable layer** ([`runnables`]): the trait, its adapters and the
//!   config passed down every call
//! - **Message layer** ([`messages`]): roles, content and function-call
//!   fragments, plus the concatenation algebra
//! - **Output layer** ([`outputs`]): generation results and stream folding
//! - **Model layer** ([`language_models`]): fake models for tests

pub mod error;
pub mod language_models;
pub mod messages;
pub mod outputs;
pub mod runnables;

// Re-export error types
pub use error::{Error, Result};

// Re-export fake models
pub use language_models::{FakeFunctionCallModel, FakeListChatModel};

// Re-export message types
pub use messages::{
    AIMessage, BaseMessage, Concat, ContentPart, CustomMessage, FunctionCall, FunctionMessage,
    HumanMessage, ImageDetail, ImageReference, MessageContent, SystemMessage,
};

// Re-export output types
pub use outputs::{
    LanguageModelResult, TokenUsage, accumulate, collect_and_merge_stream, merge_chunks,
};

// Re-export runnable types
pub use runnables::{
    BatchExecutor, ConfigOrList, DynRunnable, Runnable, RunnableBinding, RunnableConfig,
    RunnableEach, RunnableLambda, RunnableMap, RunnablePassthrough, RunnableSequence,
    ensure_config, get_config_list, map_input, map_output, merge_configs, patch_config, pipe,
    runnable_lambda, to_dyn,
};

// Re-export async_trait for implementors of Runnable
pub use async_trait::async_trait;
