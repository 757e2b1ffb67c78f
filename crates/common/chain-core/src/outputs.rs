//! Model outputs and helpers for merging streamed chunks.

pub mod merge;
pub mod result;

pub use merge::{accumulate, collect_and_merge_stream, merge_chunks};
pub use result::{LanguageModelResult, TokenUsage};
