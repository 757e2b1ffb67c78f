//! Fake chat models that replay canned responses.
//!
//! They implement [`Runnable`] over a list of messages and stream their
//! output in small chunks, so they stand in for a real model backend in
//! tests and documentation.

use std::sync::LazyLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_stream::stream;
use async_trait::async_trait;
use futures::stream::BoxStream;
use regex::Regex;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::messages::{AIMessage, BaseMessage, FunctionCall};
use crate::outputs::{LanguageModelResult, TokenUsage};
use crate::runnables::{Runnable, RunnableConfig, ensure_config};

static WHITESPACE: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"(\s)"));

/// Split `text` into words and the single whitespace characters between
/// them. Concatenating the parts gives back `text` exactly.
fn split_tokens(text: &str) -> Result<Vec<String>> {
    let re = WHITESPACE
        .as_ref()
        .map_err(|e| Error::other(format!("Regex error: {}", e)))?;

    let mut parts = Vec::new();
    let mut last = 0;
    for m in re.find_iter(text) {
        if m.start() > last {
            parts.push(text[last..m.start()].to_string());
        }
        parts.push(m.as_str().to_string());
        last = m.end();
    }
    if last < text.len() {
        parts.push(text[last..].to_string());
    }
    Ok(parts)
}

/// Split serialized arguments on commas, keeping each comma as its own part.
fn split_arguments(raw: &str) -> Vec<String> {
    let segments: Vec<&str> = raw.split(',').collect();
    let mut parts = Vec::new();
    for (i, segment) in segments.iter().enumerate() {
        if !segment.is_empty() {
            parts.push(segment.to_string());
        }
        if i < segments.len() - 1 {
            parts.push(",".to_string());
        }
    }
    parts
}

fn result_id(config: &RunnableConfig) -> String {
    format!("run-{}", config.run_id.unwrap_or_else(Uuid::new_v4))
}

fn count_words(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

fn prompt_tokens(messages: &[BaseMessage]) -> u64 {
    messages.iter().map(|m| count_words(&m.text())).sum()
}

/// Replays a fixed list of responses in order, wrapping around at the end.
#[derive(Debug)]
pub struct FakeListChatModel {
    responses: Vec<String>,
    sleep: Option<Duration>,
    index: AtomicUsize,
    error_on_chunk_number: Option<usize>,
    name: Option<String>,
}

impl Clone for FakeListChatModel {
    fn clone(&self) -> Self {
        Self {
            responses: self.responses.clone(),
            sleep: self.sleep,
            index: AtomicUsize::new(self.index.load(Ordering::SeqCst)),
            error_on_chunk_number: self.error_on_chunk_number,
            name: self.name.clone(),
        }
    }
}

impl FakeListChatModel {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses,
            sleep: None,
            index: AtomicUsize::new(0),
            error_on_chunk_number: None,
            name: None,
        }
    }

    /// Delay every invocation and every streamed chunk.
    pub fn with_sleep(mut self, duration: Duration) -> Self {
        self.sleep = Some(duration);
        self
    }

    /// Fail the stream when chunk `chunk_number` (zero based) is due.
    pub fn with_error_on_chunk(mut self, chunk_number: usize) -> Self {
        self.error_on_chunk_number = Some(chunk_number);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Index of the response the next call will return.
    pub fn current_index(&self) -> usize {
        match self.responses.len() {
            0 => 0,
            len => self.index.load(Ordering::SeqCst) % len,
        }
    }

    pub fn reset(&self) {
        self.index.store(0, Ordering::SeqCst);
    }

    fn next_response(&self) -> Result<String> {
        if self.responses.is_empty() {
            return Err(Error::configuration(
                "FakeListChatModel needs at least one response",
            ));
        }
        let i = self.index.fetch_add(1, Ordering::SeqCst) % self.responses.len();
        Ok(self.responses[i].clone())
    }
}

#[async_trait]
impl Runnable for FakeListChatModel {
    type Input = Vec<BaseMessage>;
    type Output = LanguageModelResult;

    fn name(&self) -> Option<String> {
        self.name.clone()
    }

    async fn invoke(
        &self,
        input: Self::Input,
        config: Option<RunnableConfig>,
    ) -> Result<Self::Output> {
        let config = ensure_config(config);
        let response = self.next_response()?;
        if let Some(duration) = self.sleep {
            tokio::time::sleep(duration).await;
        }

        let id = result_id(&config);
        let usage = TokenUsage::new(prompt_tokens(&input), count_words(&response));
        Ok(LanguageModelResult::builder()
            .output(AIMessage::builder().content(response).id(id.clone()).build())
            .id(id)
            .finish_reason("stop")
            .usage(usage)
            .build())
    }

    fn stream(
        &self,
        input: Self::Input,
        config: Option<RunnableConfig>,
    ) -> BoxStream<'_, Result<Self::Output>> {
        let config = ensure_config(config);
        let response = self.next_response();
        let sleep = self.sleep;
        let error_on_chunk = self.error_on_chunk_number;
        let id = result_id(&config);
        let prompt = prompt_tokens(&input);

        Box::pin(stream! {
            let response = match response {
                Ok(response) => response,
                Err(err) => {
                    yield Err(err);
                    return;
                }
            };
            let mut tokens = match split_tokens(&response) {
                Ok(tokens) => tokens,
                Err(err) => {
                    yield Err(err);
                    return;
                }
            };
            if tokens.is_empty() {
                tokens.push(String::new());
            }

            let usage = TokenUsage::new(prompt, count_words(&response));
            let num_chunks = tokens.len();
            for (idx, token) in tokens.into_iter().enumerate() {
                if let Some(duration) = sleep {
                    tokio::time::sleep(duration).await;
                }
                if error_on_chunk == Some(idx) {
                    yield Err(Error::execution(format!("FakeListChatModel failed at chunk {}", idx)));
                    return;
                }

                let mut chunk = LanguageModelResult::builder()
                    .output(AIMessage::builder().content(token).id(id.clone()).build())
                    .id(id.clone())
                    .streaming(true)
                    .build();
                if idx == num_chunks - 1 {
                    chunk.finish_reason = Some("stop".to_string());
                    chunk.usage = usage;
                }
                yield Ok(chunk);
            }
        })
    }
}

/// Always asks for the same function call. Streams the call with the name
/// in the first chunk and the serialized arguments split on commas.
#[derive(Debug, Clone)]
pub struct FakeFunctionCallModel {
    function_name: String,
    arguments: Map<String, Value>,
}

impl FakeFunctionCallModel {
    pub fn new(function_name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            function_name: function_name.into(),
            arguments,
        }
    }
}

#[async_trait]
impl Runnable for FakeFunctionCallModel {
    type Input = Vec<BaseMessage>;
    type Output = LanguageModelResult;

    async fn invoke(
        &self,
        _input: Self::Input,
        config: Option<RunnableConfig>,
    ) -> Result<Self::Output> {
        let config = ensure_config(config);
        let call = FunctionCall::complete(self.function_name.clone(), self.arguments.clone())?;
        Ok(LanguageModelResult::builder()
            .output(AIMessage::builder().function_call(call).build())
            .id(result_id(&config))
            .finish_reason("function_call")
            .build())
    }

    fn stream(
        &self,
        _input: Self::Input,
        config: Option<RunnableConfig>,
    ) -> BoxStream<'_, Result<Self::Output>> {
        let config = ensure_config(config);
        let id = result_id(&config);
        let function_name = self.function_name.clone();
        let arguments = self.arguments.clone();

        Box::pin(stream! {
            let raw = match serde_json::to_string(&arguments) {
                Ok(raw) => raw,
                Err(err) => {
                    yield Err(Error::from(err));
                    return;
                }
            };
            let fragments = split_arguments(&raw);
            let num_chunks = fragments.len();

            for (idx, fragment) in fragments.into_iter().enumerate() {
                let name = if idx == 0 { function_name.as_str() } else { "" };
                let mut call = FunctionCall::fragment(name, fragment);
                let mut finish_reason = None;
                if idx == num_chunks - 1 {
                    call = call.with_arguments(arguments.clone());
                    finish_reason = Some("function_call");
                }
                yield Ok(LanguageModelResult::builder()
                    .output(AIMessage::builder().function_call(call).build())
                    .id(id.clone())
                    .maybe_finish_reason(finish_reason)
                    .streaming(true)
                    .build());
            }
        })
    }
}
