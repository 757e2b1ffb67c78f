//! The generation result returned by language models.

use std::collections::HashMap;

use bon::bon;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::messages::concat::{Concat, impl_add_via_concat, or_keep_left};
use crate::messages::{AIMessage, BaseMessage};

/// Token counts reported by a model. Unknown counts are `None`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenUsage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens: Some(prompt_tokens),
            completion_tokens: Some(completion_tokens),
            total_tokens: Some(prompt_tokens + completion_tokens),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.prompt_tokens.is_none() && self.completion_tokens.is_none() && self.total_tokens.is_none()
    }
}

impl Concat for TokenUsage {
    /// Later reports win; fields missing on the right keep the left value.
    fn concat(&self, other: &Self) -> Self {
        Self {
            prompt_tokens: other.prompt_tokens.or(self.prompt_tokens),
            completion_tokens: other.completion_tokens.or(self.completion_tokens),
            total_tokens: other.total_tokens.or(self.total_tokens),
        }
    }
}

/// One model generation, or one streamed chunk of it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LanguageModelResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub output: BaseMessage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
    #[serde(default, skip_serializing_if = "TokenUsage::is_empty")]
    pub usage: TokenUsage,
    /// Whether this value is a streamed chunk rather than a complete result.
    #[serde(default)]
    pub streaming: bool,
}

#[bon]
impl LanguageModelResult {
    #[builder]
    pub fn new(
        #[builder(into)] output: BaseMessage,
        #[builder(into)] id: Option<String>,
        #[builder(into)] finish_reason: Option<String>,
        #[builder(default)] metadata: HashMap<String, Value>,
        #[builder(default)] usage: TokenUsage,
        #[builder(default)] streaming: bool,
    ) -> Self {
        Self {
            id,
            output,
            finish_reason,
            metadata,
            usage,
            streaming,
        }
    }

    /// Text of the output message.
    pub fn text(&self) -> String {
        self.output.text()
    }

    /// The output as an AI message, if it is one.
    pub fn message(&self) -> Option<&AIMessage> {
        self.output.as_ai()
    }

    /// Strict concatenation; fails only if the output messages cannot merge.
    pub fn try_concat(&self, other: &Self) -> Result<Self> {
        let mut metadata = self.metadata.clone();
        metadata.extend(other.metadata.clone());
        Ok(Self {
            id: other.id.clone().or_else(|| self.id.clone()),
            output: self.output.try_concat(&other.output)?,
            finish_reason: other.finish_reason.clone().or_else(|| self.finish_reason.clone()),
            metadata,
            usage: self.usage.concat(&other.usage),
            streaming: other.streaming,
        })
    }
}

impl Concat for LanguageModelResult {
    fn concat(&self, other: &Self) -> Self {
        or_keep_left(self, self.try_concat(other))
    }
}

impl_add_via_concat!(LanguageModelResult);
