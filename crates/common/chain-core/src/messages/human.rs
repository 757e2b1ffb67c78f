//! Human message type.

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::concat::{Concat, or_keep_left};
use super::content::MessageContent;

/// A message from the user. Content may carry images.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HumanMessage {
    pub content: MessageContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl HumanMessage {
    /// Create a human message with simple text content.
    pub fn new(content: impl Into<String>) -> Self {
        Self::with_content(MessageContent::Text(content.into()))
    }

    /// Create a human message with any content variant.
    pub fn with_content(content: impl Into<MessageContent>) -> Self {
        Self {
            content: content.into(),
            id: None,
            name: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The text of this message, ignoring images.
    pub fn text(&self) -> String {
        self.content.as_text()
    }

    /// Strict concatenation; fails when the contents cannot be merged.
    pub fn try_concat(&self, other: &Self) -> Result<Self> {
        Ok(Self {
            content: self.content.try_concat(&other.content)?,
            id: self.id.clone().or_else(|| other.id.clone()),
            name: self.name.clone().or_else(|| other.name.clone()),
        })
    }
}

impl Concat for HumanMessage {
    fn concat(&self, other: &Self) -> Self {
        or_keep_left(self, self.try_concat(other))
    }
}
