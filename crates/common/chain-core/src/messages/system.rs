//! System message type.

use serde::{Deserialize, Serialize};

use super::concat::Concat;

/// Instructions that prime model behavior, usually the first message of a
/// conversation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SystemMessage {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl SystemMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            id: None,
        }
    }

    /// Create a system message with an explicit ID.
    pub fn with_id(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            id: Some(id.into()),
        }
    }
}

impl Concat for SystemMessage {
    fn concat(&self, other: &Self) -> Self {
        Self {
            content: self.content.concat(&other.content),
            id: self.id.clone().or_else(|| other.id.clone()),
        }
    }
}
