//! Message with an arbitrary role.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::concat::{Concat, or_keep_left};

/// A message whose role is not one of the built-in ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CustomMessage {
    pub role: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl CustomMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Strict concatenation; messages with different roles do not merge.
    pub fn try_concat(&self, other: &Self) -> Result<Self> {
        if self.role != other.role {
            return Err(Error::concatenation(
                format!("role '{}'", self.role),
                format!("role '{}'", other.role),
            ));
        }
        Ok(Self {
            role: self.role.clone(),
            content: self.content.concat(&other.content),
            id: self.id.clone().or_else(|| other.id.clone()),
        })
    }
}

impl Concat for CustomMessage {
    fn concat(&self, other: &Self) -> Self {
        or_keep_left(self, self.try_concat(other))
    }
}
