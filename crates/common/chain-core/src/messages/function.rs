//! Function-result message type.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::concat::{Concat, or_keep_left};

/// The result of executing a function, fed back to the model.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FunctionMessage {
    /// Name of the function that produced this result.
    pub name: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl FunctionMessage {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Strict concatenation; results of different functions do not merge.
    pub fn try_concat(&self, other: &Self) -> Result<Self> {
        if self.name != other.name {
            return Err(Error::concatenation(
                format!("function result '{}'", self.name),
                format!("function result '{}'", other.name),
            ));
        }
        Ok(Self {
            name: self.name.clone(),
            content: self.content.concat(&other.content),
            id: self.id.clone().or_else(|| other.id.clone()),
        })
    }
}

impl Concat for FunctionMessage {
    fn concat(&self, other: &Self) -> Self {
        or_keep_left(self, self.try_concat(other))
    }
}
