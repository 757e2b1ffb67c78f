//! AI message type.

use bon::bon;
use serde::{Deserialize, Serialize};

use super::concat::Concat;
use super::function_call::FunctionCall;

/// A message produced by a model: text content and an optional request to
/// call a function.
///
/// While streaming, each chunk is an `AIMessage` holding a fragment of the
/// content and/or a fragment of the function call; folding the chunks with
/// [`Concat`] rebuilds the full message.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AIMessage {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
}

#[bon]
impl AIMessage {
    #[builder]
    pub fn new(
        #[builder(into, default)] content: String,
        #[builder(into)] id: Option<String>,
        function_call: Option<FunctionCall>,
    ) -> Self {
        Self {
            content,
            id,
            function_call,
        }
    }

    pub fn text(&self) -> &str {
        &self.content
    }
}

impl Concat for AIMessage {
    fn concat(&self, other: &Self) -> Self {
        let function_call = match (&self.function_call, &other.function_call) {
            (Some(left), Some(right)) => Some(left.concat(right)),
            (left, right) => left.clone().or_else(|| right.clone()),
        };
        Self {
            content: self.content.concat(&other.content),
            id: self.id.clone().or_else(|| other.id.clone()),
            function_call,
        }
    }
}
