//! The closed set of message roles and their concatenation.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::ai::AIMessage;
use super::concat::{Concat, or_keep_left};
use super::custom::CustomMessage;
use super::function::FunctionMessage;
use super::human::HumanMessage;
use super::system::SystemMessage;

/// A chat message of any role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BaseMessage {
    System(SystemMessage),
    Human(HumanMessage),
    #[serde(rename = "ai")]
    AI(AIMessage),
    Function(FunctionMessage),
    Custom(CustomMessage),
}

impl BaseMessage {
    /// The role tag of this message.
    pub fn message_type(&self) -> &'static str {
        match self {
            BaseMessage::System(_) => "system",
            BaseMessage::Human(_) => "human",
            BaseMessage::AI(_) => "ai",
            BaseMessage::Function(_) => "function",
            BaseMessage::Custom(_) => "custom",
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            BaseMessage::System(m) => m.id.as_deref(),
            BaseMessage::Human(m) => m.id.as_deref(),
            BaseMessage::AI(m) => m.id.as_deref(),
            BaseMessage::Function(m) => m.id.as_deref(),
            BaseMessage::Custom(m) => m.id.as_deref(),
        }
    }

    /// Text content of the message. Images in human content are skipped.
    pub fn text(&self) -> String {
        match self {
            BaseMessage::System(m) => m.content.clone(),
            BaseMessage::Human(m) => m.text(),
            BaseMessage::AI(m) => m.content.clone(),
            BaseMessage::Function(m) => m.content.clone(),
            BaseMessage::Custom(m) => m.content.clone(),
        }
    }

    pub fn as_ai(&self) -> Option<&AIMessage> {
        match self {
            BaseMessage::AI(m) => Some(m),
            _ => None,
        }
    }

    /// Strict concatenation.
    ///
    /// Fails with [`Error::Concatenation`] when the roles differ or when the
    /// role-specific merge rejects the pair.
    pub fn try_concat(&self, other: &BaseMessage) -> Result<BaseMessage> {
        match (self, other) {
            (BaseMessage::System(a), BaseMessage::System(b)) => Ok(BaseMessage::System(a.concat(b))),
            (BaseMessage::Human(a), BaseMessage::Human(b)) => a.try_concat(b).map(BaseMessage::Human),
            (BaseMessage::AI(a), BaseMessage::AI(b)) => Ok(BaseMessage::AI(a.concat(b))),
            (BaseMessage::Function(a), BaseMessage::Function(b)) => {
                a.try_concat(b).map(BaseMessage::Function)
            }
            (BaseMessage::Custom(a), BaseMessage::Custom(b)) => a.try_concat(b).map(BaseMessage::Custom),
            (a, b) => Err(Error::concatenation(a.message_type(), b.message_type())),
        }
    }
}

impl Concat for BaseMessage {
    fn concat(&self, other: &Self) -> Self {
        or_keep_left(self, self.try_concat(other))
    }
}

impl From<SystemMessage> for BaseMessage {
    fn from(message: SystemMessage) -> Self {
        BaseMessage::System(message)
    }
}

impl From<HumanMessage> for BaseMessage {
    fn from(message: HumanMessage) -> Self {
        BaseMessage::Human(message)
    }
}

impl From<AIMessage> for BaseMessage {
    fn from(message: AIMessage) -> Self {
        BaseMessage::AI(message)
    }
}

impl From<FunctionMessage> for BaseMessage {
    fn from(message: FunctionMessage) -> Self {
        BaseMessage::Function(message)
    }
}

impl From<CustomMessage> for BaseMessage {
    fn from(message: CustomMessage) -> Self {
        BaseMessage::Custom(message)
    }
}
