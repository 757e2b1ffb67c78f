//! Function-call fragments assembled token by token while streaming.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

use super::concat::Concat;

/// A possibly incomplete function invocation requested by a model.
///
/// `raw_arguments` is the byte-exact concatenation of every fragment seen
/// so far and is the authoritative source for the final arguments.
/// `arguments` is merged incrementally on a best-effort basis and may lag
/// behind `raw_arguments` until the stream ends.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FunctionCall {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub raw_arguments: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl FunctionCall {
    /// A fragment carrying part of the name and/or part of the raw arguments.
    pub fn fragment(name: impl Into<String>, raw_arguments: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw_arguments: raw_arguments.into(),
            arguments: Map::new(),
        }
    }

    /// A complete call whose raw arguments are the JSON encoding of
    /// `arguments`.
    pub fn complete(name: impl Into<String>, arguments: Map<String, Value>) -> Result<Self> {
        let raw_arguments = serde_json::to_string(&arguments)?;
        Ok(Self {
            name: name.into(),
            raw_arguments,
            arguments,
        })
    }

    pub fn with_arguments(mut self, arguments: Map<String, Value>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Parse `raw_arguments` as a JSON object.
    ///
    /// An empty string parses to an empty object. Incomplete JSON fails
    /// with [`Error::Json`].
    pub fn parse_arguments(&self) -> Result<Map<String, Value>> {
        if self.raw_arguments.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&self.raw_arguments)? {
            Value::Object(map) => Ok(map),
            other => Err(Error::execution(format!(
                "function arguments must be a JSON object, got {}",
                other
            ))),
        }
    }

    /// Whether `raw_arguments` is complete, parseable JSON.
    pub fn is_complete(&self) -> bool {
        self.parse_arguments().is_ok()
    }

    /// Replace `arguments` with the parsed `raw_arguments`.
    pub fn finalize(mut self) -> Result<Self> {
        self.arguments = self.parse_arguments()?;
        Ok(self)
    }
}

impl Concat for FunctionCall {
    fn concat(&self, other: &Self) -> Self {
        let mut arguments = self.arguments.clone();
        arguments.extend(other.arguments.clone());
        Self {
            name: self.name.concat(&other.name),
            raw_arguments: self.raw_arguments.concat(&other.raw_arguments),
            arguments,
        }
    }
}
