//! Content types for human messages.
//!
//! Content is plain text, a single image reference, or an ordered list of
//! text and image parts. Parts cannot themselves be multi-part.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::concat::{Concat, or_keep_left};

/// Image detail level for vision models.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageDetail {
    Low,
    High,
    #[default]
    Auto,
}

/// Reference to an image by URL (including `data:` URLs).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageReference {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<ImageDetail>,
}

impl ImageReference {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: ImageDetail) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// One part of a multi-part message content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    Image { image: ImageReference },
}

impl From<&str> for ContentPart {
    fn from(text: &str) -> Self {
        ContentPart::Text {
            text: text.to_string(),
        }
    }
}

impl From<String> for ContentPart {
    fn from(text: String) -> Self {
        ContentPart::Text { text }
    }
}

impl From<ImageReference> for ContentPart {
    fn from(image: ImageReference) -> Self {
        ContentPart::Image { image }
    }
}

/// Content of a human message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Image(ImageReference),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    pub fn text(text: impl Into<String>) -> Self {
        MessageContent::Text(text.into())
    }

    pub fn image(url: impl Into<String>) -> Self {
        MessageContent::Image(ImageReference::new(url))
    }

    /// Build multi-part content from single-part values.
    ///
    /// Fails with a configuration error if any part is itself multi-part.
    pub fn multi_part(parts: Vec<MessageContent>) -> Result<Self> {
        let parts = parts
            .into_iter()
            .enumerate()
            .map(|(index, part)| match part {
                MessageContent::Text(text) => Ok(ContentPart::Text { text }),
                MessageContent::Image(image) => Ok(ContentPart::Image { image }),
                MessageContent::Parts(_) => Err(Error::configuration(format!(
                    "multi-part content cannot nest: part {} is multi-part",
                    index
                ))),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(MessageContent::Parts(parts))
    }

    /// Name of the variant, used in diagnostics.
    pub fn variant_name(&self) -> &'static str {
        match self {
            MessageContent::Text(_) => "text",
            MessageContent::Image(_) => "image",
            MessageContent::Parts(_) => "multi_part",
        }
    }

    /// The text of this content; text parts are concatenated in order.
    pub fn as_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Image(_) => String::new(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::Image { .. } => None,
                })
                .collect(),
        }
    }

    /// Check if this content has any images.
    pub fn has_images(&self) -> bool {
        match self {
            MessageContent::Text(_) => false,
            MessageContent::Image(_) => true,
            MessageContent::Parts(parts) => {
                parts.iter().any(|p| matches!(p, ContentPart::Image { .. }))
            }
        }
    }

    /// Strict concatenation.
    ///
    /// Text and images merge into multi-part content as parts, and touching
    /// text parts are joined. Two single-part values of different kinds do
    /// not merge.
    pub fn try_concat(&self, other: &MessageContent) -> Result<MessageContent> {
        match (self, other) {
            (MessageContent::Text(left), MessageContent::Text(right)) => {
                Ok(MessageContent::Text(left.concat(right)))
            }
            (MessageContent::Parts(left), MessageContent::Parts(right)) => {
                Ok(MessageContent::Parts(join_parts(left, right)))
            }
            (MessageContent::Text(left), MessageContent::Parts(right)) => Ok(
                MessageContent::Parts(join_parts(&[ContentPart::from(left.as_str())], right)),
            ),
            (MessageContent::Parts(left), MessageContent::Text(right)) => Ok(
                MessageContent::Parts(join_parts(left, &[ContentPart::from(right.as_str())])),
            ),
            (MessageContent::Image(left), MessageContent::Parts(right)) => Ok(
                MessageContent::Parts(join_parts(&[ContentPart::from(left.clone())], right)),
            ),
            (MessageContent::Parts(left), MessageContent::Image(right)) => Ok(
                MessageContent::Parts(join_parts(left, &[ContentPart::from(right.clone())])),
            ),
            (left, right) => Err(Error::concatenation(
                left.variant_name(),
                right.variant_name(),
            )),
        }
    }
}

fn join_parts(left: &[ContentPart], right: &[ContentPart]) -> Vec<ContentPart> {
    let mut merged = left.to_vec();
    let mut rest = right.iter();

    if let (Some(ContentPart::Text { text: tail }), Some(ContentPart::Text { text: head })) =
        (merged.last_mut(), right.first())
    {
        tail.push_str(head);
        rest.next();
    }
    merged.extend(rest.cloned());
    merged
}

impl Concat for MessageContent {
    fn concat(&self, other: &Self) -> Self {
        or_keep_left(self, self.try_concat(other))
    }
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Text(String::new())
    }
}

impl From<String> for MessageContent {
    fn from(s: String) -> Self {
        MessageContent::Text(s)
    }
}

impl From<&str> for MessageContent {
    fn from(s: &str) -> Self {
        MessageContent::Text(s.to_string())
    }
}

impl From<ImageReference> for MessageContent {
    fn from(image: ImageReference) -> Self {
        MessageContent::Image(image)
    }
}

impl From<Vec<ContentPart>> for MessageContent {
    fn from(parts: Vec<ContentPart>) -> Self {
        MessageContent::Parts(parts)
    }
}
