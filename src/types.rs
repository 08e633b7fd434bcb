use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
    #[serde(untagged)]
    Other(String),
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        match value {
            "system" => Role::System,
            "user" => Role::User,
            "assistant" => Role::Assistant,
            "tool" => Role::Tool,
            other => Role::Other(other.to_string()),
        }
    }
}

/// The most recently updated conversation, as reported by the list endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct ConversationSummary {
    pub id: String,
    pub title: Option<String>,
    pub update_time: OffsetDateTime,
}

/// One entry of a message's `content.parts` list.
#[derive(Clone, Debug, PartialEq)]
pub enum ContentPart {
    Text(String),
    /// Audio transcriptions, image pointers and the like.
    Structured {
        content_type: Option<String>,
        text: Option<String>,
    },
}

impl ContentPart {
    pub fn text(&self) -> &str {
        match self {
            ContentPart::Text(text) => text,
            ContentPart::Structured { text, .. } => text.as_deref().unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeMessage {
    pub id: String,
    pub author_role: Role,
    pub parts: Vec<ContentPart>,
    pub create_time: Option<f64>,
}

impl NodeMessage {
    /// Text of the first content part, empty when there is none.
    pub fn first_text(&self) -> &str {
        self.parts.first().map(ContentPart::text).unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MessageNode {
    pub id: String,
    /// Tree roots carry no message.
    pub message: Option<NodeMessage>,
    pub parent: Option<String>,
    pub children: Vec<String>,
}

/// Full state of one conversation's message tree at fetch time.
///
/// `nodes` keeps the order in which the API listed its mapping entries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConversationSnapshot {
    pub title: Option<String>,
    pub nodes: Vec<MessageNode>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "text", rename_all = "lowercase")]
pub enum Translation {
    #[default]
    Pending,
    Done(String),
    Unavailable,
}

impl Translation {
    pub fn label(&self) -> &str {
        match self {
            Translation::Pending => "loading...",
            Translation::Done(text) => text,
            Translation::Unavailable => "",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayedMessage {
    pub id: String,
    pub text: String,
    pub is_user: bool,
    pub create_time: Option<f64>,
    pub translation: Translation,
}
