//! JSON shapes returned by the conversation endpoints.

use crate::error::{PollError, PollResult};
use crate::types::{
    ContentPart, ConversationSnapshot, ConversationSummary, MessageNode, NodeMessage, Role,
};
use serde::Deserialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

#[derive(Deserialize)]
pub struct ConversationList {
    #[serde(default)]
    pub items: Vec<ConversationItem>,
}

#[derive(Deserialize)]
pub struct ConversationItem {
    pub id: Option<String>,
    pub title: Option<String>,
    pub update_time: WireTimestamp,
}

#[derive(Deserialize)]
#[serde(untagged)]
pub enum WireTimestamp {
    Iso(String),
    Epoch(f64),
}

impl WireTimestamp {
    pub fn to_datetime(&self) -> PollResult<OffsetDateTime> {
        match self {
            WireTimestamp::Iso(raw) => OffsetDateTime::parse(raw, &Rfc3339)
                .map_err(|e| PollError::Timestamp(format!("{raw}: {e}"))),
            WireTimestamp::Epoch(secs) => {
                let nanos = (secs * 1_000_000_000.0) as i128;
                OffsetDateTime::from_unix_timestamp_nanos(nanos)
                    .map_err(|e| PollError::Timestamp(format!("{secs}: {e}")))
            }
        }
    }
}

#[derive(Deserialize)]
pub struct ConversationDetail {
    pub title: Option<String>,
    /// Kept as an ordered JSON map so iteration follows the API's listing.
    pub mapping: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Deserialize)]
pub struct WireNode {
    pub id: Option<String>,
    pub message: Option<WireMessage>,
    pub parent: Option<String>,
    #[serde(default)]
    pub children: Vec<String>,
}

#[derive(Deserialize)]
pub struct WireMessage {
    pub id: Option<String>,
    pub author: Option<WireAuthor>,
    pub create_time: Option<f64>,
    pub content: Option<WireContent>,
}

#[derive(Deserialize)]
pub struct WireAuthor {
    pub role: String,
}

#[derive(Deserialize)]
pub struct WireContent {
    pub parts: Option<Vec<WirePart>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
pub enum WirePart {
    Text(String),
    Structured {
        content_type: Option<String>,
        text: Option<String>,
    },
    Other(serde_json::Value),
}

impl From<WirePart> for ContentPart {
    fn from(part: WirePart) -> Self {
        match part {
            WirePart::Text(text) => ContentPart::Text(text),
            WirePart::Structured { content_type, text } => {
                ContentPart::Structured { content_type, text }
            }
            WirePart::Other(_) => ContentPart::Structured {
                content_type: None,
                text: None,
            },
        }
    }
}

impl ConversationList {
    pub fn into_latest(self) -> PollResult<Option<ConversationSummary>> {
        let Some(item) = self.items.into_iter().next() else {
            return Ok(None);
        };
        Ok(Some(ConversationSummary {
            id: item.id.unwrap_or_default(),
            title: item.title,
            update_time: item.update_time.to_datetime()?,
        }))
    }
}

impl ConversationDetail {
    pub fn into_snapshot(self) -> PollResult<ConversationSnapshot> {
        let mut nodes = Vec::new();
        for (key, value) in self.mapping.unwrap_or_default() {
            let node: WireNode = serde_json::from_value(value)?;
            nodes.push(node.into_node(key));
        }
        Ok(ConversationSnapshot {
            title: self.title,
            nodes,
        })
    }
}

impl WireNode {
    fn into_node(self, key: String) -> MessageNode {
        let node_id = self.id.unwrap_or(key);
        let message = self.message.map(|message| {
            let parts = message
                .content
                .and_then(|content| content.parts)
                .unwrap_or_default()
                .into_iter()
                .map(ContentPart::from)
                .collect();
            NodeMessage {
                id: message.id.unwrap_or_else(|| node_id.clone()),
                author_role: message
                    .author
                    .map(|author| Role::from(author.role.as_str()))
                    .unwrap_or_else(|| Role::Other(String::new())),
                parts,
                create_time: message.create_time,
            }
        });
        MessageNode {
            id: node_id,
            message,
            parent: self.parent,
            children: self.children,
        }
    }
}
