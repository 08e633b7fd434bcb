//! Message reconciliation
//!
//! Computes which messages of a freshly fetched snapshot have not been shown
//! yet. Emission follows the snapshot's mapping order, not `create_time`; the
//! API does not promise that order is chronological, so display layers that
//! care can call [`sort_chronologically`].

use crate::types::{ConversationSnapshot, DisplayedMessage, Role, Translation};
use std::collections::HashSet;

/// Ids already surfaced for the current conversation attachment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeenIds {
    order: Vec<String>,
    index: HashSet<String>,
}

impl SeenIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains(id)
    }

    /// Returns false when the id was already present.
    pub fn insert(&mut self, id: &str) -> bool {
        if !self.index.insert(id.to_string()) {
            return false;
        }
        self.order.push(id.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.index.clear();
    }
}

/// New, non-system messages of `snapshot`, recording each emitted id in `seen`.
pub fn reconcile(snapshot: &ConversationSnapshot, seen: &mut SeenIds) -> Vec<DisplayedMessage> {
    let mut fresh = Vec::new();
    for node in &snapshot.nodes {
        let Some(message) = &node.message else {
            continue;
        };
        if message.author_role == Role::System {
            continue;
        }
        if !seen.insert(&message.id) {
            continue;
        }
        fresh.push(DisplayedMessage {
            id: message.id.clone(),
            text: message.first_text().to_string(),
            is_user: message.author_role == Role::User,
            create_time: message.create_time,
            translation: Translation::Pending,
        });
    }
    fresh
}

/// Stable sort by `create_time`; messages without one keep their place at the front.
pub fn sort_chronologically(messages: &mut [DisplayedMessage]) {
    messages.sort_by(|a, b| {
        let a = a.create_time.unwrap_or(f64::MIN);
        let b = b.create_time.unwrap_or(f64::MIN);
        a.total_cmp(&b)
    });
}
