//! Remote conversation client
//!
//! Two read-only requests against the conversation history API: find the most
//! recently updated conversation, and fetch one conversation's message tree.
//!
//! # Architecture
//!
//! - `ConversationSource` - the seam the poller talks to
//! - `chatgpt` - reqwest implementation against the backend API
//! - `wire` - JSON shapes and their conversion into domain types

pub mod chatgpt;
pub mod wire;

use crate::error::PollResult;
use crate::types::{ConversationSnapshot, ConversationSummary};
use async_trait::async_trait;

pub use chatgpt::ChatGptClient;

#[async_trait]
pub trait ConversationSource: Send + Sync {
    /// The single most recently updated conversation, if any.
    async fn find_latest_conversation(
        &self,
        token: &str,
    ) -> PollResult<Option<ConversationSummary>>;

    /// The full message tree of conversation `id`.
    async fn fetch_conversation(&self, token: &str, id: &str) -> PollResult<ConversationSnapshot>;
}
