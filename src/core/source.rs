//! Engagement source: where scores and comments come from

use async_trait::async_trait;
use crate::types::{Comment, SeenComments, MonitorResult};

/// A content platform that can report on one thread
#[async_trait]
pub trait EngagementSource: Send + Sync {
    /// Current aggregate score of the thread
    async fn fetch_score(&self, thread_id: &str) -> MonitorResult<i64>;

    /// Comments on the thread whose ids are not in `seen`
    async fn fetch_new_comments(&self, thread_id: &str, seen: &SeenComments) -> MonitorResult<Vec<Comment>>;

    /// Human-readable title, for the startup banner
    async fn thread_title(&self, thread_id: &str) -> MonitorResult<String> {
        Ok(thread_id.to_string())
    }
}
