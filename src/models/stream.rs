use serde::{Deserialize, Serialize};

use super::theme_update::ThemeUpdateSummary;

/// Lifecycle of an assistant text stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamStatus {
    Pending,
    Streaming,
    Done,
    Error,
}

impl StreamStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamStatus::Pending => "pending",
            StreamStatus::Streaming => "streaming",
            StreamStatus::Done => "done",
            StreamStatus::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamStatus::Done | StreamStatus::Error)
    }
}

/// Point-in-time view of a stream: the accumulated text so far and its status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamSnapshot {
    pub text: String,
    pub status: StreamStatus,
}

/// What the client renders for one assistant message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamView {
    pub stream_id: Option<String>,
    /// `None` until a stream id is attached
    pub status: Option<StreamStatus>,
    pub clean_text: String,
    /// Every summary applied for this message, oldest first
    pub summaries: Vec<ThemeUpdateSummary>,
}
