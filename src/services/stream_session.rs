// Stream Session
// Follows one assistant message's text stream, applying each theme update exactly once

use std::collections::HashSet;

use serde::Serialize;

use crate::models::{StreamSnapshot, StreamStatus, StreamView, ThemeUpdateSummary};
use crate::services::theme_store::TokenStore;
use crate::services::theme_updates::{apply_theme_update_payload, MarkerScanner};

/// What changed during one [`StreamSession::observe`] call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamObservation {
    pub clean_text: String,
    pub status: Option<StreamStatus>,
    /// Summaries applied by this call only
    pub applied: Vec<ThemeUpdateSummary>,
    /// True on the single observation that first saw a terminal status
    pub finished: bool,
}

#[derive(Debug, Default)]
pub struct StreamSession {
    stream_id: Option<String>,
    status: Option<StreamStatus>,
    scanner: MarkerScanner,
    clean_text: String,
    seen_len: usize,
    applied_ids: HashSet<String>,
    summaries: Vec<ThemeUpdateSummary>,
    finished: bool,
}

impl StreamSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stream_id(&self) -> Option<&str> {
        self.stream_id.as_deref()
    }

    /// Follow `stream_id`. A different id starts over with no applied ids,
    /// no summaries and an empty buffer.
    pub fn attach(&mut self, stream_id: &str) {
        if self.stream_id.as_deref() == Some(stream_id) {
            return;
        }
        *self = Self {
            stream_id: Some(stream_id.to_string()),
            status: Some(StreamStatus::Pending),
            ..Self::default()
        };
    }

    /// Process the latest state of the attached stream.
    ///
    /// Text is scanned while streaming and once done. Pending streams and
    /// empty text are skipped. Once a terminal status has been seen nothing
    /// further is processed; updates applied before it stay applied.
    /// Stale snapshots (shorter text or an earlier status) are ignored.
    pub fn observe(&mut self, snapshot: &StreamSnapshot, store: &dyn TokenStore) -> StreamObservation {
        if self.stream_id.is_none() {
            return StreamObservation::default();
        }
        if self.finished {
            return self.observation(Vec::new(), false);
        }
        let regressed = self
            .status
            .is_some_and(|current| progress(snapshot.status) < progress(current));
        if regressed || snapshot.text.len() < self.seen_len {
            log::debug!(
                "Ignoring stale {} snapshot for stream {}",
                snapshot.status.as_str(),
                self.stream_id.as_deref().unwrap_or_default()
            );
            return self.observation(Vec::new(), false);
        }

        self.status = Some(snapshot.status);
        let mut applied = Vec::new();

        let scannable = matches!(snapshot.status, StreamStatus::Streaming | StreamStatus::Done);
        if scannable && !snapshot.text.is_empty() {
            let update = self.scanner.scan(&snapshot.text);
            self.clean_text = update.clean_text;
            self.seen_len = snapshot.text.len();
            for payload in &update.new_payloads {
                if let Some(summary) = apply_theme_update_payload(payload, store, &mut self.applied_ids) {
                    applied.push(summary);
                }
            }
            self.summaries.extend(applied.iter().cloned());
        }

        let finished = snapshot.status.is_terminal() && !self.finished;
        if finished {
            self.finished = true;
            log::info!(
                "Stream {} finished ({}) with {} theme update(s)",
                self.stream_id.as_deref().unwrap_or_default(),
                snapshot.status.as_str(),
                self.summaries.len()
            );
        }

        self.observation(applied, finished)
    }

    /// Every summary applied for this message, oldest first.
    pub fn summaries(&self) -> &[ThemeUpdateSummary] {
        &self.summaries
    }

    pub fn view(&self) -> StreamView {
        StreamView {
            stream_id: self.stream_id.clone(),
            status: self.status,
            clean_text: self.clean_text.clone(),
            summaries: self.summaries.clone(),
        }
    }

    fn observation(&self, applied: Vec<ThemeUpdateSummary>, finished: bool) -> StreamObservation {
        StreamObservation {
            clean_text: self.clean_text.clone(),
            status: self.status,
            applied,
            finished,
        }
    }
}

fn progress(status: StreamStatus) -> u8 {
    match status {
        StreamStatus::Pending => 0,
        StreamStatus::Streaming => 1,
        StreamStatus::Done | StreamStatus::Error => 2,
    }
}
