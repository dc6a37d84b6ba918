// Stream Commands
// Feed assistant text streams and apply the theme updates they carry

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde_json::Value;

use crate::commands::theme::emit_theme_changed;
use crate::models::{StreamSnapshot, StreamStatus, StreamView, ThemeUpdateSummary};
use crate::services::{
    emit_event, theme_update_marker, EventSink, StreamObservation, StreamSession,
    TextStreamRegistry, ThemeStore, ThemeUpdateArgs, STREAM_FINISHED_EVENT,
    THEME_UPDATE_APPLIED_EVENT,
};

/// One [`StreamSession`] per stream id
pub type StreamSessions = Mutex<HashMap<String, StreamSession>>;

/// Everything a stream command touches
pub struct StreamContext<'a> {
    pub registry: &'a TextStreamRegistry,
    pub sessions: &'a StreamSessions,
    pub store: &'a ThemeStore,
    pub events: &'a dyn EventSink,
}

/// Payload of the `stream_finished` event
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamFinished {
    pub stream_id: String,
    pub status: StreamStatus,
    pub summaries: Vec<ThemeUpdateSummary>,
}

/// Result of a validated `updateThemeTokens` tool call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    pub tool_call_id: String,
    pub message: String,
    pub observation: StreamObservation,
}

impl StreamContext<'_> {
    /// Mutate the registry and observe the result under the sessions lock,
    /// so sessions see snapshots in the order the registry produced them.
    fn advance<F>(&self, stream_id: &str, mutate: F) -> Result<StreamObservation, String>
    where
        F: FnOnce(&TextStreamRegistry) -> Result<StreamSnapshot, String>,
    {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = mutate(self.registry)?;

        let session = sessions.entry(stream_id.to_string()).or_insert_with(|| {
            let mut session = StreamSession::new();
            session.attach(stream_id);
            session
        });
        let observation = session.observe(&snapshot, self.store);

        for summary in &observation.applied {
            emit_event(self.events, THEME_UPDATE_APPLIED_EVENT, summary);
            emit_theme_changed(self.store, self.events, summary.target_mode);
        }
        if observation.finished {
            if let Some(status) = observation.status {
                emit_event(
                    self.events,
                    STREAM_FINISHED_EVENT,
                    &StreamFinished {
                        stream_id: stream_id.to_string(),
                        status,
                        summaries: session.summaries().to_vec(),
                    },
                );
            }
        }

        Ok(observation)
    }
}

pub fn create_stream(ctx: &StreamContext<'_>) -> String {
    let stream_id = ctx.registry.create();
    let mut session = StreamSession::new();
    session.attach(&stream_id);
    ctx.sessions
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(stream_id.clone(), session);
    stream_id
}

/// Forget a stream's text and session. Clients call this once they no
/// longer need the stream view.
pub fn delete_stream(ctx: &StreamContext<'_>, stream_id: &str) -> Result<(), String> {
    let mut sessions = ctx.sessions.lock().unwrap_or_else(PoisonError::into_inner);
    let session = sessions.remove(stream_id);
    let stream = ctx.registry.remove(stream_id);
    if session.is_none() && stream.is_none() {
        return Err(format!("Stream not found: {stream_id}"));
    }
    log::debug!("Deleted stream {stream_id}");
    Ok(())
}

pub fn append_stream_text(
    ctx: &StreamContext<'_>,
    stream_id: &str,
    chunk: &str,
) -> Result<StreamObservation, String> {
    ctx.advance(stream_id, |registry| registry.append(stream_id, chunk))
}

/// Validate raw `updateThemeTokens` input and append its marker to the
/// stream. Invalid input leaves the stream untouched.
pub fn append_tool_call(
    ctx: &StreamContext<'_>,
    stream_id: &str,
    tool_call_id: Option<String>,
    input: &Value,
) -> Result<ToolCallResult, String> {
    let args = ThemeUpdateArgs::from_value(input).map_err(|e| e.to_string())?;
    let tool_call_id =
        tool_call_id.unwrap_or_else(|| format!("call_{}", uuid::Uuid::new_v4().simple()));
    let message = args.tool_result_message();

    let marker = theme_update_marker(&args.into_marker_payload(tool_call_id.clone()))
        .map_err(|e| e.to_string())?;
    log::debug!("Appending theme update {tool_call_id} to stream {stream_id}");

    let observation = append_stream_text(ctx, stream_id, &marker)?;
    Ok(ToolCallResult {
        tool_call_id,
        message,
        observation,
    })
}

pub fn set_stream_status(
    ctx: &StreamContext<'_>,
    stream_id: &str,
    status: StreamStatus,
) -> Result<StreamObservation, String> {
    ctx.advance(stream_id, |registry| registry.set_status(stream_id, status))
}

pub fn get_stream_view(ctx: &StreamContext<'_>, stream_id: &str) -> Result<StreamView, String> {
    ctx.sessions
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(stream_id)
        .map(StreamSession::view)
        .ok_or_else(|| format!("Stream not found: {stream_id}"))
}
