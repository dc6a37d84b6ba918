use serde::Serialize;
use serde_json::Value;

/// One theme update applied from a stream, payload is a `ThemeUpdateSummary`
pub const THEME_UPDATE_APPLIED_EVENT: &str = "theme_update_applied";
/// Payload is `{ mode, tokens }` for the mode that changed
pub const THEME_CHANGED_EVENT: &str = "theme_changed";
/// Fired once per stream when it reaches done or error
pub const STREAM_FINISHED_EVENT: &str = "stream_finished";

pub trait EventSink: Send + Sync {
    fn emit(&self, event: &str, payload: Value);
}

pub fn emit_event<T: Serialize>(sink: &dyn EventSink, event: &str, payload: &T) {
    match serde_json::to_value(payload) {
        Ok(value) => sink.emit(event, value),
        Err(e) => log::warn!("Dropping {event} event: {e}"),
    }
}
