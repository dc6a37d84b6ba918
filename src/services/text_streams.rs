// Text Streams
// In-process append-only text streams addressed by an opaque id

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::models::{StreamSnapshot, StreamStatus};

/// Holds every live stream. Text only grows; once a stream is done or
/// errored it no longer changes.
#[derive(Default)]
pub struct TextStreamRegistry {
    streams: Mutex<HashMap<String, StreamSnapshot>>,
}

impl TextStreamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new pending stream and return its id.
    pub fn create(&self) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.lock().insert(
            id.clone(),
            StreamSnapshot {
                text: String::new(),
                status: StreamStatus::Pending,
            },
        );
        log::debug!("Created text stream {id}");
        id
    }

    /// Append a chunk. The first append moves a pending stream to streaming.
    pub fn append(&self, id: &str, chunk: &str) -> Result<StreamSnapshot, String> {
        let mut streams = self.lock();
        let stream = streams
            .get_mut(id)
            .ok_or_else(|| format!("Stream not found: {id}"))?;

        if stream.status.is_terminal() {
            return Err(format!(
                "Stream {id} is already {}",
                stream.status.as_str()
            ));
        }

        stream.text.push_str(chunk);
        stream.status = StreamStatus::Streaming;
        Ok(stream.clone())
    }

    pub fn set_status(&self, id: &str, status: StreamStatus) -> Result<StreamSnapshot, String> {
        let mut streams = self.lock();
        let stream = streams
            .get_mut(id)
            .ok_or_else(|| format!("Stream not found: {id}"))?;

        if stream.status == status {
            return Ok(stream.clone());
        }
        if stream.status.is_terminal() {
            return Err(format!(
                "Stream {id} is already {}",
                stream.status.as_str()
            ));
        }
        if status == StreamStatus::Pending {
            return Err(format!("Stream {id} cannot return to pending"));
        }

        log::debug!(
            "Text stream {id}: {} -> {}",
            stream.status.as_str(),
            status.as_str()
        );
        stream.status = status;
        Ok(stream.clone())
    }

    pub fn snapshot(&self, id: &str) -> Option<StreamSnapshot> {
        self.lock().get(id).cloned()
    }

    pub fn remove(&self, id: &str) -> Option<StreamSnapshot> {
        self.lock().remove(id)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, StreamSnapshot>> {
        self.streams.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
