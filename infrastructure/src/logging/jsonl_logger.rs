//! JSONL file writer for conversation events.
//!
//! Each [`ConversationEvent`] is serialized as a single JSON line carrying
//! its `type`, the `conversation_id` and a `timestamp`, appended to the file
//! via a buffered writer.

use conclave_application::NotificationSink;
use conclave_domain::{ConversationEvent, ConversationId};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Event log that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlEventLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlEventLog {
    /// Create a new log writing to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create event log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not create event log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(conversation_id: &ConversationId, event: &ConversationEvent) -> serde_json::Value {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        match serde_json::to_value(event) {
            Ok(serde_json::Value::Object(mut map)) => {
                map.insert(
                    "conversation_id".to_string(),
                    serde_json::Value::String(conversation_id.to_string()),
                );
                map.insert(
                    "timestamp".to_string(),
                    serde_json::Value::String(timestamp),
                );
                serde_json::Value::Object(map)
            }
            _ => serde_json::json!({
                "type": event.event_type(),
                "conversation_id": conversation_id.as_str(),
                "timestamp": timestamp,
            }),
        }
    }
}

impl NotificationSink for JsonlEventLog {
    fn notify(&self, conversation_id: &ConversationId, event: ConversationEvent) {
        let record = Self::record(conversation_id, &event);

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlEventLog {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conclave_domain::{AgentId, Message};

    #[test]
    fn test_event_log_writes_valid_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let log = JsonlEventLog::new(&path).unwrap();
        let conversation = ConversationId::new("c1");

        log.notify(
            &conversation,
            ConversationEvent::NewMessage {
                message: Message::new(conversation.clone(), AgentId::new("a"), "hello"),
            },
        );
        log.notify(
            &conversation,
            ConversationEvent::TurnFailed {
                agent_id: AgentId::new("b"),
                reason: "offline".to_string(),
            },
        );
        drop(log);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "new_message");
        assert_eq!(lines[0]["conversation_id"], "c1");
        assert_eq!(lines[0]["message"]["content"], "hello");
        assert!(lines[0]["timestamp"].is_string());
        assert_eq!(lines[1]["type"], "turn_failed");
        assert_eq!(lines[1]["agent_id"], "b");
        assert_eq!(lines[1]["reason"], "offline");
    }

    #[test]
    fn test_event_log_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("events.jsonl");
        let log = JsonlEventLog::new(&path).unwrap();
        assert_eq!(log.path(), path.as_path());
        assert!(path.exists());
    }
}
