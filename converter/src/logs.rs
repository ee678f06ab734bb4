//! Run log broadcasting.
//!
//! Every entry is emitted as a `tracing` event and forwarded to any
//! subscribed receivers, so the CLI, library callers and tests all observe
//! the same reports (malformed lines, skipped files, progress).

use once_cell::sync::Lazy;
use serde::Serialize;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    /// A step that finished; rendered with a check mark.
    Success,
    Warning,
    Error,
}

/// One run report, as seen by subscribers.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting depth under the previous entry.
    pub indent: u8,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            indent: 0,
        }
    }

    pub fn with_indent(self, indent: u8) -> Self {
        Self { indent, ..self }
    }
}

/// Global log broadcaster
pub static LOG_BROADCASTER: Lazy<LogBroadcaster> = Lazy::new(LogBroadcaster::new);

/// Broadcasts log entries to tracing and to all subscribers
pub struct LogBroadcaster {
    subscribers: Mutex<Vec<Sender<LogEntry>>>,
}

impl LogBroadcaster {
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Send a log entry to tracing and every live subscriber
    pub fn log(&self, entry: LogEntry) {
        let indent = "   ".repeat(entry.indent as usize);
        match entry.level {
            LogLevel::Info => tracing::info!("{}{}", indent, entry.message),
            LogLevel::Success => tracing::info!("{}✓ {}", indent, entry.message),
            LogLevel::Warning => tracing::warn!("{}{}", indent, entry.message),
            LogLevel::Error => tracing::error!("{}{}", indent, entry.message),
        }

        // Drop receivers that went away
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.retain(|tx| tx.send(entry.clone()).is_ok());
        }
    }

    /// Get a receiver for every entry logged from now on
    pub fn subscribe(&self) -> Receiver<LogEntry> {
        let (tx, rx) = channel();
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push(tx);
        }
        rx
    }
}

impl Default for LogBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

fn emit(level: LogLevel, msg: impl Into<String>, indent: u8) {
    LOG_BROADCASTER.log(LogEntry::new(level, msg).with_indent(indent));
}

pub fn log_info(msg: impl Into<String>) {
    emit(LogLevel::Info, msg, 0);
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    emit(LogLevel::Info, msg, indent);
}

pub fn log_success(msg: impl Into<String>) {
    emit(LogLevel::Success, msg, 0);
}

pub fn log_warning(msg: impl Into<String>) {
    emit(LogLevel::Warning, msg, 0);
}

pub fn log_error(msg: impl Into<String>) {
    emit(LogLevel::Error, msg, 0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_receives_entries() {
        let broadcaster = LogBroadcaster::new();
        let rx = broadcaster.subscribe();

        broadcaster.log(LogEntry::new(LogLevel::Warning, "line 4: no '='").with_indent(1));

        let entry = rx.try_recv().unwrap();
        assert_eq!(entry.level, LogLevel::Warning);
        assert_eq!(entry.indent, 1);
        assert!(entry.message.contains("line 4"));
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let broadcaster = LogBroadcaster::new();
        let rx = broadcaster.subscribe();
        drop(rx);

        broadcaster.log(LogEntry::new(LogLevel::Info, "nobody listening"));
        assert!(broadcaster.subscribers.lock().unwrap().is_empty());
    }

    #[test]
    fn test_entry_serializes_lowercase_level() {
        let json = serde_json::to_string(&LogEntry::new(LogLevel::Success, "ok")).unwrap();
        assert!(json.contains("\"level\":\"success\""));
    }
}
