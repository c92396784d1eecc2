//! Live console log hub
//!
//! A tracing layer turns every log event at or above a minimum level into a
//! [`LogEntry`] and hands it to a [`LogSink`]. The [`ConsoleHub`] sink fans
//! entries out to any number of WebSocket subscribers.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Higher is more severe.
    fn severity(self) -> u8 {
        match self {
            LogLevel::Trace => 0,
            LogLevel::Debug => 1,
            LogLevel::Info => 2,
            LogLevel::Warn => 3,
            LogLevel::Error => 4,
        }
    }

    pub fn at_least(self, minimum: LogLevel) -> bool {
        self.severity() >= minimum.severity()
    }

    /// Lenient parse used for query strings; unknown names fall back to info.
    pub fn parse_or_info(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "trace" => LogLevel::Trace,
            "debug" => LogLevel::Debug,
            "warn" | "warning" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }
}

impl From<&Level> for LogLevel {
    fn from(level: &Level) -> Self {
        match *level {
            Level::TRACE => LogLevel::Trace,
            Level::DEBUG => LogLevel::Debug,
            Level::INFO => LogLevel::Info,
            Level::WARN => LogLevel::Warn,
            Level::ERROR => LogLevel::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub target: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<serde_json::Value>,
}

/// Destination for captured log entries.
pub trait LogSink: Send + Sync + 'static {
    fn publish(&self, entry: LogEntry);

    /// Sinks with nobody listening let the layer skip formatting entirely.
    fn is_listening(&self) -> bool {
        true
    }
}

/// Broadcasts entries to every connected console client.
#[derive(Debug, Clone)]
pub struct ConsoleHub {
    sender: broadcast::Sender<LogEntry>,
}

impl ConsoleHub {
    pub fn new(buffer_size: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer_size.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl LogSink for ConsoleHub {
    fn publish(&self, entry: LogEntry) {
        // No receivers is not an error
        let _ = self.sender.send(entry);
    }

    fn is_listening(&self) -> bool {
        self.sender.receiver_count() > 0
    }
}

/// Tracing layer feeding a [`LogSink`].
pub struct ConsoleLayer<K> {
    sink: K,
    min_level: Level,
}

impl<K: LogSink> ConsoleLayer<K> {
    pub fn new(sink: K) -> Self {
        Self {
            sink,
            min_level: Level::INFO,
        }
    }

    pub fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }
}

impl<S, K> Layer<S> for ConsoleLayer<K>
where
    S: Subscriber,
    K: LogSink,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if metadata.level() > &self.min_level || !self.sink.is_listening() {
            return;
        }

        let mut visitor = EntryVisitor::default();
        event.record(&mut visitor);

        self.sink.publish(LogEntry {
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            level: metadata.level().into(),
            target: metadata.target().to_string(),
            message: visitor.message.unwrap_or_default(),
            fields: if visitor.fields.is_empty() {
                None
            } else {
                Some(serde_json::Value::Object(visitor.fields))
            },
        });
    }
}

#[derive(Default)]
struct EntryVisitor {
    message: Option<String>,
    fields: serde_json::Map<String, serde_json::Value>,
}

impl EntryVisitor {
    fn insert(&mut self, field: &Field, value: serde_json::Value) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for EntryVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.insert(field, value.into());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let formatted = format!("{:?}", value);
        if field.name() == "message" {
            self.message = Some(formatted);
        } else {
            self.insert(field, formatted.into());
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, value.into());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, value.into());
    }
}
