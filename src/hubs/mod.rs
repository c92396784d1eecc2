//! Real-time hubs pushed to connected clients

pub mod console;

pub use console::{ConsoleHub, ConsoleLayer, LogEntry, LogLevel, LogSink};
