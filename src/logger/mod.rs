//! Append-only JSONL session logging with graceful degradation.

pub mod jsonl;

pub use jsonl::{EventType, JsonlConfig, JsonlWriter, LogEntry, Severity, SinkState};
