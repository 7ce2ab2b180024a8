pub mod sink;

pub use sink::{FileLogSink, LogEntry, LogSink, MemoryLogSink};
