//! Data types for the log relay

mod log_entry;

pub use log_entry::LogEntry;
