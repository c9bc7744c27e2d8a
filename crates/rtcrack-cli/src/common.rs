//! Shared command-line plumbing for the rtcrack binaries

// Not every binary uses every helper
#![allow(dead_code)]

use std::io::{self, Write};
use tracing::Level;

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

/// Install the stderr tracing subscriber
pub fn init_tracing(level: LogLevel) {
    tracing_subscriber::fmt()
        .with_max_level(Level::from(level))
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Print a single-line progress indicator, overwriting the previous one
pub fn print_progress(label: &str, current: usize, total: usize) {
    let progress = if total > 0 {
        (current as f64 / total as f64) * 100.0
    } else {
        100.0
    };
    print!("\r[{}] Progress: {:.2}% ({}/{})", label, progress, current, total);
    let _ = io::stdout().flush();
}

/// Size of a file in KB, 0 when it cannot be read
pub fn file_size_kb(path: &std::path::Path) -> f64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0) as f64 / 1024.0
}
