//! Structured output abstraction for reprokit.
//!
//! Provides a unified interface for outputting messages in different modes:
//! - Human: Colored symbol-prefixed output for terminal display
//! - Json: One JSON object per line for programmatic consumption
//! - Quiet: Only errors are emitted
//!
//! The Output struct auto-detects TTY for color support and can be injected
//! with a custom writer for test capture.

use colored::{Color, Colorize};
use serde_json::json;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Output mode selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable colored output
    Human,
    /// JSON-formatted structured output
    Json,
    /// Silent mode - only errors
    Quiet,
}

/// Output abstraction with mode-aware formatting
#[derive(Clone)]
pub struct Output {
    mode: OutputMode,
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
    is_tty: bool,
}

impl Output {
    /// Create a new Output writing to stdout
    pub fn new(mode: OutputMode) -> Self {
        let is_tty = atty::is(atty::Stream::Stdout);
        Self {
            mode,
            writer: Arc::new(Mutex::new(Box::new(io::stdout()))),
            is_tty,
        }
    }

    /// Create an Output with a custom writer (for testing)
    #[cfg(test)]
    pub fn with_writer(mode: OutputMode, writer: Box<dyn Write + Send>) -> Self {
        Self {
            mode,
            writer: Arc::new(Mutex::new(writer)),
            is_tty: false,
        }
    }

    /// Output a step message: "→ {msg}" in cyan
    pub fn step(&self, msg: &str) {
        self.prefixed("step", "→", Color::Cyan, msg);
    }

    /// Output a success message: "✓ {msg}" in green
    pub fn success(&self, msg: &str) {
        self.prefixed("success", "✓", Color::Green, msg);
    }

    /// Output a warning message: "⚠ {msg}" in yellow
    pub fn warn(&self, msg: &str) {
        self.prefixed("warning", "⚠", Color::Yellow, msg);
    }

    /// Output an error message: "✗ {msg}" in red
    pub fn error(&self, msg: &str) {
        match self.mode {
            OutputMode::Human => self.write_prefixed("✗", Color::Red, msg),
            OutputMode::Json => self.write_json("error", msg),
            // Errors always output, even in quiet mode
            OutputMode::Quiet => self.write_line(&format!("✗ {}", msg)),
        }
    }

    /// Output plain info text (no prefix)
    pub fn info(&self, msg: &str) {
        match self.mode {
            OutputMode::Human => self.write_line(msg),
            OutputMode::Json => self.write_json("info", msg),
            OutputMode::Quiet => {}
        }
    }

    /// Output detail text (indented, for subordinate info)
    pub fn detail(&self, msg: &str) {
        match self.mode {
            OutputMode::Human => self.write_line(&format!("  {}", msg)),
            OutputMode::Json => self.write_json("detail", msg),
            OutputMode::Quiet => {}
        }
    }

    /// Output a heavy horizontal rule (human mode only)
    pub fn rule(&self) {
        if self.mode == OutputMode::Human {
            let line = "━".repeat(60);
            if self.is_tty {
                self.write_line(&line.cyan().to_string());
            } else {
                self.write_line(&line);
            }
        }
    }

    /// Output a structured JSON event
    pub fn json(&self, value: &serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", value);
        }
    }

    /// Get the current output mode
    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    fn prefixed(&self, level: &str, prefix: &str, color: Color, msg: &str) {
        match self.mode {
            OutputMode::Human => self.write_prefixed(prefix, color, msg),
            OutputMode::Json => self.write_json(level, msg),
            OutputMode::Quiet => {}
        }
    }

    fn write_prefixed(&self, prefix: &str, color: Color, msg: &str) {
        let prefix = if self.is_tty {
            prefix.color(color).to_string()
        } else {
            prefix.to_string()
        };
        self.write_line(&format!("{} {}", prefix, msg));
    }

    /// Write a line to the output
    fn write_line(&self, line: &str) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
        }
    }

    /// Write a JSON-formatted log line
    fn write_json(&self, level: &str, msg: &str) {
        self.json(&json!({
            "level": level,
            "msg": msg,
        }));
    }
}
