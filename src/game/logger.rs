//! Game logger shared by every snapshot of one game
//!
//! Snapshots are values, but logging is a side channel: one `GameLogger`
//! lives behind an `Arc` and every snapshot derived from the same setup
//! writes to it. Captured entries sit behind a `Mutex` so a game (and its
//! logger) can be moved to another thread.

use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};

/// Verbosity level for game output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Silent - no output during game
    Silent = 0,
    /// Minimal - only game outcome and internal errors
    Minimal = 1,
    /// Normal - turns, steps, and key actions (default)
    #[default]
    Normal = 2,
    /// Verbose - all actions and state changes
    Verbose = 3,
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Output only to stdout (default)
    #[default]
    Stdout,
    /// Capture only to in-memory buffer (no stdout)
    Memory,
    /// Both stdout and in-memory buffer
    Both,
}

/// A captured log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
    /// Optional category (e.g., "content_error", "game_event")
    pub category: Option<String>,
}

/// Read access to captured entries; holds the buffer lock while alive
pub struct LogGuard<'a> {
    guard: MutexGuard<'a, Vec<LogEntry>>,
}

impl std::ops::Deref for LogGuard<'_> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// Logger for one game
///
/// Settings are fixed at construction. Every logging method takes `&self`,
/// so the logger can be shared behind an `Arc` without wrapping it.
pub struct GameLogger {
    verbosity: VerbosityLevel,
    output_mode: OutputMode,
    /// Log a state fingerprint after each processed action
    debug_state_hash: bool,
    log_buffer: Mutex<Vec<LogEntry>>,
}

impl GameLogger {
    /// Create a new logger with default verbosity (Normal)
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    /// Create a logger with specified verbosity
    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        GameLogger {
            verbosity,
            output_mode: OutputMode::default(),
            debug_state_hash: false,
            log_buffer: Mutex::new(Vec::new()),
        }
    }

    /// Memory-only logger that records everything; used by tests
    pub fn capturing() -> Self {
        Self::with_verbosity(VerbosityLevel::Verbose).with_output_mode(OutputMode::Memory)
    }

    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    pub fn with_debug_state_hash(mut self, enabled: bool) -> Self {
        self.debug_state_hash = enabled;
        self
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    pub fn debug_state_hash_enabled(&self) -> bool {
        self.debug_state_hash
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.output_mode, OutputMode::Memory | OutputMode::Both)
    }

    fn buffer(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        // A panic while holding the lock cannot leave a Vec half-pushed
        self.log_buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Captured entries, in logging order
    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.buffer(),
        }
    }

    /// Captured entries with the given category
    pub fn logs_in_category(&self, category: &str) -> Vec<LogEntry> {
        self.buffer()
            .iter()
            .filter(|entry| entry.category.as_deref() == Some(category))
            .cloned()
            .collect()
    }

    pub fn clear_logs(&self) {
        self.buffer().clear();
    }

    #[inline]
    fn log_to_stdout(&self, level: VerbosityLevel, message: &str) {
        if level == VerbosityLevel::Minimal {
            println!("{}", message);
        } else {
            println!("  {}", message);
        }
    }

    fn log(&self, level: VerbosityLevel, category: Option<&str>, message: &str) {
        if level > self.verbosity {
            return;
        }

        if self.is_capturing() {
            self.buffer().push(LogEntry {
                level,
                message: message.to_string(),
                category: category.map(str::to_string),
            });
        }

        if matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both) {
            self.log_to_stdout(level, message);
        }
    }

    #[inline]
    pub fn minimal(&self, message: &str) {
        self.log(VerbosityLevel::Minimal, None, message);
    }

    #[inline]
    pub fn normal(&self, message: &str) {
        self.log(VerbosityLevel::Normal, None, message);
    }

    #[inline]
    pub fn verbose(&self, message: &str) {
        self.log(VerbosityLevel::Verbose, None, message);
    }

    /// Log at `level` with a category tag
    pub fn categorized(&self, level: VerbosityLevel, category: &str, message: &str) {
        self.log(level, Some(category), message);
    }

    /// Bad card data: logged, then the card or ability is skipped
    pub fn content_error(&self, message: &str) {
        self.categorized(VerbosityLevel::Normal, "content_error", message);
    }

    /// An engine invariant failed; always worth seeing
    pub fn internal_error(&self, message: &str) {
        self.categorized(VerbosityLevel::Minimal, "internal_error", message);
    }
}

impl Default for GameLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GameLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameLogger")
            .field("verbosity", &self.verbosity)
            .field("output_mode", &self.output_mode)
            .field("log_count", &self.buffer().len())
            .finish()
    }
}
