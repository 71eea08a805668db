//! Opt-in debug logging for the ordering engine
//!
//! Records profile selection, classification and resolution decisions for
//! debugging and verification purposes. Disabled unless the host
//! initializes it; every helper is a no-op otherwise.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Global logger instance
static LOGGER: Mutex<Option<EngineLogger>> = Mutex::new(None);

/// Logger for engine evaluations
pub struct EngineLogger {
    file: File,
}

impl EngineLogger {
    /// Create a new logger writing to the specified path
    pub fn new(log_path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)?;

        Ok(Self { file })
    }

    /// Write a log message
    pub fn log(&mut self, message: &str) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let _ = writeln!(self.file, "[{}] {}", timestamp, message);
        let _ = self.file.flush();
    }

    /// Log a section header
    pub fn section(&mut self, title: &str) {
        let separator = "=".repeat(60);
        self.log(&separator);
        self.log(title);
        self.log(&separator);
    }
}

/// Initialize the global logger
pub fn init_logger(log_path: Option<&Path>) -> std::io::Result<PathBuf> {
    let path = log_path.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        PathBuf::from(format!("/tmp/ordlint-engine-{}.log", timestamp))
    });

    let logger = EngineLogger::new(&path)?;

    if let Ok(mut guard) = LOGGER.lock() {
        *guard = Some(logger);
    }

    Ok(path)
}

/// Log a message to the global logger
pub fn log(message: &str) {
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(ref mut logger) = *guard {
            logger.log(message);
        }
    }
}

/// Log a section header
pub fn section(title: &str) {
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(ref mut logger) = *guard {
            logger.section(title);
        }
    }
}

/// Check if logging is enabled
pub fn is_enabled() -> bool {
    if let Ok(guard) = LOGGER.lock() {
        guard.is_some()
    } else {
        false
    }
}

/// Log the start of one evaluation
pub fn log_evaluation_start(construct_name: Option<&str>, element_count: usize) {
    section("EVALUATION");
    log(&format!(
        "Construct: {}",
        construct_name.unwrap_or("<anonymous>")
    ));
    log(&format!("Elements: {}", element_count));
}

/// Log one element's resolved group
pub fn log_classification(name: &str, group: &str, tier: usize) {
    log(&format!("  {} -> group '{}' (tier {})", name, group, tier));
}

/// Log the dependency graph summary
pub fn log_dependencies(edge_count: usize, cyclic_count: usize) {
    log(&format!(
        "Dependency edges: {} ({} cyclic, neutralized)",
        edge_count, cyclic_count
    ));
}

/// Log the resolution outcome
pub fn log_resolution(partition_count: usize, moved: usize, violation_count: usize) {
    log(&format!("Partitions: {}", partition_count));
    log(&format!("Elements out of place: {}", moved));
    log(&format!("Violations: {}", violation_count));
}
