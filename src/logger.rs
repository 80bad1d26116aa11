//! A simple logger for verbose output.

/// Prints progress messages only when verbose mode is enabled.
#[derive(Debug, Clone, Copy)]
pub struct Logger {
    verbose: bool,
}

impl Logger {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Logs a message if verbose mode is enabled.
    pub fn log(&self, msg: &str) {
        if self.verbose {
            eprintln!("[VERBOSE] {}", msg);
        }
    }
}
