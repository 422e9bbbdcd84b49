//! Global log capture for assertions on decoder diagnostics.
//!
//! `lineframe` emits `tracing` events with the `log-always` feature, so every
//! event is also visible as a `log` record captured here.

use std::sync::{Mutex, MutexGuard, OnceLock};

use logtest::Logger;
use rstest::fixture;

/// Handle to the global logger with exclusive access.
///
/// This guard ensures tests do not interfere with each other's log capture by
/// serialising access to a [`logtest::Logger`].
pub struct LoggerHandle {
    guard: MutexGuard<'static, Logger>,
}

impl LoggerHandle {
    /// Acquire the global [`Logger`] instance.
    pub fn new() -> Self {
        static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

        let logger = LOGGER.get_or_init(|| Mutex::new(Logger::start()));
        let guard = logger.lock().expect("logger poisoned");

        Self { guard }
    }

    /// Discard every record captured so far.
    pub fn clear(&mut self) { while self.guard.pop().is_some() {} }

    /// Pop records until one at `level` contains `needle`.
    ///
    /// Returns the matching message, or `None` once the capture is empty.
    pub fn find(&mut self, level: log::Level, needle: &str) -> Option<String> {
        while let Some(record) = self.guard.pop() {
            let message = record.args().to_string();
            if record.level() == level && message.contains(needle) {
                return Some(message);
            }
        }
        None
    }
}

impl Default for LoggerHandle {
    fn default() -> Self { Self::new() }
}

impl std::ops::Deref for LoggerHandle {
    type Target = Logger;

    fn deref(&self) -> &Self::Target { &self.guard }
}

impl std::ops::DerefMut for LoggerHandle {
    fn deref_mut(&mut self) -> &mut Self::Target { &mut self.guard }
}

#[allow(
    unused_braces,
    reason = "rustc false positive for single line rstest fixtures"
)]
#[fixture]
pub fn logger() -> LoggerHandle { LoggerHandle::new() }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_discards_earlier_records() {
        let mut logger = LoggerHandle::new();
        log::warn!("stale record");
        assert!(!logger.is_empty());

        logger.clear();
        assert!(logger.is_empty());

        log::warn!("fresh record");
        assert!(logger.find(log::Level::Warn, "stale").is_none());
    }

    #[test]
    fn find_skips_records_at_other_levels() {
        let mut logger = LoggerHandle::new();
        logger.clear();
        log::info!("needle at info");
        log::warn!("needle at warn");

        let found = logger.find(log::Level::Warn, "needle");
        assert_eq!(found.as_deref(), Some("needle at warn"));
    }
}
