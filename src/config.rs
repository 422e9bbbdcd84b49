//! Configuration for buffered stream decoders.

use crate::policy::ErrorPolicy;

/// Byte terminating each record when no other terminator is configured.
pub const DEFAULT_TERMINATOR: u8 = b'\n';

/// Initial capacity reserved for the partial-record buffer.
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024;

/// Settings applied when constructing a
/// [`BufferedStreamDecoder`](crate::BufferedStreamDecoder).
///
/// # Examples
///
/// ```
/// use lineframe::{DecoderConfig, ErrorPolicy};
///
/// let config = DecoderConfig::default()
///     .terminator(b'\0')
///     .error_policy(ErrorPolicy::SkipAndContinue)
///     .log_skipped_records(false);
///
/// assert_eq!(config.terminator, 0);
/// assert_eq!(config.error_policy, ErrorPolicy::SkipAndContinue);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Byte marking the end of one record.
    ///
    /// Default: `b'\n'`.
    pub terminator: u8,

    /// Reaction to a record that fails to decode.
    ///
    /// Default: [`ErrorPolicy::StopOnError`].
    pub error_policy: ErrorPolicy,

    /// Bytes reserved up front for the partial-record buffer.
    ///
    /// The buffer grows past this as needed. Default: 1024.
    pub buffer_capacity: usize,

    /// Whether records discarded under [`ErrorPolicy::SkipAndContinue`] are
    /// logged at warn level.
    ///
    /// Default: true.
    pub log_skipped_records: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            terminator: DEFAULT_TERMINATOR,
            error_policy: ErrorPolicy::default(),
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            log_skipped_records: true,
        }
    }
}

impl DecoderConfig {
    /// Set the record terminator byte.
    #[must_use]
    pub fn terminator(mut self, terminator: u8) -> Self {
        self.terminator = terminator;
        self
    }

    /// Set the reaction to decode failures.
    #[must_use]
    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Set the initial partial-record buffer capacity.
    #[must_use]
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Set whether skipped records are logged.
    #[must_use]
    pub fn log_skipped_records(mut self, enabled: bool) -> Self {
        self.log_skipped_records = enabled;
        self
    }
}
