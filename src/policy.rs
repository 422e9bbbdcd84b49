//! Error policies applied when a record fails to decode.

/// How a decoder reacts to a record its payload decoder rejects.
///
/// # Default Behaviour
///
/// [`ErrorPolicy::StopOnError`] is the default. A single malformed record
/// completes the emission channel with a terminal event and every later
/// record, however well formed, is withheld from subscribers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Publish a terminal event and close the channel permanently.
    ///
    /// Consumers that want to resume must construct a fresh decoder.
    #[default]
    StopOnError,

    /// Log and discard the malformed record, then keep decoding.
    ///
    /// Subscribers never observe the failure; it is visible only through
    /// logs and the decode failure counter.
    ///
    /// # When to Use
    ///
    /// - Telemetry feeds where losing one record is preferable to stalling
    /// - Streams with independent records and no ordering dependency
    SkipAndContinue,
}

impl ErrorPolicy {
    /// Returns the policy name as a static string for metrics and logging.
    ///
    /// # Examples
    ///
    /// ```
    /// use lineframe::ErrorPolicy;
    ///
    /// assert_eq!(ErrorPolicy::StopOnError.as_str(), "stop_on_error");
    /// assert_eq!(ErrorPolicy::SkipAndContinue.as_str(), "skip_and_continue");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StopOnError => "stop_on_error",
            Self::SkipAndContinue => "skip_and_continue",
        }
    }

    /// Whether a decode failure under this policy closes the channel.
    #[must_use]
    pub const fn is_terminal(self) -> bool { matches!(self, Self::StopOnError) }
}
