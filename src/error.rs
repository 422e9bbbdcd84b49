//! Error types surfaced by the decoder and its emission channel.
//!
//! A stream has exactly one failure kind: a record whose bytes the payload
//! decoder rejected. [`DecodeError`] carries both the underlying failure and
//! the raw record bytes, including the trailing terminator, so consumers can
//! diagnose or replay the record.

use bytes::Bytes;
use thiserror::Error;

/// A record could not be decoded into a payload.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use lineframe::DecodeError;
///
/// let err = DecodeError::new("bad record", Bytes::from_static(b"{oops\n"));
/// assert_eq!(err.raw().as_ref(), b"{oops\n");
/// assert_eq!(err.error(), &"bad record");
/// ```
#[derive(Debug, Error)]
#[error("failed to decode {len}-byte record: {error}", len = .raw.len())]
pub struct DecodeError<E> {
    #[source]
    error: E,
    raw: Bytes,
}

impl<E> DecodeError<E> {
    /// Wrap a decoder failure together with the record that caused it.
    pub fn new(error: E, raw: Bytes) -> Self { Self { error, raw } }

    /// Underlying failure reported by the payload decoder.
    pub fn error(&self) -> &E { &self.error }

    /// Exact bytes handed to the payload decoder, terminator included.
    #[must_use]
    pub fn raw(&self) -> &Bytes { &self.raw }

    /// Split into the underlying failure and the raw record bytes.
    pub fn into_parts(self) -> (E, Bytes) { (self.error, self.raw) }
}

/// Returned when publishing to a channel that has already completed.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("event channel is closed")]
pub struct ChannelClosed;
