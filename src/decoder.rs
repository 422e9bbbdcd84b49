//! Terminator-delimited stream decoder.
//!
//! [`BufferedStreamDecoder`] accepts a byte stream as arbitrarily sized
//! chunks, splits it on a single terminator byte, decodes each record with a
//! [`PayloadDecoder`] and publishes the result on an [`EventChannel`].
//!
//! Chunk boundaries carry no meaning. A record may span many chunks and a
//! chunk may hold many records; the decoder buffers the unterminated tail
//! between calls. Every record handed to the payload decoder ends with the
//! terminator byte.
//!
//! ```text
//!   chunk ──► [ buffered tail | bytes up to terminator ] ──► decode ──► publish
//!                         ▲                                      │
//!                         └──────── remainder after terminator ◄─┘
//! ```

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use bytes::{Bytes, BytesMut};
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};

use crate::{
    channel::{EventChannel, StreamEvent, Subscription},
    config::{DEFAULT_TERMINATOR, DecoderConfig},
    error::DecodeError,
    metrics,
    payload::{JsonDecoder, PayloadDecoder},
    policy::ErrorPolicy,
};

/// Streaming decoder emitting one payload per terminated record.
///
/// `receive` and `clear` share one mutex, so concurrent producers never
/// interleave buffer mutations. The lock is held while records are decoded
/// and published; a payload decoder must not call back into the same
/// decoder.
///
/// # Examples
///
/// ```
/// use lineframe::{BufferedStreamDecoder, StreamEvent};
///
/// let decoder = BufferedStreamDecoder::newline(|bytes: &[u8]| {
///     std::str::from_utf8(bytes).map(|s| s.trim_end().to_owned())
/// });
/// let mut events = decoder.subscribe();
///
/// decoder.receive(b"alp");
/// decoder.receive(b"ha\nbeta\ngam");
///
/// let values: Vec<_> = events
///     .drain_ready()
///     .into_iter()
///     .filter_map(StreamEvent::into_value)
///     .collect();
/// assert_eq!(values, ["alpha", "beta"]);
/// assert_eq!(decoder.buffered_len(), 3);
/// ```
pub struct BufferedStreamDecoder<D: PayloadDecoder> {
    terminator: u8,
    policy: ErrorPolicy,
    log_skipped_records: bool,
    decoder: D,
    buffer: Mutex<BytesMut>,
    channel: Arc<EventChannel<D::Payload, D::Error>>,
}

impl<D: PayloadDecoder> BufferedStreamDecoder<D> {
    /// Create a decoder splitting records on `terminator`.
    pub fn new(terminator: u8, decoder: D) -> Self {
        Self::with_config(DecoderConfig::default().terminator(terminator), decoder)
    }

    /// Create a decoder for newline-terminated records.
    pub fn newline(decoder: D) -> Self { Self::new(DEFAULT_TERMINATOR, decoder) }

    /// Create a decoder from a full [`DecoderConfig`].
    pub fn with_config(config: DecoderConfig, decoder: D) -> Self {
        Self {
            terminator: config.terminator,
            policy: config.error_policy,
            log_skipped_records: config.log_skipped_records,
            decoder,
            buffer: Mutex::new(BytesMut::with_capacity(config.buffer_capacity)),
            channel: Arc::new(EventChannel::new()),
        }
    }

    fn buffer(&self) -> MutexGuard<'_, BytesMut> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Byte that terminates each record.
    pub fn terminator(&self) -> u8 { self.terminator }

    /// Reaction to records that fail to decode.
    pub fn policy(&self) -> ErrorPolicy { self.policy }

    /// Number of bytes buffered for the current unterminated record.
    pub fn buffered_len(&self) -> usize { self.buffer().len() }

    /// Whether the emission channel has completed.
    pub fn is_closed(&self) -> bool { self.channel.is_closed() }

    /// Register a subscriber for events published from now on.
    pub fn subscribe(&self) -> Subscription<D::Payload, D::Error> { self.channel.subscribe() }

    /// Channel on which this decoder publishes.
    pub fn channel(&self) -> &Arc<EventChannel<D::Payload, D::Error>> { &self.channel }

    /// Discard the buffered partial record without decoding it.
    ///
    /// The channel is unaffected.
    pub fn clear(&self) {
        let mut buffer = self.buffer();
        if !buffer.is_empty() {
            debug!(discarded = buffer.len(), "partial record cleared");
        }
        buffer.clear();
    }

    /// Complete the channel cleanly and return any unterminated bytes.
    ///
    /// Subscribers finish after draining their queues. The returned bytes
    /// were never decoded.
    pub fn finish(&self) -> Bytes {
        let remainder = self.buffer().split().freeze();
        if !remainder.is_empty() {
            debug!(
                bytes = remainder.len(),
                "stream finished with unterminated record"
            );
        }
        self.channel.close();
        remainder
    }
}

impl<D> BufferedStreamDecoder<D>
where
    D: PayloadDecoder,
    D::Payload: Clone,
{
    /// Feed the next chunk of the stream.
    ///
    /// Every terminator in `chunk` completes a record: the buffered tail plus
    /// the bytes up to and including the terminator are decoded and the
    /// outcome published. Bytes after the last terminator stay buffered for
    /// the next call. An empty chunk does nothing.
    pub fn receive(&self, chunk: &[u8]) {
        if chunk.is_empty() {
            return;
        }

        let mut buffer = self.buffer();
        let mut rest = chunk;
        let mut records = 0usize;
        while let Some(index) = rest.iter().position(|&byte| byte == self.terminator) {
            let (record, tail) = rest.split_at(index + 1);
            buffer.extend_from_slice(record);
            self.dispatch(buffer.split().freeze());
            records += 1;
            rest = tail;
        }
        buffer.extend_from_slice(rest);

        trace!(
            chunk = chunk.len(),
            records,
            buffered = buffer.len(),
            "chunk received"
        );
    }

    fn dispatch(&self, raw: Bytes) {
        match self.decoder.decode(&raw) {
            Ok(payload) => {
                metrics::inc_records();
                self.emit(StreamEvent::Value(payload));
            }
            Err(error) => {
                metrics::inc_decode_failures(self.policy);
                if self.policy.is_terminal() {
                    warn!(
                        bytes = raw.len(),
                        policy = self.policy.as_str(),
                        "record failed to decode; closing stream"
                    );
                    self.emit(StreamEvent::Terminal(Arc::new(DecodeError::new(error, raw))));
                } else if self.log_skipped_records {
                    warn!(
                        bytes = raw.len(),
                        policy = self.policy.as_str(),
                        "record failed to decode; skipping"
                    );
                }
            }
        }
    }

    fn emit(&self, event: StreamEvent<D::Payload, D::Error>) {
        // A closed channel drops and logs the event itself.
        if let Ok(0) = self.channel.publish(event) {
            trace!("event published with no subscribers");
        }
    }
}

impl<T: DeserializeOwned> BufferedStreamDecoder<JsonDecoder<T>> {
    /// Create a decoder for newline-delimited JSON records.
    #[must_use]
    pub fn json() -> Self { Self::newline(JsonDecoder::new()) }
}

impl<T: DeserializeOwned> Default for BufferedStreamDecoder<JsonDecoder<T>> {
    fn default() -> Self { Self::json() }
}

impl<D: PayloadDecoder> fmt::Debug for BufferedStreamDecoder<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferedStreamDecoder")
            .field("terminator", &self.terminator)
            .field("policy", &self.policy)
            .field("buffered", &self.buffered_len())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
