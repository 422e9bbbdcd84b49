//! Feed a decoder from an asynchronous byte source.
//!
//! [`pump`] reads an [`AsyncRead`] to end of stream and hands each chunk to
//! [`BufferedStreamDecoder::receive`] as it arrives. Chunk sizes follow
//! whatever the reader yields; the decoder does not depend on them.

use std::io;

use futures::StreamExt;
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::{decoder::BufferedStreamDecoder, payload::PayloadDecoder};

/// Read size used by [`pump`].
pub const DEFAULT_READ_CAPACITY: usize = 8 * 1024;

/// Totals reported once a source reaches end of stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PumpSummary {
    /// Number of chunks passed to the decoder.
    pub chunks: usize,
    /// Number of bytes passed to the decoder.
    pub bytes: usize,
}

/// Feed every byte of `reader` into `decoder`.
///
/// Returns once the reader reports end of stream. Bytes after the final
/// terminator stay buffered in the decoder.
///
/// # Errors
///
/// Returns the first I/O error raised by `reader`. Chunks read before the
/// error have already been fed to the decoder.
///
/// # Examples
///
/// ```
/// use lineframe::{BufferedStreamDecoder, source::pump};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> std::io::Result<()> {
/// let decoder = BufferedStreamDecoder::<lineframe::JsonDecoder<u32>>::json();
/// let mut events = decoder.subscribe();
///
/// let summary = pump(&b"1\n2\n3\n"[..], &decoder).await?;
///
/// assert_eq!(summary.bytes, 6);
/// assert_eq!(events.drain_ready().len(), 3);
/// # Ok(())
/// # }
/// ```
pub async fn pump<R, D>(reader: R, decoder: &BufferedStreamDecoder<D>) -> io::Result<PumpSummary>
where
    R: AsyncRead + Unpin,
    D: PayloadDecoder,
    D::Payload: Clone,
{
    pump_with_capacity(reader, decoder, DEFAULT_READ_CAPACITY).await
}

/// Like [`pump`], reading at most `capacity` bytes per chunk.
///
/// # Errors
///
/// Returns the first I/O error raised by `reader`.
pub async fn pump_with_capacity<R, D>(
    reader: R,
    decoder: &BufferedStreamDecoder<D>,
    capacity: usize,
) -> io::Result<PumpSummary>
where
    R: AsyncRead + Unpin,
    D: PayloadDecoder,
    D::Payload: Clone,
{
    let mut stream = ReaderStream::with_capacity(reader, capacity.max(1));
    let mut summary = PumpSummary::default();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.inspect_err(|e| {
            debug!(error = %e, chunks = summary.chunks, "byte source failed");
        })?;
        decoder.receive(&chunk);
        summary.chunks += 1;
        summary.bytes += chunk.len();
    }

    let pending = decoder.buffered_len();
    if pending > 0 {
        debug!(pending, "byte source ended mid-record");
    }
    debug!(
        chunks = summary.chunks,
        bytes = summary.bytes,
        "byte source exhausted"
    );
    Ok(summary)
}
