//! Helpers for feeding a byte stream to a decoder in pieces.

use lineframe::{BufferedStreamDecoder, PayloadDecoder, StreamEvent, Subscription};

/// Window multipliers from `0.0` up to (not including) `20.0` in `0.05` steps.
///
/// Each multiplier is built as an integer part plus an accumulated fraction,
/// so the series carries the same floating point rounding a naive loop
/// would.
pub fn window_multipliers() -> Vec<f64> {
    let mut multipliers = Vec::with_capacity(400);
    for whole in 0..20 {
        let mut offset = 0.0;
        for _ in 0..20 {
            multipliers.push(f64::from(whole) + offset);
            offset += 0.05;
        }
    }
    multipliers
}

/// Window length for `multiplier` times `record_len`, never below one byte.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "window sizes are small and non-negative"
)]
pub fn window_size(record_len: usize, multiplier: f64) -> usize {
    ((record_len as f64 * multiplier) as usize).max(1)
}

/// Feed `bytes` to `decoder` in consecutive windows of `window` bytes.
///
/// Returns the number of `receive` calls made.
pub fn feed_in_windows<D>(decoder: &BufferedStreamDecoder<D>, bytes: &[u8], window: usize) -> usize
where
    D: PayloadDecoder,
    D::Payload: Clone,
{
    let mut calls = 0;
    for chunk in bytes.chunks(window.max(1)) {
        decoder.receive(chunk);
        calls += 1;
    }
    calls
}

/// Feed `bytes` to `decoder`, cutting at each offset in `splits`.
///
/// Offsets are sorted and clamped to the input length; duplicates produce
/// empty chunks, which the decoder ignores.
pub fn feed_at_splits<D>(decoder: &BufferedStreamDecoder<D>, bytes: &[u8], splits: &[usize])
where
    D: PayloadDecoder,
    D::Payload: Clone,
{
    let mut cuts: Vec<usize> = splits.iter().map(|&at| at.min(bytes.len())).collect();
    cuts.sort_unstable();
    let mut start = 0;
    for cut in cuts {
        decoder.receive(&bytes[start..cut]);
        start = cut;
    }
    decoder.receive(&bytes[start..]);
}

/// Counts of each event kind drained from a subscription.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventCounts {
    pub values: usize,
    pub terminals: usize,
}

/// Drain every queued event and count them by kind.
pub fn drain_counts<P, E>(subscription: &mut Subscription<P, E>) -> EventCounts {
    subscription
        .drain_ready()
        .iter()
        .fold(EventCounts::default(), |mut counts, event| {
            match event {
                StreamEvent::Value(_) => counts.values += 1,
                StreamEvent::Terminal(_) => counts.terminals += 1,
            }
            counts
        })
}
