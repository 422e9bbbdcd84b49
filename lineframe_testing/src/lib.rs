//! Test support for `lineframe`.
//!
//! Provides sample newline-delimited JSON records, helpers that feed a
//! [`BufferedStreamDecoder`](lineframe::BufferedStreamDecoder) in chunks of
//! chosen sizes, and a global log capture fixture.
//!
//! ```rust
//! use lineframe::BufferedStreamDecoder;
//! use lineframe_testing::{SampleRecord, drain_counts, encode_records, feed_in_windows};
//!
//! let decoder = BufferedStreamDecoder::<lineframe::JsonDecoder<SampleRecord>>::json();
//! let mut events = decoder.subscribe();
//! feed_in_windows(&decoder, &encode_records(3, b'\n'), 7);
//! assert_eq!(drain_counts(&mut events).values, 3);
//! ```

pub mod chunking;
pub mod logging;
pub mod records;

pub use chunking::{
    EventCounts,
    drain_counts,
    feed_at_splits,
    feed_in_windows,
    window_multipliers,
    window_size,
};
pub use logging::{LoggerHandle, logger};
pub use records::{SampleRecord, encode_records, encode_sequence, record_len};
