#![doc(html_root_url = "https://docs.rs/lineframe/latest")]
//! Public API for the `lineframe` library.
//!
//! This crate decodes a continuous byte stream of terminator-delimited
//! records into typed values. Bytes arrive in chunks of any size through
//! [`BufferedStreamDecoder::receive`]; each completed record is decoded by a
//! [`PayloadDecoder`] and published to every subscriber of the decoder's
//! [`EventChannel`].
//!
//! By default a record that fails to decode completes the channel with a
//! terminal event and no later records reach subscribers. Configure
//! [`ErrorPolicy::SkipAndContinue`] to discard bad records instead.

pub mod channel;
pub mod config;
pub mod decoder;
pub mod error;
pub mod metrics;
pub mod payload;
pub mod policy;
pub mod source;

pub use channel::{EventChannel, StreamEvent, Subscription};
pub use config::{DEFAULT_TERMINATOR, DecoderConfig};
pub use decoder::BufferedStreamDecoder;
pub use error::{ChannelClosed, DecodeError};
pub use payload::{JsonDecoder, PayloadDecoder};
pub use policy::ErrorPolicy;
pub use source::{PumpSummary, pump};
