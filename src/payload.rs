//! Payload decoding capabilities.
//!
//! A [`PayloadDecoder`] turns the raw bytes of one record into a typed value.
//! The stream decoder hands it the whole record including the trailing
//! terminator byte, so implementations must accept exactly one trailing
//! terminator. [`JsonDecoder`] is provided for newline-delimited JSON, where
//! the newline is ordinary trailing whitespace.
//!
//! Any `Fn(&[u8]) -> Result<P, E>` closure is also a decoder.

use std::{fmt, marker::PhantomData};

use serde::de::DeserializeOwned;

/// Trait for turning one terminated record into a payload.
///
/// Decoding must be deterministic: identical bytes always succeed or fail
/// identically.
pub trait PayloadDecoder {
    /// Value produced for a well-formed record.
    type Payload;
    /// Failure reported for a malformed record.
    type Error;

    /// Decode `bytes`, which end with the stream terminator.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be interpreted as a payload.
    fn decode(&self, bytes: &[u8]) -> Result<Self::Payload, Self::Error>;
}

impl<F, P, E> PayloadDecoder for F
where
    F: Fn(&[u8]) -> Result<P, E>,
{
    type Payload = P;
    type Error = E;

    fn decode(&self, bytes: &[u8]) -> Result<P, E> { self(bytes) }
}

/// Decoder reading each record as a JSON document.
///
/// # Examples
///
/// ```
/// use lineframe::{JsonDecoder, PayloadDecoder};
///
/// let decoder = JsonDecoder::<Vec<u32>>::new();
/// let value = decoder.decode(b"[1, 2, 3]\n").expect("valid json");
/// assert_eq!(value, vec![1, 2, 3]);
/// ```
pub struct JsonDecoder<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonDecoder<T> {
    /// Create a JSON decoder for `T`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonDecoder<T> {
    fn default() -> Self { Self::new() }
}

impl<T> Clone for JsonDecoder<T> {
    fn clone(&self) -> Self { *self }
}

impl<T> Copy for JsonDecoder<T> {}

impl<T> fmt::Debug for JsonDecoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonDecoder")
            .field("payload", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: DeserializeOwned> PayloadDecoder for JsonDecoder<T> {
    type Payload = T;
    type Error = serde_json::Error;

    fn decode(&self, bytes: &[u8]) -> Result<T, serde_json::Error> { serde_json::from_slice(bytes) }
}
