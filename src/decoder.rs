use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use tracing::debug;
use validator::Validate;

use crate::DecodeError;

/// Turns the text of one completed object into a caller-defined value.
///
/// Supplied when the iterator is built. A decode failure only affects the
/// call that produced it; the scanner keeps going.
pub trait ObjectDecoder {
    type Item;

    fn decode(&self, text: &str) -> Result<Self::Item, DecodeError>;
}

impl<D: ObjectDecoder + ?Sized> ObjectDecoder for &D {
    type Item = D::Item;

    fn decode(&self, text: &str) -> Result<Self::Item, DecodeError> {
        (**self).decode(text)
    }
}

/// Deserializes each object with `simd-json` into `T`.
///
/// With the `relaxed` feature enabled, objects rejected by the strict parser
/// are retried as JSON5.
pub struct JsonDecoder<T> {
    _phantom: PhantomData<fn() -> T>,
}

impl<T> JsonDecoder<T> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T> Default for JsonDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonDecoder<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for JsonDecoder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonDecoder").finish()
    }
}

impl<T: DeserializeOwned> ObjectDecoder for JsonDecoder<T> {
    type Item = T;

    fn decode(&self, text: &str) -> Result<T, DecodeError> {
        // simd-json parses in place.
        let mut buffer = text.as_bytes().to_vec();
        match simd_json::from_slice(&mut buffer) {
            Ok(value) => Ok(value),
            Err(e) => {
                debug!("strict decode failed: {}", e);
                #[cfg(feature = "relaxed")]
                {
                    if let Ok(value) = json5::from_str(text) {
                        return Ok(value);
                    }
                }
                Err(e.into())
            }
        }
    }
}

/// Decodes like [`JsonDecoder`] and then runs `T`'s [`Validate`] rules.
pub struct ValidatedDecoder<T> {
    inner: JsonDecoder<T>,
}

impl<T> ValidatedDecoder<T> {
    pub fn new() -> Self {
        Self {
            inner: JsonDecoder::new(),
        }
    }
}

impl<T> Default for ValidatedDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned + Validate> ObjectDecoder for ValidatedDecoder<T> {
    type Item = T;

    fn decode(&self, text: &str) -> Result<T, DecodeError> {
        let value = self.inner.decode(text)?;
        value.validate()?;
        Ok(value)
    }
}

/// Hands the object text through untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawDecoder;

impl ObjectDecoder for RawDecoder {
    type Item = String;

    fn decode(&self, text: &str) -> Result<String, DecodeError> {
        Ok(text.to_owned())
    }
}

/// Decoder backed by a closure, see [`decode_with`].
#[derive(Clone)]
pub struct FnDecoder<F> {
    f: F,
}

impl<F, T> ObjectDecoder for FnDecoder<F>
where
    F: Fn(&str) -> Result<T, DecodeError>,
{
    type Item = T;

    fn decode(&self, text: &str) -> Result<T, DecodeError> {
        (self.f)(text)
    }
}

/// Wrap a closure as an [`ObjectDecoder`].
///
/// ```
/// use rest_array_stream::{decode_with, DecodeError, ObjectDecoder};
///
/// let decoder = decode_with(|text: &str| Ok::<_, DecodeError>(text.len()));
/// assert_eq!(decoder.decode("{}").unwrap(), 2);
/// ```
pub fn decode_with<F, T>(f: F) -> FnDecoder<F>
where
    F: Fn(&str) -> Result<T, DecodeError>,
{
    FnDecoder { f }
}
