//! Body parsers.
//!
//! A [`DataParser`] turns the raw body into the intermediate value handed to
//! the parsed-stage interceptor. Each response type picks exactly one.

use std::fmt;
use std::marker::PhantomData;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::ParseError;

/// Turns raw body bytes into a parsed, not yet typed, value.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use decant_core::{DataParser, ParseError};
///
/// /// Parses a body of comma-separated integers.
/// struct CsvNumbers;
///
/// impl DataParser for CsvNumbers {
///     type Parsed = Vec<i64>;
///
///     fn content_type(&self) -> Option<&str> {
///         Some("text/csv")
///     }
///
///     fn parse(&self, body: &Bytes) -> Result<Self::Parsed, ParseError> {
///         let text = std::str::from_utf8(body)?;
///         text.split(',')
///             .map(|n| n.trim().parse().map_err(|_| ParseError::custom(format!("not a number: {n}"))))
///             .collect()
///     }
/// }
///
/// let parsed = CsvNumbers.parse(&Bytes::from("1, 2,3")).expect("parse");
/// assert_eq!(parsed, vec![1, 2, 3]);
/// ```
pub trait DataParser: Send + Sync + 'static {
    /// Parsed value type.
    type Parsed;

    /// MIME type this parser expects, used to build an `Accept` header.
    fn content_type(&self) -> Option<&str>;

    /// Parse the body.
    ///
    /// Empty bodies are not special-cased by the pipeline: each parser
    /// decides whether an empty body is valid.
    fn parse(&self, body: &Bytes) -> Result<Self::Parsed, ParseError>;
}

/// Deserialize JSON bytes with path-aware error messages.
///
/// The whole body must be one JSON document; only whitespace may follow it.
fn from_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ParseError> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    let value = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| ParseError::json(e.path().to_string(), e.inner().to_string()))?;
    deserializer
        .end()
        .map_err(|e| ParseError::json("", e.to_string()))?;
    Ok(value)
}

// ============================================================================
// JSON
// ============================================================================

/// Parses the body as an untyped [`serde_json::Value`].
///
/// An empty body parses as an empty object.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl DataParser for JsonParser {
    type Parsed = serde_json::Value;

    fn content_type(&self) -> Option<&str> {
        Some("application/json")
    }

    fn parse(&self, body: &Bytes) -> Result<Self::Parsed, ParseError> {
        if body.is_empty() {
            return Ok(serde_json::Value::Object(serde_json::Map::new()));
        }
        from_json(body)
    }
}

/// Parses the body directly into `T`.
///
/// Useful when the parsed-stage interceptor wants a schema type rather than a
/// raw JSON tree (e.g. an error envelope).
pub struct TypedJsonParser<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypedJsonParser<T> {
    /// Creates a new typed JSON parser.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for TypedJsonParser<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for TypedJsonParser<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedJsonParser<T> {}

impl<T> fmt::Debug for TypedJsonParser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedJsonParser")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> DataParser for TypedJsonParser<T>
where
    T: DeserializeOwned + 'static,
{
    type Parsed = T;

    fn content_type(&self) -> Option<&str> {
        Some("application/json")
    }

    fn parse(&self, body: &Bytes) -> Result<Self::Parsed, ParseError> {
        from_json(body)
    }
}

// ============================================================================
// Text, form, raw bytes
// ============================================================================

/// Parses the body as UTF-8 text.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringParser;

impl DataParser for StringParser {
    type Parsed = String;

    fn content_type(&self) -> Option<&str> {
        Some("text/plain")
    }

    fn parse(&self, body: &Bytes) -> Result<Self::Parsed, ParseError> {
        let text = std::str::from_utf8(body)?;
        Ok(text.to_owned())
    }
}

/// Parses an `application/x-www-form-urlencoded` body into ordered pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormUrlEncodedParser;

impl DataParser for FormUrlEncodedParser {
    type Parsed = Vec<(String, String)>;

    fn content_type(&self) -> Option<&str> {
        Some("application/x-www-form-urlencoded")
    }

    fn parse(&self, body: &Bytes) -> Result<Self::Parsed, ParseError> {
        serde_urlencoded::from_bytes(body).map_err(Into::into)
    }
}

/// Hands the body through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesParser;

impl DataParser for BytesParser {
    type Parsed = Bytes;

    fn content_type(&self) -> Option<&str> {
        None
    }

    fn parse(&self, body: &Bytes) -> Result<Self::Parsed, ParseError> {
        Ok(body.clone())
    }
}
