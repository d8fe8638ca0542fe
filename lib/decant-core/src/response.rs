//! Per-type decoding contract.

use bytes::Bytes;

use crate::{DataParser, Pipeline, ResponseMetadata, Result};

/// A type that knows how to decode itself from an HTTP response.
///
/// Implementors bind a single, statically defined [`Pipeline`].
///
/// # Example
///
/// ```
/// use std::sync::LazyLock;
///
/// use bytes::Bytes;
/// use decant_core::{DecodeError, DecodeResponse, JsonParser, Pipeline, ResponseMetadata};
///
/// #[derive(Debug, serde::Deserialize)]
/// struct User {
///     id: u64,
///     name: String,
/// }
///
/// static USER: LazyLock<Pipeline<JsonParser, User>> = LazyLock::new(|| {
///     Pipeline::json_builder()
///         .intercept_instance(|user: User, metadata: ResponseMetadata| {
///             if user.name.is_empty() {
///                 Err(DecodeError::rejected("empty name"))
///             } else {
///                 Ok((user, metadata))
///             }
///         })
///         .build()
/// });
///
/// impl DecodeResponse for User {
///     type Parser = JsonParser;
///
///     fn pipeline() -> &'static Pipeline<JsonParser, Self> {
///         &USER
///     }
/// }
///
/// let (user, _) = User::decode(Bytes::from(r#"{"id":1,"name":"a"}"#), ResponseMetadata::new(200))
///     .expect("decode");
/// assert_eq!(user.id, 1);
/// ```
pub trait DecodeResponse: Sized + 'static {
    /// Parser used for the body.
    type Parser: DataParser;

    /// Pipeline used to decode this type.
    fn pipeline() -> &'static Pipeline<Self::Parser, Self>;

    /// Decode a response into `Self` and its (possibly rewritten) metadata.
    fn decode(body: Bytes, metadata: ResponseMetadata) -> Result<(Self, ResponseMetadata)> {
        Self::pipeline().decode(body, metadata)
    }
}
