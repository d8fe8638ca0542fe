//! Decoding of streamed [`http::Response`] bodies.
//!
//! The body is buffered with `http-body-util`, then handed to the pipeline
//! together with the response head.

use std::fmt::Display;

use http_body::Body;
use http_body_util::BodyExt;
use tracing::debug;

use decant_core::{DataParser, DecodeResponse, Pipeline, ResponseMetadata};

use crate::{Error, Result};

/// Collect the body of `response` and decode it with `pipeline`.
///
/// # Example
///
/// ```ignore
/// let response = client.request(request).await?;
/// let (user, metadata) = decant::decode_http(&USER_PIPELINE, response).await?;
/// ```
pub async fn decode_http<P, I, B>(
    pipeline: &Pipeline<P, I>,
    response: http::Response<B>,
) -> Result<(I, ResponseMetadata)>
where
    P: DataParser,
    B: Body,
    B::Error: Display,
{
    let (parts, body) = response.into_parts();
    let metadata = ResponseMetadata::from(parts);

    let body = body
        .collect()
        .await
        .map_err(|e| {
            debug!(status = metadata.status(), error = %e, "failed to collect response body");
            Error::body(e.to_string())
        })?
        .to_bytes();

    pipeline.decode(body, metadata).map_err(Into::into)
}

/// Collect the body of `response` and decode it as `T`.
pub async fn decode_http_as<T, B>(response: http::Response<B>) -> Result<(T, ResponseMetadata)>
where
    T: DecodeResponse,
    B: Body,
    B::Error: Display,
{
    decode_http(T::pipeline(), response).await
}
