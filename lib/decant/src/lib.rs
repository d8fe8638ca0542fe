//! Decode HTTP responses into typed values.
//!
//! Each response type gets a [`Pipeline`]: a body parser, a constructor and
//! three interceptors (raw bytes, parsed value, typed instance) that can
//! validate or rewrite what flows through them. The first failure stops the
//! pipeline and surfaces as a single [`DecodeError`].
//!
//! # Example
//!
//! ```ignore
//! use decant::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! let pipeline = Pipeline::<_, User>::json();
//! let response = client.request(request).await?;
//! let (user, metadata) = decant::decode_http(&pipeline, response).await?;
//! ```
//!
//! See the [tutorial][_tutorial] for a complete guide.

pub mod _tutorial;
mod body;
mod error;
pub mod prelude;

pub use body::{decode_http, decode_http_as};
pub use error::{Error, Result};

// Re-export core types
pub use decant_core::{
    AcceptStatus, BytesParser, ConstructionError, DataParser, DecodeError, DecodeErrorKind,
    DecodeResponse, FormUrlEncodedParser, Interceptor, JsonParser, ParseError, PassThrough,
    Pipeline, PipelineBuilder, RequireContentType, ResponseMetadata, StringParser,
    TypedJsonParser, ValidationError,
};

// Re-export http types for status codes and headers
pub use decant_core::{StatusCode, header};
