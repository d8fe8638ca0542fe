//! Core contract for decoding HTTP responses into typed values.
//!
//! A response goes through a fixed three-stage pipeline:
//!
//! 1. the bytes interceptor sees the raw body and [`ResponseMetadata`]
//!    (default: [`AcceptStatus`], rejecting non-2xx statuses)
//! 2. the [`DataParser`] turns the body into a parsed value, which the parsed
//!    interceptor sees next (default: [`PassThrough`])
//! 3. the constructor builds the typed instance, which the instance
//!    interceptor sees last (default: [`PassThrough`])
//!
//! The first failure stops the pipeline and surfaces as a [`DecodeError`].
//!
//! This crate provides:
//! - [`Pipeline`] and [`PipelineBuilder`] - The decoding pipeline
//! - [`DecodeResponse`] - Per-type binding to a static pipeline
//! - [`Interceptor`], [`AcceptStatus`], [`PassThrough`], [`RequireContentType`] - Stages
//! - [`DataParser`] and the bundled parsers - Body parsing
//! - [`DecodeError`] and its causes - Error handling

mod error;
mod interceptor;
mod metadata;
mod parser;
mod pipeline;
pub mod prelude;
mod response;

pub use error::{
    ConstructionError, DecodeError, DecodeErrorKind, ParseError, Result, ValidationError,
};
pub use interceptor::{AcceptStatus, Interceptor, PassThrough, RequireContentType};
pub use metadata::ResponseMetadata;
pub use parser::{
    BytesParser, DataParser, FormUrlEncodedParser, JsonParser, StringParser, TypedJsonParser,
};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use response::DecodeResponse;

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
