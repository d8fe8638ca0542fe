//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use decant::prelude::*;
//! ```

pub use crate::{
    AcceptStatus, ConstructionError, DataParser, DecodeError, DecodeResponse, Error, Interceptor,
    JsonParser, PassThrough, Pipeline, ResponseMetadata, Result, ValidationError, decode_http,
    decode_http_as,
};
pub use serde::Deserialize;
