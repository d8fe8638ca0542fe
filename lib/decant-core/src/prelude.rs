//! Prelude module for convenient imports.
//!
//! ```ignore
//! use decant_core::prelude::*;
//! ```

pub use crate::{
    AcceptStatus, ConstructionError, DataParser, DecodeError, DecodeResponse, Interceptor,
    JsonParser, PassThrough, Pipeline, ResponseMetadata, Result, ValidationError,
};
