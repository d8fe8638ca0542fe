//! # Chapter 0: Getting Started
//!
//! Your first decant pipeline in 5 minutes.
//!
//! ## What You'll Learn
//!
//! - Build a JSON pipeline with [`Pipeline::json`](crate::Pipeline::json)
//! - Decode a buffered body with its [`ResponseMetadata`](crate::ResponseMetadata)
//! - Decode a streamed `http::Response` with [`decode_http`](crate::decode_http)
//!
//! ## Prerequisites
//!
//! Add to `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! decant = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ## Your First Pipeline
//!
//! ```ignore
//! use bytes::Bytes;
//! use decant::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct User {
//!     pub id: u64,
//!     pub name: String,
//! }
//!
//! let pipeline = Pipeline::<_, User>::json();
//!
//! let body = Bytes::from(r#"{"id":1,"name":"a"}"#);
//! let (user, metadata) = pipeline.decode(body, ResponseMetadata::new(200))?;
//! ```
//!
//! ## What Happens
//!
//! ```text
//! (bytes, metadata)
//!   → AcceptStatus      rejects anything outside 200..300
//!   → JsonParser        bytes → serde_json::Value
//!   → PassThrough
//!   → serde             Value → User
//!   → PassThrough
//!   → (User, metadata)
//! ```
//!
//! ## Binding a Type to its Pipeline
//!
//! Define the pipeline once and let the type find it:
//!
//! ```ignore
//! static USER: LazyLock<Pipeline<JsonParser, User>> = LazyLock::new(Pipeline::json);
//!
//! impl DecodeResponse for User {
//!     type Parser = JsonParser;
//!
//!     fn pipeline() -> &'static Pipeline<JsonParser, Self> {
//!         &USER
//!     }
//! }
//!
//! let (user, _) = decant::decode_http_as::<User, _>(response).await?;
//! ```
//!
//! ## Next Steps
//!
//! - [Chapter 1: Interceptors][super::chapter_1] - Validate and rewrite each stage
