//! # Chapter 1: Interceptors
//!
//! Attach policy at the stage where it is cheapest to express.
//!
//! ## Bytes Stage
//!
//! Transport concerns: status codes, content type, header redaction. The
//! default is [`AcceptStatus`](crate::AcceptStatus); replacing it drops the
//! status check unless you keep it.
//!
//! ```ignore
//! let pipeline = Pipeline::<_, User>::json_builder()
//!     .intercept_bytes(RequireContentType::new("application/json"))
//!     .build();
//!
//! // Accept redirects too
//! let pipeline = Pipeline::<_, Page>::json_builder()
//!     .intercept_bytes(AcceptStatus::range(200..400))
//!     .build();
//! ```
//!
//! ## Parsed Stage
//!
//! Schema concerns: envelope unwrapping, API error envelopes, migrations.
//!
//! ```ignore
//! let pipeline = Pipeline::<_, User>::json_builder()
//!     .intercept_parsed(|value: Value, metadata: ResponseMetadata| {
//!         if let Some(error) = value.get("error") {
//!             let code = error["code"].as_str().unwrap_or_default();
//!             let message = error["message"].as_str().unwrap_or_default();
//!             return Err(ValidationError::api(code, message).into());
//!         }
//!         Ok((value, metadata))
//!     })
//!     .build();
//! ```
//!
//! ## Instance Stage
//!
//! Domain invariants, checked on the typed value.
//!
//! ```ignore
//! let pipeline = Pipeline::<_, User>::json_builder()
//!     .intercept_instance(|user: User, metadata: ResponseMetadata| {
//!         if user.name.is_empty() {
//!             Err(DecodeError::rejected("empty name"))
//!         } else {
//!             Ok((user, metadata))
//!         }
//!     })
//!     .build();
//! ```
//!
//! Each interceptor returns the metadata to hand to the next step, so a stage
//! may rewrite headers or the status without touching the original value.
//!
//! ## Next Steps
//!
//! - [Chapter 2: Error Handling][super::chapter_2] - Telling failures apart
