//! # Chapter 2: Error Handling
//!
//! One decode call yields at most one error, and its kind says which step
//! failed.
//!
//! | Variant                                | Raised by            | Usual remediation |
//! |----------------------------------------|----------------------|-------------------|
//! | `DecodeError::UnacceptableStatus(code)`| bytes stage          | retry / re-auth   |
//! | `DecodeError::Parse(_)`                | the parser           | bug report        |
//! | `DecodeError::Construction(_)`         | the constructor      | bug report        |
//! | `DecodeError::Validation(_)`           | parsed/instance stage| alert             |
//!
//! ```ignore
//! match decant::decode_http(&pipeline, response).await {
//!     Ok((user, _)) => println!("User: {user:?}"),
//!     Err(decant::Error::Body(message)) => eprintln!("transport: {message}"),
//!     Err(decant::Error::Decode(err)) => match err.kind() {
//!         DecodeErrorKind::UnacceptableStatus => retry_later(err.status()),
//!         DecodeErrorKind::Parse | DecodeErrorKind::Construction => report_bug(&err),
//!         DecodeErrorKind::Validation => alert(&err),
//!     },
//! }
//! ```
//!
//! The pipeline never retries; that decision belongs to the caller.
