//! Stage interceptors and their default strategies.
//!
//! An [`Interceptor`] validates or rewrites one stage's value together with the
//! response metadata. The pipeline runs three of them:
//!
//! 1. on the raw body ([`Bytes`](bytes::Bytes)), defaulting to [`AcceptStatus`]
//! 2. on the parsed value, defaulting to [`PassThrough`]
//! 3. on the typed instance, defaulting to [`PassThrough`]
//!
//! Closures of the shape `Fn(T, ResponseMetadata) -> Result<(T, ResponseMetadata)>`
//! are interceptors too.

use std::ops::Range;

use http::header::CONTENT_TYPE;

use crate::{DecodeError, ResponseMetadata, Result, ValidationError};

/// Validates or transforms a stage value and its metadata.
///
/// Returning an error stops the pipeline: no later stage runs.
pub trait Interceptor<T>: Send + Sync {
    /// Intercept the value, returning the (possibly rewritten) pair.
    fn intercept(&self, value: T, metadata: ResponseMetadata) -> Result<(T, ResponseMetadata)>;
}

impl<T, F> Interceptor<T> for F
where
    F: Fn(T, ResponseMetadata) -> Result<(T, ResponseMetadata)> + Send + Sync,
{
    fn intercept(&self, value: T, metadata: ResponseMetadata) -> Result<(T, ResponseMetadata)> {
        self(value, metadata)
    }
}

// ============================================================================
// Pass Through
// ============================================================================

/// Identity interceptor, the default for the parsed and instance stages.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl<T> Interceptor<T> for PassThrough {
    fn intercept(&self, value: T, metadata: ResponseMetadata) -> Result<(T, ResponseMetadata)> {
        Ok((value, metadata))
    }
}

// ============================================================================
// Status Check
// ============================================================================

/// Status code check, the default for the bytes stage.
///
/// Fails with [`DecodeError::UnacceptableStatus`] unless the status lies in
/// the half-open range, `200..300` by default. Redirects (3xx) are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptStatus {
    range: Range<u16>,
}

impl Default for AcceptStatus {
    fn default() -> Self {
        Self { range: 200..300 }
    }
}

impl AcceptStatus {
    /// Accept 2xx statuses only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept statuses in `range` (end excluded).
    #[must_use]
    pub const fn range(range: Range<u16>) -> Self {
        Self { range }
    }

    /// Returns `true` if `status` is accepted.
    #[must_use]
    pub fn accepts(&self, status: u16) -> bool {
        self.range.contains(&status)
    }

    fn check(&self, metadata: &ResponseMetadata) -> Result<()> {
        let status = metadata.status();
        if self.accepts(status) {
            Ok(())
        } else {
            Err(DecodeError::unacceptable_status(status))
        }
    }
}

impl<T> Interceptor<T> for AcceptStatus {
    fn intercept(&self, value: T, metadata: ResponseMetadata) -> Result<(T, ResponseMetadata)> {
        self.check(&metadata)?;
        Ok((value, metadata))
    }
}

// ============================================================================
// Content-Type Check
// ============================================================================

/// Status check followed by a `Content-Type` check.
///
/// Only the media type is compared (parameters such as `charset` are
/// ignored), case-insensitively. A missing header is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireContentType {
    media_type: String,
    status: AcceptStatus,
}

impl RequireContentType {
    /// Require `media_type` on 2xx responses.
    #[must_use]
    pub fn new(media_type: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
            status: AcceptStatus::default(),
        }
    }

    /// Use another status policy.
    #[must_use]
    pub fn with_status(mut self, status: AcceptStatus) -> Self {
        self.status = status;
        self
    }

    /// Expected media type.
    #[must_use]
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    fn check(&self, metadata: &ResponseMetadata) -> Result<()> {
        let reject = |reason: String| -> Result<()> {
            Err(DecodeError::from(ValidationError::field("content-type", reason)))
        };

        let Some(value) = metadata.headers().get(CONTENT_TYPE) else {
            return reject(format!("expected `{}`, header is missing", self.media_type));
        };
        let Ok(value) = value.to_str() else {
            return reject(format!(
                "expected `{}`, header is not visible ASCII",
                self.media_type
            ));
        };

        let actual = value.split(';').next().unwrap_or_default().trim();
        if actual.eq_ignore_ascii_case(&self.media_type) {
            Ok(())
        } else {
            reject(format!("expected `{}`, got `{actual}`", self.media_type))
        }
    }
}

impl<T> Interceptor<T> for RequireContentType {
    fn intercept(&self, value: T, metadata: ResponseMetadata) -> Result<(T, ResponseMetadata)> {
        self.status.check(&metadata)?;
        self.check(&metadata)?;
        Ok((value, metadata))
    }
}
