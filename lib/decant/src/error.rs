//! Error type for transport adapters.

use derive_more::{Display, Error, From};

use decant_core::DecodeError;

/// Failure of a transport-level decode call.
///
/// Reading the body is a transport concern and stays separate from the
/// pipeline's [`DecodeError`].
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The response body could not be read.
    #[display("failed to read response body: {_0}")]
    #[from(skip)]
    Body(#[error(not(source))] String),

    /// The pipeline rejected the response.
    #[display("{_0}")]
    #[from]
    Decode(DecodeError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a body read error.
    #[must_use]
    pub fn body(message: impl Into<String>) -> Self {
        Self::Body(message.into())
    }

    /// Returns the decode error, if the pipeline ran and failed.
    #[must_use]
    pub const fn as_decode(&self) -> Option<&DecodeError> {
        match self {
            Self::Decode(err) => Some(err),
            Self::Body(_) => None,
        }
    }

    /// Returns the rejected status code, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.as_decode().and_then(DecodeError::status)
    }
}
