//! Error types for decant.
//!
//! Every failure of a decode call ends up as one [`DecodeError`]. The variant
//! tells which step failed, so callers can tell a non-2xx status apart from a
//! malformed body, a body that cannot build the typed value, or a value that
//! an interceptor rejected.

use derive_more::{Display, Error, From};

// ============================================================================
// Causes
// ============================================================================

/// Failure of a [`DataParser`](crate::DataParser) to read the raw body.
#[derive(Debug, Display, Error, From)]
pub enum ParseError {
    /// Malformed JSON, with the path where reading stopped.
    #[display("invalid JSON at '{path}': {message}")]
    #[from(skip)]
    Json {
        /// Path to the offending value (e.g. `items[2].id`).
        path: String,
        /// Error message.
        message: String,
    },

    /// Body is not valid UTF-8.
    #[display("body is not valid UTF-8: {_0}")]
    #[from]
    Utf8(std::str::Utf8Error),

    /// Malformed `application/x-www-form-urlencoded` body.
    #[display("invalid form body: {_0}")]
    #[from]
    Form(serde_urlencoded::de::Error),

    /// Parser-specific failure.
    #[display("{_0}")]
    #[from(skip)]
    Custom(#[error(not(source))] String),
}

impl ParseError {
    /// Create a JSON parse error with path context.
    #[must_use]
    pub fn json(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Json {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a custom parse error.
    #[must_use]
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}

/// Failure to build the typed instance from a parsed value.
#[derive(Debug, Display, Error)]
pub enum ConstructionError {
    /// A required field is absent.
    #[display("missing field `{_0}`")]
    MissingField(#[error(not(source))] String),

    /// A field is present but holds an unusable value.
    #[display("invalid field `{field}`: {reason}")]
    InvalidField {
        /// Field name.
        field: String,
        /// Why the value is unusable.
        reason: String,
    },

    /// Deserialization of the parsed value failed.
    #[display("cannot build value at '{path}': {message}")]
    Deserialize {
        /// Path to the field that failed (e.g. `user.address.city`).
        path: String,
        /// Error message.
        message: String,
    },

    /// Constructor-specific failure.
    #[display("{_0}")]
    Custom(#[error(not(source))] String),
}

impl ConstructionError {
    /// Create a missing field error.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    /// Create an invalid field error.
    #[must_use]
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a custom construction error.
    #[must_use]
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}

/// Rejection raised by a custom interceptor.
#[derive(Debug, Display, Error)]
pub enum ValidationError {
    /// Generic rejection with a reason.
    #[display("{_0}")]
    Rejected(#[error(not(source))] String),

    /// A single field broke a domain rule.
    #[display("field `{field}` rejected: {reason}")]
    Field {
        /// Field name.
        field: String,
        /// Rule that was broken.
        reason: String,
    },

    /// The API answered with an error envelope.
    #[display("API error {code}: {message}")]
    Api {
        /// API-level error code.
        code: String,
        /// API-level error message.
        message: String,
    },
}

impl ValidationError {
    /// Create a rejection with a reason.
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }

    /// Create a field rejection.
    #[must_use]
    pub fn field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Field {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an API error envelope rejection.
    #[must_use]
    pub fn api(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            code: code.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Decode Error
// ============================================================================

/// Unified error for a failed decode call.
#[derive(Debug, Display, Error, From)]
pub enum DecodeError {
    /// Status code outside the accepted range.
    #[display("unacceptable status code {_0}")]
    #[from(skip)]
    UnacceptableStatus(#[error(not(source))] u16),

    /// The body could not be parsed.
    #[display("parse error: {_0}")]
    #[from]
    Parse(ParseError),

    /// The typed instance could not be built.
    #[display("construction error: {_0}")]
    #[from]
    Construction(ConstructionError),

    /// An interceptor rejected the parsed value or the instance.
    #[display("validation error: {_0}")]
    #[from]
    Validation(ValidationError),
}

/// Result type alias using [`DecodeError`].
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Kind of a [`DecodeError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeErrorKind {
    /// See [`DecodeError::UnacceptableStatus`].
    UnacceptableStatus,
    /// See [`DecodeError::Parse`].
    Parse,
    /// See [`DecodeError::Construction`].
    Construction,
    /// See [`DecodeError::Validation`].
    Validation,
}

impl DecodeErrorKind {
    /// Stable label, suitable for log fields and metric labels.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UnacceptableStatus => "unacceptable_status",
            Self::Parse => "parse",
            Self::Construction => "construction",
            Self::Validation => "validation",
        }
    }
}

impl std::fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl DecodeError {
    /// Create an unacceptable status error.
    #[must_use]
    pub const fn unacceptable_status(status: u16) -> Self {
        Self::UnacceptableStatus(status)
    }

    /// Create a validation error from a rejection reason.
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Validation(ValidationError::rejected(reason))
    }

    /// Kind of this error.
    #[must_use]
    pub const fn kind(&self) -> DecodeErrorKind {
        match self {
            Self::UnacceptableStatus(_) => DecodeErrorKind::UnacceptableStatus,
            Self::Parse(_) => DecodeErrorKind::Parse,
            Self::Construction(_) => DecodeErrorKind::Construction,
            Self::Validation(_) => DecodeErrorKind::Validation,
        }
    }

    /// Returns the status code if this is an unacceptable status error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::UnacceptableStatus(status) => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if the status code was rejected.
    #[must_use]
    pub const fn is_unacceptable_status(&self) -> bool {
        matches!(self, Self::UnacceptableStatus(_))
    }

    /// Returns `true` if the body could not be parsed.
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }

    /// Returns `true` if the typed instance could not be built.
    #[must_use]
    pub const fn is_construction(&self) -> bool {
        matches!(self, Self::Construction(_))
    }

    /// Returns `true` if an interceptor rejected the response.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
