use std::error::Error as StdError;
use std::fmt;

/// A type-erased error used as the cause of an [`InvalidDataError`].
pub type BoxError = Box<dyn StdError + Send + Sync>;

pub type Result<T, E = InvalidDataError> = std::result::Result<T, E>;

/// Error returned when JSON data does not fit the shape a model expects.
///
/// Every failure raised while decoding unions, enums and raw objects is one of these. The
/// [`kind`](InvalidDataError::kind) says what went wrong, and for union dispatch failures
/// [`variant`](InvalidDataError::variant) names the payload type that was attempted.
#[derive(Debug)]
pub struct InvalidDataError {
    kind: InvalidDataKind,
    message: String,
    variant: Option<&'static str>,
    source: Option<BoxError>,
}

/// The category of an [`InvalidDataError`].
#[derive(displaydoc::Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum InvalidDataKind {
    /// discriminator field is missing or not a string
    MissingDiscriminator,
    /// no known variant for discriminator
    UnknownVariant,
    /// payload does not match its variant
    ShapeMismatch,
    /// required field is missing
    MissingField,
    /// field has an unexpected type
    InvalidField,
    /// expected a JSON object
    NotAnObject,
    /// field is declared by the record
    DeclaredField,
    /// unrecognized enum value
    UnrecognizedEnumValue,
    /// JSON error
    Json,
}

impl InvalidDataError {
    pub fn new<S: Into<String>>(kind: InvalidDataKind, message: S) -> Self {
        Self {
            kind,
            message: message.into(),
            variant: None,
            source: None,
        }
    }

    /// Set this error's underlying `source`.
    pub fn with_source<E: Into<BoxError>>(mut self, source: E) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the name of the payload type that was being decoded.
    pub fn with_variant(mut self, variant: &'static str) -> Self {
        self.variant = Some(variant);
        self
    }

    pub(crate) fn missing_discriminator(union: &str, field: &str) -> Self {
        Self::new(
            InvalidDataKind::MissingDiscriminator,
            format!("{} requires a string `{}` field", union, field),
        )
    }

    pub(crate) fn unknown_variant(union: &str, field: &str, value: &str) -> Self {
        Self::new(
            InvalidDataKind::UnknownVariant,
            format!("{} has no variant for {} {:?}", union, field, value),
        )
    }

    pub(crate) fn shape_mismatch<E: Into<BoxError>>(
        union: &str,
        variant: &'static str,
        source: E,
    ) -> Self {
        Self::new(
            InvalidDataKind::ShapeMismatch,
            format!("{} could not be decoded as {}", union, variant),
        )
        .with_variant(variant)
        .with_source(source)
    }

    pub fn kind(&self) -> InvalidDataKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The payload type that was attempted, if this error came from variant dispatch.
    pub fn variant(&self) -> Option<&'static str> {
        self.variant
    }

    /// Consumes the error, returning its source.
    pub fn into_source(self) -> Option<BoxError> {
        self.source
    }

    /// Check if any error in this error's `source` chain matches the given kind.
    pub fn has_kind(&self, kind: InvalidDataKind) -> bool {
        if self.kind == kind {
            return true;
        }

        let mut source = self.source();

        while let Some(e) = source {
            match e.downcast_ref::<Self>() {
                Some(found) if found.kind == kind => return true,
                _ => source = e.source(),
            }
        }

        false
    }

    /// Recurse through this error's `source` chain, returning the first matching error type.
    pub fn find_source<E: StdError + 'static>(&self) -> Option<&E> {
        let mut source = self.source();

        while let Some(e) = source {
            match e.downcast_ref::<E>() {
                Some(found) => return Some(found),
                None => source = e.source(),
            }
        }

        None
    }
}

impl fmt::Display for InvalidDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(ref source) = self.source {
            write!(f, ": {}", source)?;
        }
        Ok(())
    }
}

impl StdError for InvalidDataError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|cause| &**cause as &(dyn StdError + 'static))
    }
}

impl From<serde_json::Error> for InvalidDataError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(InvalidDataKind::Json, "failed to convert JSON").with_source(error)
    }
}

/// Error returned when every candidate of an untagged union failed to decode.
///
/// Holds one [`InvalidDataError`] per candidate, in the order they were attempted.
#[derive(thiserror::Error, Debug)]
#[error("{union} matched none of its {} variants", errors.len())]
pub struct AggregateInvalidDataError {
    union: &'static str,
    errors: Vec<InvalidDataError>,
}

impl AggregateInvalidDataError {
    pub fn new(union: &'static str, errors: Vec<InvalidDataError>) -> Self {
        Self { union, errors }
    }

    /// Name of the union that failed to decode.
    pub fn union(&self) -> &'static str {
        self.union
    }

    pub fn errors(&self) -> &[InvalidDataError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<InvalidDataError> {
        self.errors
    }
}
