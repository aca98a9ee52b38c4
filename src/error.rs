use std::fmt;

use crate::field::FieldKind;

/// Errors that abort a hydration call.
///
/// At most one error is produced per call; it belongs to the first field in
/// the target's declaration order that fails. No partially-populated entity
/// is ever returned alongside an error.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// A required field resolved to an empty value
    MissingRequiredField {
        /// Name of the target field
        field: String,
    },
    /// A resolved value could not be converted into the field's declared kind
    InvalidValue {
        /// Name of the target field
        field: String,
        /// Kind the field declares
        expected: FieldKind,
        /// Why the conversion failed
        source: CoerceError,
    },
    /// The target was asked to set a field it does not declare
    UnknownField {
        /// Name that was not recognized
        field: String,
    },
}

impl DecodeError {
    /// Creates a missing-required-field error.
    pub fn missing_required(field: impl Into<String>) -> Self {
        DecodeError::MissingRequiredField {
            field: field.into(),
        }
    }

    /// Creates an invalid-value error.
    pub fn invalid_value(field: impl Into<String>, expected: FieldKind, source: CoerceError) -> Self {
        DecodeError::InvalidValue {
            field: field.into(),
            expected,
            source,
        }
    }

    /// Creates an unknown-field error.
    pub fn unknown_field(field: impl Into<String>) -> Self {
        DecodeError::UnknownField {
            field: field.into(),
        }
    }

    /// Returns the name of the field the error belongs to.
    pub fn field(&self) -> &str {
        match self {
            DecodeError::MissingRequiredField { field }
            | DecodeError::InvalidValue { field, .. }
            | DecodeError::UnknownField { field } => field,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::MissingRequiredField { field } => {
                write!(f, "Missing required property: {}", field)
            }
            DecodeError::InvalidValue {
                field,
                expected,
                source,
            } => write!(
                f,
                "Invalid value for property '{}' (expected {}): {}",
                field, expected, source
            ),
            DecodeError::UnknownField { field } => write!(f, "Unknown property: {}", field),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::InvalidValue { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Error returned when an input value cannot be converted to a typed value.
///
/// Messages describe the shape of the rejected input, never its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoerceError {
    kind: CoerceErrorKind,
    message: String,
}

impl CoerceError {
    /// Creates a new coercion error.
    pub fn new(kind: CoerceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> CoerceErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CoerceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for CoerceError {}

/// Kind of coercion error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoerceErrorKind {
    /// The value has the wrong shape (e.g. an array where a scalar is expected)
    TypeMismatch,
    /// The value is a string that does not parse
    Malformed,
    /// The value parses but does not fit the target type
    OutOfRange,
    /// A nested object failed to hydrate
    Nested,
}

impl fmt::Display for CoerceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch => write!(f, "type mismatch"),
            Self::Malformed => write!(f, "malformed value"),
            Self::OutOfRange => write!(f, "out of range"),
            Self::Nested => write!(f, "nested object"),
        }
    }
}

/// Error raised while assembling request input at the web boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputError {
    message: String,
}

impl InputError {
    /// Creates a new input error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid request input: {}", self.message)
    }
}

impl std::error::Error for InputError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn missing_required_display() {
        let err = DecodeError::missing_required("email");
        assert_eq!(err.to_string(), "Missing required property: email");
        assert_eq!(err.field(), "email");
        assert!(err.source().is_none());
    }

    #[test]
    fn invalid_value_display_and_source() {
        let err = DecodeError::invalid_value(
            "age",
            FieldKind::Int,
            CoerceError::new(CoerceErrorKind::Malformed, "not a number"),
        );
        assert_eq!(
            err.to_string(),
            "Invalid value for property 'age' (expected int): malformed value: not a number"
        );
        assert_eq!(err.field(), "age");
        assert!(err.source().is_some());
    }

    #[test]
    fn unknown_field_display() {
        let err = DecodeError::unknown_field("nickname");
        assert_eq!(err.to_string(), "Unknown property: nickname");
    }

    #[test]
    fn input_error_display() {
        let err = InputError::new("body is not a JSON object");
        assert_eq!(err.message(), "body is not a JSON object");
        assert_eq!(
            err.to_string(),
            "invalid request input: body is not a JSON object"
        );
    }
}
