use std::fmt;

/// Semantic kind a target field declares.
///
/// The kind is informational: it is reported in errors and available to
/// callers that inspect [`Hydrate::FIELDS`](crate::Hydrate::FIELDS). The
/// actual conversion is done by the field type's
/// [`FromInput`](crate::FromInput) implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Text
    String,
    /// Integer
    Int,
    /// Boolean
    Bool,
    /// Floating point number
    Float,
    /// Date, or date and time
    DateTime,
    /// Array or list
    Array,
    /// Nested hydratable object
    Object,
    /// Uploaded file
    File,
    /// Raw input value, passed through unconverted
    Mixed,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::String => write!(f, "string"),
            FieldKind::Int => write!(f, "int"),
            FieldKind::Bool => write!(f, "bool"),
            FieldKind::Float => write!(f, "float"),
            FieldKind::DateTime => write!(f, "datetime"),
            FieldKind::Array => write!(f, "array"),
            FieldKind::Object => write!(f, "object"),
            FieldKind::File => write!(f, "file"),
            FieldKind::Mixed => write!(f, "mixed"),
        }
    }
}

/// Descriptor for one declared field of a target structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Field name, matched against input keys
    pub name: &'static str,
    /// Declared kind
    pub kind: FieldKind,
    /// Whether the field accepts "no value" (`Option<T>`)
    pub optional: bool,
}

impl Field {
    /// Creates a field descriptor.
    pub const fn new(name: &'static str, kind: FieldKind, optional: bool) -> Self {
        Self {
            name,
            kind,
            optional,
        }
    }
}
