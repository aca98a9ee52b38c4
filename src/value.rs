use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

/// Ordered key/value map used for request arrays.
///
/// Insertion order is preserved so that list-style inputs (`tags[]=a&tags[]=b`)
/// come back in the order the client sent them.
pub type InputMap = IndexMap<String, InputValue>;

/// A single loosely-typed value taken from request input.
///
/// Request parameters arrive as strings, nested arrays, or uploaded files.
/// JSON bodies additionally carry booleans, numbers and `null`. `InputValue`
/// holds any of these without interpreting them; conversion into a typed
/// field happens later through [`FromInput`](crate::FromInput).
///
/// # Examples
///
/// ```
/// use request_hydrate::InputValue;
///
/// assert!(InputValue::from("").is_empty());
/// assert!(InputValue::from("0").is_empty());
/// assert!(!InputValue::from("Kristoffer").is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    /// Explicit null (JSON `null`)
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
    /// Nested array; lists use the keys `"0"`, `"1"`, ...
    Array(InputMap),
    /// Uploaded file handle
    File(UploadedFile),
}

impl InputValue {
    /// Builds a list-style array keyed by position.
    pub fn list(values: impl IntoIterator<Item = InputValue>) -> Self {
        InputValue::Array(
            values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
        )
    }

    /// Returns `true` when the value counts as "not provided".
    ///
    /// Empty values are `Null`, `false`, `0`, `0.0`, `""`, `"0"` and empty
    /// arrays. Uploaded files are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            InputValue::Null => true,
            InputValue::Bool(b) => !b,
            InputValue::Int(i) => *i == 0,
            InputValue::Float(f) => *f == 0.0,
            InputValue::String(s) => s.is_empty() || s == "0",
            InputValue::Array(map) => map.is_empty(),
            InputValue::File(_) => false,
        }
    }

    /// Returns `true` for booleans, numbers and strings.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            InputValue::Bool(_) | InputValue::Int(_) | InputValue::Float(_) | InputValue::String(_)
        )
    }

    /// Returns the string slice if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            InputValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested map if this is an array value.
    pub fn as_array(&self) -> Option<&InputMap> {
        match self {
            InputValue::Array(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the uploaded file if this is a file value.
    pub fn as_file(&self) -> Option<&UploadedFile> {
        match self {
            InputValue::File(file) => Some(file),
            _ => None,
        }
    }

    /// Renders a scalar as text.
    ///
    /// Booleans render as `"1"` / `""`. Returns `None` for null, arrays and files.
    pub fn to_scalar_string(&self) -> Option<String> {
        match self {
            InputValue::Bool(true) => Some("1".to_string()),
            InputValue::Bool(false) => Some(String::new()),
            InputValue::Int(i) => Some(i.to_string()),
            InputValue::Float(f) => Some(f.to_string()),
            InputValue::String(s) => Some(s.clone()),
            InputValue::Null | InputValue::Array(_) | InputValue::File(_) => None,
        }
    }

    /// Short name of the value's shape, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            InputValue::Null => "null",
            InputValue::Bool(_) => "bool",
            InputValue::Int(_) => "int",
            InputValue::Float(_) => "float",
            InputValue::String(_) => "string",
            InputValue::Array(_) => "array",
            InputValue::File(_) => "file",
        }
    }
}

/// Recursively overlays `overlay` onto `base`.
///
/// When both sides hold an array under the same key the arrays are merged
/// key by key; otherwise the overlay value replaces the base value. Keys new
/// to `base` are appended in overlay order.
pub(crate) fn replace_recursive(base: &mut InputMap, overlay: &InputMap) {
    for (key, value) in overlay {
        match (base.get_mut(key), value) {
            (Some(InputValue::Array(existing)), InputValue::Array(incoming)) => {
                replace_recursive(existing, incoming);
            }
            (Some(slot), _) => *slot = value.clone(),
            (None, _) => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputValue::Null => write!(f, "null"),
            InputValue::Bool(b) => write!(f, "{}", b),
            InputValue::Int(i) => write!(f, "{}", i),
            InputValue::Float(x) => write!(f, "{}", x),
            InputValue::String(s) => write!(f, "{}", s),
            InputValue::Array(map) => write!(f, "array({})", map.len()),
            InputValue::File(file) => write!(f, "file({})", file.client_name()),
        }
    }
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        InputValue::String(value.to_string())
    }
}

impl From<String> for InputValue {
    fn from(value: String) -> Self {
        InputValue::String(value)
    }
}

impl From<bool> for InputValue {
    fn from(value: bool) -> Self {
        InputValue::Bool(value)
    }
}

impl From<i64> for InputValue {
    fn from(value: i64) -> Self {
        InputValue::Int(value)
    }
}

impl From<i32> for InputValue {
    fn from(value: i32) -> Self {
        InputValue::Int(i64::from(value))
    }
}

impl From<f64> for InputValue {
    fn from(value: f64) -> Self {
        InputValue::Float(value)
    }
}

impl From<InputMap> for InputValue {
    fn from(value: InputMap) -> Self {
        InputValue::Array(value)
    }
}

impl From<UploadedFile> for InputValue {
    fn from(value: UploadedFile) -> Self {
        InputValue::File(value)
    }
}

impl<T: Into<InputValue>> From<Vec<T>> for InputValue {
    fn from(values: Vec<T>) -> Self {
        InputValue::list(values.into_iter().map(Into::into))
    }
}

impl<T: Into<InputValue>> From<Option<T>> for InputValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(InputValue::Null, Into::into)
    }
}

impl From<serde_json::Value> for InputValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => InputValue::Null,
            serde_json::Value::Bool(b) => InputValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => InputValue::Int(i),
                None => n.as_f64().map_or(InputValue::Null, InputValue::Float),
            },
            serde_json::Value::String(s) => InputValue::String(s),
            serde_json::Value::Array(items) => {
                InputValue::list(items.into_iter().map(InputValue::from))
            }
            serde_json::Value::Object(fields) => InputValue::Array(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, InputValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Metadata for a file uploaded with the request.
///
/// The file contents are owned by the HTTP layer; this is an opaque handle
/// that points at the temporary location the upload was written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    client_name: String,
    mime_type: Option<String>,
    size: u64,
    path: PathBuf,
}

impl UploadedFile {
    /// Creates a new uploaded-file handle.
    pub fn new(client_name: impl Into<String>, path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            client_name: client_name.into(),
            mime_type: None,
            size,
            path: path.into(),
        }
    }

    /// Sets the MIME type reported by the client.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// File name as sent by the client. Not trustworthy.
    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    /// MIME type as sent by the client, if any.
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Temporary path of the uploaded content.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
