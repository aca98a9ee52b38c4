//! Request adapter for assembling [`InputSource`] values from raw request parts.

use url::form_urlencoded;

use crate::error::InputError;
use crate::input::InputSource;
use crate::value::{InputMap, InputValue, UploadedFile};

use super::ExtractInput;

/// Adapter for converting framework-specific HTTP requests into an [`InputSource`].
///
/// `RequestAdapter` collects query and body parameters from whatever the
/// HTTP layer provides: already-decoded key/value pairs, a raw query string,
/// a URL-encoded form body, or a JSON body. Framework-specific code should
/// build one of these (or implement [`ExtractInput`] directly) and pass the
/// resulting `InputSource` to the resolver.
///
/// Raw query strings and form bodies understand bracket notation:
/// `filter[status]=open&tags[]=a&tags[]=b` becomes a nested `filter` array
/// and a `tags` list.
///
/// # Examples
///
/// ```
/// use request_hydrate::web::{ExtractInput, RequestAdapter};
/// use request_hydrate::InputValue;
///
/// let mut adapter = RequestAdapter::new();
/// adapter.add_query_string("page=2&tags[]=rust&tags[]=web");
/// adapter.add_body_param("name", "Kristoffer");
///
/// let input = adapter.extract_input();
/// assert_eq!(input.input("name"), Some(&InputValue::from("Kristoffer")));
/// assert_eq!(input.input_int("page"), Some(2));
/// assert_eq!(input.input_array("tags").map(|t| t.len()), Some(2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestAdapter {
    /// Query parameters from the URL
    query: InputMap,
    /// Body parameters (form fields, JSON fields, files)
    body: InputMap,
}

impl RequestAdapter {
    /// Creates an empty adapter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a query parameter under a literal key.
    pub fn add_query_param(&mut self, key: impl Into<String>, value: impl Into<InputValue>) {
        self.query.insert(key.into(), value.into());
    }

    /// Adds a body parameter under a literal key.
    pub fn add_body_param(&mut self, key: impl Into<String>, value: impl Into<InputValue>) {
        self.body.insert(key.into(), value.into());
    }

    /// Adds an uploaded file. Files live with the body parameters; a key
    /// containing brackets (`docs[]`) nests the file like a form field.
    pub fn add_file(&mut self, key: &str, file: UploadedFile) {
        insert_bracketed(&mut self.body, key, InputValue::File(file));
    }

    /// Parses a URL query string (without the leading `?`) into query parameters.
    pub fn add_query_string(&mut self, query: &str) {
        parse_urlencoded_into(&mut self.query, query);
    }

    /// Parses an `application/x-www-form-urlencoded` body into body parameters.
    pub fn add_form_body(&mut self, body: &str) {
        parse_urlencoded_into(&mut self.body, body);
    }

    /// Parses a JSON object body into body parameters.
    ///
    /// Top-level fields are merged into any body parameters already present.
    /// An empty or whitespace-only body adds nothing.
    ///
    /// # Errors
    ///
    /// Returns `InputError` if the body is not valid JSON or not a JSON object.
    pub fn add_json_body(&mut self, body: &str) -> Result<(), InputError> {
        if body.trim().is_empty() {
            return Ok(());
        }
        let json: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| InputError::new(format!("body is not valid JSON: {}", e)))?;
        match json {
            serde_json::Value::Object(fields) => {
                for (key, value) in fields {
                    self.body.insert(key, InputValue::from(value));
                }
                Ok(())
            }
            other => Err(InputError::new(format!(
                "JSON body must be an object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Returns the query parameters collected so far.
    pub fn query_params(&self) -> &InputMap {
        &self.query
    }

    /// Returns the body parameters collected so far.
    pub fn body_params(&self) -> &InputMap {
        &self.body
    }
}

impl ExtractInput for RequestAdapter {
    fn extract_input(&self) -> InputSource {
        InputSource::new(self.query.clone(), self.body.clone())
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

fn parse_urlencoded_into(map: &mut InputMap, encoded: &str) {
    for (key, value) in form_urlencoded::parse(encoded.as_bytes()) {
        insert_bracketed(map, &key, InputValue::String(value.into_owned()));
    }
}

/// Deepest bracket nesting accepted in a form or query key.
const MAX_NESTING: usize = 64;

/// Splits `a[b][]` into `("a", [Some("b"), None])`.
///
/// Returns `None` for an empty base name or for keys nested deeper than
/// [`MAX_NESTING`]. A key whose brackets do not close is kept literally.
/// Text after the last closing bracket is ignored.
fn split_key(raw: &str) -> Option<(&str, Vec<Option<&str>>)> {
    let Some(open) = raw.find('[') else {
        return (!raw.is_empty()).then_some((raw, Vec::new()));
    };
    let base = &raw[..open];
    if base.is_empty() {
        return None;
    }

    let mut segments = Vec::new();
    let mut rest = &raw[open..];
    while let Some(stripped) = rest.strip_prefix('[') {
        let Some(close) = stripped.find(']') else {
            break;
        };
        let segment = &stripped[..close];
        if segments.len() == MAX_NESTING {
            return None;
        }
        segments.push((!segment.is_empty()).then_some(segment));
        rest = &stripped[close + 1..];
    }

    if segments.is_empty() {
        return Some((raw, Vec::new()));
    }
    Some((base, segments))
}

/// Next list position after the largest integer key, or `None` once the
/// largest key is `i64::MAX`.
fn next_index(map: &InputMap) -> Option<i64> {
    match map.keys().filter_map(|k| k.parse::<i64>().ok()).max() {
        Some(max) => max.checked_add(1),
        None => Some(0),
    }
}

fn insert_path(map: &mut InputMap, key: String, rest: &[Option<&str>], value: InputValue) {
    let Some((next, tail)) = rest.split_first() else {
        map.insert(key, value);
        return;
    };

    let slot = map
        .entry(key)
        .or_insert_with(|| InputValue::Array(InputMap::new()));
    if !matches!(slot, InputValue::Array(_)) {
        *slot = InputValue::Array(InputMap::new());
    }
    if let InputValue::Array(child) = slot {
        let child_key = match next {
            Some(name) => (*name).to_string(),
            None => match next_index(child) {
                Some(index) => index.to_string(),
                None => return,
            },
        };
        insert_path(child, child_key, tail, value);
    }
}

fn insert_bracketed(map: &mut InputMap, raw_key: &str, value: InputValue) {
    if let Some((base, segments)) = split_key(raw_key) {
        insert_path(map, base.to_string(), &segments, value);
    }
}
