use chrono::NaiveDateTime;

use crate::coerce::{is_valid_email, parse_bool_flag, parse_date_time, parse_numeric};
use crate::error::{CoerceError, DecodeError};
use crate::hydrate::Hydrate;
use crate::policy::MappingPolicy;
use crate::resolver::EntityResolver;
use crate::value::{replace_recursive, InputMap, InputValue, UploadedFile};

/// Single-key lookup into request input.
///
/// This is the only view of the input the resolver needs. It is implemented
/// for [`InputSource`] (body first, then query) and for a plain [`InputMap`],
/// which is what nested objects are hydrated from.
pub trait InputLookup {
    /// Returns the value stored under `key`, if any. Keys are case-sensitive.
    fn lookup(&self, key: &str) -> Option<&InputValue>;
}

impl InputLookup for InputMap {
    fn lookup(&self, key: &str) -> Option<&InputValue> {
        self.get(key)
    }
}

/// Request input split by origin: body parameters and query parameters.
///
/// Two access paths exist and they deliberately disagree on precedence:
/// - single-key access ([`input`](Self::input) and the typed accessors)
///   checks the body first and only falls back to the query when the body
///   has no such key;
/// - [`all`](Self::all) merges both, with query values overwriting body
///   values.
///
/// Uploaded files are stored as [`InputValue::File`] alongside body fields.
///
/// # Examples
///
/// ```
/// use request_hydrate::{InputMap, InputSource, InputValue};
///
/// let mut body = InputMap::new();
/// body.insert("name".into(), "from-body".into());
/// let mut query = InputMap::new();
/// query.insert("name".into(), "from-query".into());
///
/// let input = InputSource::new(query, body);
/// assert_eq!(input.input("name"), Some(&InputValue::from("from-body")));
/// assert_eq!(input.all()["name"], InputValue::from("from-query"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSource {
    query: InputMap,
    body: InputMap,
}

impl InputSource {
    /// Creates an input source from query and body parameters.
    pub fn new(query: InputMap, body: InputMap) -> Self {
        Self { query, body }
    }

    /// Creates an input source holding only query parameters.
    pub fn from_query(query: InputMap) -> Self {
        Self::new(query, InputMap::new())
    }

    /// Creates an input source holding only body parameters.
    pub fn from_body(body: InputMap) -> Self {
        Self::new(InputMap::new(), body)
    }

    /// Query-string parameters.
    pub fn query(&self) -> &InputMap {
        &self.query
    }

    /// Body parameters (form or JSON fields, uploaded files).
    pub fn body(&self) -> &InputMap {
        &self.body
    }

    /// Returns the value for `key`: body first, then query.
    pub fn input(&self, key: &str) -> Option<&InputValue> {
        self.body.get(key).or_else(|| self.query.get(key))
    }

    /// Returns `true` if either origin has `key`.
    pub fn has(&self, key: &str) -> bool {
        self.input(key).is_some()
    }

    /// Returns body and query merged, query overwriting body recursively.
    pub fn all(&self) -> InputMap {
        let mut merged = self.body.clone();
        replace_recursive(&mut merged, &self.query);
        merged
    }

    /// Returns the uploaded file stored under `name`.
    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.input(name).and_then(InputValue::as_file)
    }

    /// Returns a scalar as text; `None` for missing, null, arrays and files.
    pub fn input_string(&self, key: &str) -> Option<String> {
        self.input(key).and_then(InputValue::to_scalar_string)
    }

    /// Returns a numeric value rounded to the nearest integer.
    pub fn input_int(&self, key: &str) -> Option<i64> {
        match self.input(key)? {
            InputValue::Int(i) => Some(*i),
            InputValue::Float(f) => Some(f.round() as i64),
            InputValue::String(s) => parse_numeric(s).map(|f| f.round() as i64),
            _ => None,
        }
    }

    /// Returns a scalar as a float; `None` when it is not numeric.
    pub fn input_float(&self, key: &str) -> Option<f64> {
        match self.input(key)? {
            InputValue::Int(i) => Some(*i as f64),
            InputValue::Float(f) => Some(*f),
            InputValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            InputValue::String(s) => parse_numeric(s),
            _ => None,
        }
    }

    /// Returns `true` only for truthy flags (`1`, `true`, `on`, `yes`).
    ///
    /// Missing keys and anything unrecognized yield `false`.
    pub fn input_bool(&self, key: &str) -> bool {
        match self.input(key) {
            Some(InputValue::Bool(b)) => *b,
            Some(InputValue::Int(i)) => *i == 1,
            Some(InputValue::Float(f)) => *f == 1.0,
            Some(InputValue::String(s)) => parse_bool_flag(s).unwrap_or(false),
            _ => false,
        }
    }

    /// Returns the nested array stored under `key`.
    pub fn input_array(&self, key: &str) -> Option<&InputMap> {
        self.input(key).and_then(InputValue::as_array)
    }

    /// Parses a date/time, returning `None` on missing, empty or unparseable input.
    ///
    /// See [`try_input_date_time`](Self::try_input_date_time) for the strict variant.
    pub fn input_date_time(&self, key: &str, format: Option<&str>) -> Option<NaiveDateTime> {
        self.try_input_date_time(key, format).ok().flatten()
    }

    /// Parses a date/time, reporting unparseable input as an error.
    ///
    /// Missing or empty input is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `CoerceError` when the value is present but does not parse.
    pub fn try_input_date_time(
        &self,
        key: &str,
        format: Option<&str>,
    ) -> Result<Option<NaiveDateTime>, CoerceError> {
        match self.input_string(key) {
            Some(text) if !InputValue::from(text.as_str()).is_empty() => {
                parse_date_time(&text, format).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Returns the trimmed value if it looks like an e-mail address.
    ///
    /// Surrounding whitespace is stripped from the returned address as well
    /// as before validation.
    pub fn input_email(&self, key: &str) -> Option<String> {
        let value = self.input_string(key)?;
        let value = value.trim();
        if value.is_empty() || !is_valid_email(value) {
            return None;
        }
        Some(value.to_string())
    }

    /// Hydrates `T` from this input using plain field-name lookup.
    ///
    /// # Errors
    ///
    /// See [`EntityResolver::decode`].
    pub fn decode<T: Hydrate + Default>(&self) -> Result<T, DecodeError> {
        EntityResolver::new(self).decode()
    }

    /// Hydrates `T` from this input under a configured mapping policy.
    ///
    /// # Errors
    ///
    /// See [`EntityResolver::decode_with`].
    pub fn decode_with<T, C>(&self, configure: C) -> Result<T, DecodeError>
    where
        T: Hydrate + Default,
        C: FnOnce(MappingPolicy) -> MappingPolicy,
    {
        EntityResolver::new(self).decode_with(configure)
    }
}

impl InputLookup for InputSource {
    fn lookup(&self, key: &str) -> Option<&InputValue> {
        self.input(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, InputValue)]) -> InputMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn single_key_lookup_prefers_body() {
        let input = InputSource::new(
            map(&[("a", "query".into()), ("q", "only-query".into())]),
            map(&[("a", "body".into())]),
        );
        assert_eq!(input.input("a"), Some(&InputValue::from("body")));
        assert_eq!(input.input("q"), Some(&InputValue::from("only-query")));
        assert_eq!(input.input("missing"), None);
        assert!(input.has("q"));
        assert!(!input.has("A"));
    }

    #[test]
    fn empty_body_value_still_shadows_query() {
        let input = InputSource::new(map(&[("a", "query".into())]), map(&[("a", "".into())]));
        assert_eq!(input.input("a"), Some(&InputValue::from("")));
    }

    #[test]
    fn all_lets_query_overwrite_body() {
        let input = InputSource::new(
            map(&[("a", "query".into())]),
            map(&[("a", "body".into()), ("b", "body-only".into())]),
        );
        let all = input.all();
        assert_eq!(all["a"], InputValue::from("query"));
        assert_eq!(all["b"], InputValue::from("body-only"));
    }

    #[test]
    fn typed_string_and_numbers() {
        let input = InputSource::from_query(map(&[
            ("s", "text".into()),
            ("n", "2.6".into()),
            ("i", InputValue::Int(7)),
            ("bad", "x1".into()),
            ("list", vec!["a"].into()),
        ]));
        assert_eq!(input.input_string("s").as_deref(), Some("text"));
        assert_eq!(input.input_string("i").as_deref(), Some("7"));
        assert_eq!(input.input_string("list"), None);
        assert_eq!(input.input_int("n"), Some(3));
        assert_eq!(input.input_int("i"), Some(7));
        assert_eq!(input.input_int("bad"), None);
        assert_eq!(input.input_float("n"), Some(2.6));
        assert_eq!(input.input_float("missing"), None);
    }

    #[test]
    fn typed_bool() {
        let input = InputSource::from_body(map(&[
            ("yes", "yes".into()),
            ("on", "ON".into()),
            ("zero", "0".into()),
            ("junk", "maybe".into()),
            ("json", InputValue::Bool(true)),
            ("one_float", InputValue::Float(1.0)),
            ("half", InputValue::Float(0.5)),
        ]));
        assert!(input.input_bool("one_float"));
        assert!(!input.input_bool("half"));
        assert!(input.input_bool("yes"));
        assert!(input.input_bool("on"));
        assert!(input.input_bool("json"));
        assert!(!input.input_bool("zero"));
        assert!(!input.input_bool("junk"));
        assert!(!input.input_bool("missing"));
    }

    #[test]
    fn typed_array_and_file() {
        let file = UploadedFile::new("cv.pdf", "/tmp/upload-1", 10);
        let input = InputSource::from_body(map(&[
            ("tags", vec!["a", "b"].into()),
            ("cv", file.clone().into()),
        ]));
        assert_eq!(input.input_array("tags").map(|m| m.len()), Some(2));
        assert_eq!(input.input_array("cv"), None);
        assert_eq!(input.file("cv"), Some(&file));
        assert_eq!(input.file("tags"), None);
    }

    #[test]
    fn typed_date_time() {
        let input = InputSource::from_query(map(&[
            ("iso", "2024-05-06T07:08:09Z".into()),
            ("custom", "06/05/2024".into()),
            ("empty", "".into()),
            ("junk", "not a date".into()),
        ]));
        assert_eq!(
            input.input_date_time("iso", None).unwrap().to_string(),
            "2024-05-06 07:08:09"
        );
        assert_eq!(
            input
                .input_date_time("custom", Some("%d/%m/%Y"))
                .unwrap()
                .to_string(),
            "2024-05-06 00:00:00"
        );
        assert_eq!(input.input_date_time("empty", None), None);
        assert_eq!(input.input_date_time("junk", None), None);
        assert_eq!(input.try_input_date_time("empty", None), Ok(None));
        assert!(input.try_input_date_time("junk", None).is_err());
    }

    #[test]
    fn typed_email() {
        let input = InputSource::from_body(map(&[
            ("ok", " kristoffer@example.com ".into()),
            ("bad", "kristoffer".into()),
            ("empty", "".into()),
        ]));
        assert_eq!(
            input.input_email("ok").as_deref(),
            Some("kristoffer@example.com")
        );
        assert_eq!(input.input_email("bad"), None);
        assert_eq!(input.input_email("empty"), None);
        assert_eq!(input.input_email("missing"), None);
    }

    #[test]
    fn plain_map_lookup() {
        let m = map(&[("k", "v".into())]);
        assert_eq!(m.lookup("k"), Some(&InputValue::from("v")));
        assert_eq!(m.lookup("K"), None);
    }
}
