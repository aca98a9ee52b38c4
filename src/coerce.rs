//! Conversion of raw input values into typed field values.
//!
//! Request input is stringly typed: a form sends `age=30` as the text `"30"`.
//! [`FromInput`] is the hook target fields use to turn an [`InputValue`] into
//! their declared type. The resolver never converts anything itself; it only
//! decides *which* raw value a field receives.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::error::{CoerceError, CoerceErrorKind};
use crate::field::FieldKind;
use crate::value::{InputMap, InputValue, UploadedFile};

/// Conversion from a raw input value into a typed field value.
///
/// Implemented for the common scalar types, dates, lists, maps, files and
/// `Option<T>`. Types declared with [`hydratable!`](crate::hydratable) also
/// implement it, which is how nested objects are hydrated.
///
/// # Examples
///
/// ```
/// use request_hydrate::{FromInput, InputValue};
///
/// assert_eq!(i64::from_input(InputValue::from("30")).unwrap(), 30);
/// assert_eq!(Option::<i64>::from_input(InputValue::from("")).unwrap(), None);
/// assert!(bool::from_input(InputValue::from("yes")).unwrap());
/// ```
pub trait FromInput: Sized {
    /// Semantic kind reported for fields of this type.
    const KIND: FieldKind;

    /// Whether the type accepts "no value".
    const OPTIONAL: bool = false;

    /// Converts a raw input value.
    ///
    /// # Errors
    ///
    /// Returns `CoerceError` when the value has the wrong shape or does not parse.
    fn from_input(value: InputValue) -> Result<Self, CoerceError>;
}

fn mismatch(expected: &str, value: &InputValue) -> CoerceError {
    CoerceError::new(
        CoerceErrorKind::TypeMismatch,
        format!("expected {}, got {}", expected, value.type_name()),
    )
}

/// Parses a numeric string: optional sign, digits, decimal point, exponent.
///
/// Surrounding whitespace is ignored. `inf`/`nan` are rejected.
pub(crate) fn parse_numeric(text: &str) -> Option<f64> {
    let text = text.trim();
    let allowed = |b: u8| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E');
    if text.is_empty() || !text.bytes().all(allowed) || !text.bytes().any(|b| b.is_ascii_digit())
    {
        return None;
    }
    text.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Interprets a boolean flag the way HTML forms send them.
///
/// `1/true/on/yes` are true, `0/false/off/no` and the empty string are false,
/// anything else is not a flag. Case-insensitive.
pub(crate) fn parse_bool_flag(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" | "" => Some(false),
        _ => None,
    }
}

const FALLBACK_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parses a date or date-time string.
///
/// With an explicit `format` only that format is tried (date-only formats
/// resolve to midnight). Without one, RFC 3339 is tried first, then a few
/// common form layouts, then a bare `YYYY-MM-DD` date.
pub(crate) fn parse_date_time(text: &str, format: Option<&str>) -> Result<NaiveDateTime, CoerceError> {
    let text = text.trim();

    if let Some(format) = format {
        return NaiveDateTime::parse_from_str(text, format)
            .or_else(|_| NaiveDate::parse_from_str(text, format).map(|d| d.and_time(NaiveTime::MIN)))
            .map_err(|e| {
                CoerceError::new(
                    CoerceErrorKind::Malformed,
                    format!("unable to parse date with the given format {}: {}", format, e),
                )
            });
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.naive_utc());
    }
    for format in FALLBACK_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|_| CoerceError::new(CoerceErrorKind::Malformed, "unrecognized date/time"))
}

/// Basic e-mail address shape check.
///
/// One `@`, a non-empty local part, a dotted domain with non-empty labels,
/// no whitespace. Deliverability is not checked.
pub(crate) fn is_valid_email(text: &str) -> bool {
    if text.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return false;
    }
    domain
        .split('.')
        .all(|label| !label.is_empty() && label.chars().all(|c| c.is_alphanumeric() || c == '-'))
}

fn float_to_i64(f: f64) -> Result<i64, CoerceError> {
    if f.fract() != 0.0 {
        return Err(CoerceError::new(
            CoerceErrorKind::Malformed,
            "not a whole number",
        ));
    }
    if !(-9.223_372_036_854_775_808e18..9.223_372_036_854_775_808e18).contains(&f) {
        return Err(CoerceError::new(
            CoerceErrorKind::OutOfRange,
            "integer overflow",
        ));
    }
    Ok(f as i64)
}

impl FromInput for String {
    const KIND: FieldKind = FieldKind::String;

    fn from_input(value: InputValue) -> Result<Self, CoerceError> {
        value
            .to_scalar_string()
            .ok_or_else(|| mismatch("string", &value))
    }
}

impl FromInput for i64 {
    const KIND: FieldKind = FieldKind::Int;

    fn from_input(value: InputValue) -> Result<Self, CoerceError> {
        match value {
            InputValue::Int(i) => Ok(i),
            InputValue::Bool(b) => Ok(i64::from(b)),
            InputValue::Float(f) => float_to_i64(f),
            InputValue::String(s) => {
                if let Ok(i) = s.trim().parse::<i64>() {
                    return Ok(i);
                }
                match parse_numeric(&s) {
                    Some(f) => float_to_i64(f),
                    None => Err(CoerceError::new(CoerceErrorKind::Malformed, "not a number")),
                }
            }
            other => Err(mismatch("int", &other)),
        }
    }
}

macro_rules! narrow_int {
    ($($ty:ty),*) => {
        $(
            impl FromInput for $ty {
                const KIND: FieldKind = FieldKind::Int;

                fn from_input(value: InputValue) -> Result<Self, CoerceError> {
                    let wide = i64::from_input(value)?;
                    <$ty>::try_from(wide).map_err(|_| {
                        CoerceError::new(
                            CoerceErrorKind::OutOfRange,
                            concat!("does not fit in ", stringify!($ty)),
                        )
                    })
                }
            }
        )*
    };
}

narrow_int!(i32, u32, u64, usize);

impl FromInput for f64 {
    const KIND: FieldKind = FieldKind::Float;

    fn from_input(value: InputValue) -> Result<Self, CoerceError> {
        match value {
            InputValue::Float(f) => Ok(f),
            InputValue::Int(i) => Ok(i as f64),
            InputValue::Bool(b) => Ok(if b { 1.0 } else { 0.0 }),
            InputValue::String(s) => parse_numeric(&s)
                .ok_or_else(|| CoerceError::new(CoerceErrorKind::Malformed, "not a number")),
            other => Err(mismatch("float", &other)),
        }
    }
}

impl FromInput for bool {
    const KIND: FieldKind = FieldKind::Bool;

    fn from_input(value: InputValue) -> Result<Self, CoerceError> {
        match value {
            InputValue::Bool(b) => Ok(b),
            InputValue::Int(i) => Ok(i != 0),
            InputValue::Float(f) => Ok(f != 0.0),
            InputValue::String(s) => parse_bool_flag(&s)
                .ok_or_else(|| CoerceError::new(CoerceErrorKind::Malformed, "not a boolean flag")),
            other => Err(mismatch("bool", &other)),
        }
    }
}

impl FromInput for NaiveDateTime {
    const KIND: FieldKind = FieldKind::DateTime;

    fn from_input(value: InputValue) -> Result<Self, CoerceError> {
        match value {
            InputValue::String(s) => parse_date_time(&s, None),
            other => Err(mismatch("date/time string", &other)),
        }
    }
}

impl FromInput for NaiveDate {
    const KIND: FieldKind = FieldKind::DateTime;

    fn from_input(value: InputValue) -> Result<Self, CoerceError> {
        NaiveDateTime::from_input(value).map(|dt| dt.date())
    }
}

impl FromInput for DateTime<Utc> {
    const KIND: FieldKind = FieldKind::DateTime;

    fn from_input(value: InputValue) -> Result<Self, CoerceError> {
        let naive = NaiveDateTime::from_input(value)?;
        Ok(Utc.from_utc_datetime(&naive))
    }
}

impl<T: FromInput> FromInput for Vec<T> {
    const KIND: FieldKind = FieldKind::Array;

    fn from_input(value: InputValue) -> Result<Self, CoerceError> {
        match value {
            InputValue::Array(map) => map.into_values().map(T::from_input).collect(),
            other => Err(mismatch("array", &other)),
        }
    }
}

impl FromInput for InputMap {
    const KIND: FieldKind = FieldKind::Array;

    fn from_input(value: InputValue) -> Result<Self, CoerceError> {
        match value {
            InputValue::Array(map) => Ok(map),
            other => Err(mismatch("array", &other)),
        }
    }
}

impl FromInput for UploadedFile {
    const KIND: FieldKind = FieldKind::File;

    fn from_input(value: InputValue) -> Result<Self, CoerceError> {
        match value {
            InputValue::File(file) => Ok(file),
            other => Err(mismatch("file", &other)),
        }
    }
}

impl FromInput for InputValue {
    const KIND: FieldKind = FieldKind::Mixed;

    fn from_input(value: InputValue) -> Result<Self, CoerceError> {
        Ok(value)
    }
}

impl<T: FromInput> FromInput for Option<T> {
    const KIND: FieldKind = T::KIND;
    const OPTIONAL: bool = true;

    fn from_input(value: InputValue) -> Result<Self, CoerceError> {
        match value {
            InputValue::Null => Ok(None),
            InputValue::String(ref s) if s.is_empty() => Ok(None),
            other => T::from_input(other).map(Some),
        }
    }
}
