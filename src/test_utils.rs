//! Shared proptest strategies for unit tests.

use proptest::prelude::*;

use crate::value::InputValue;

/// Field or input key: lowercase identifier.
pub(crate) fn arb_key() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,11}").unwrap()
}

/// String value that is never considered empty.
pub(crate) fn arb_non_empty_text() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z][A-Za-z0-9 @._-]{0,31}").unwrap()
}

/// A value that counts as "not provided".
pub(crate) fn arb_empty_value() -> impl Strategy<Value = InputValue> {
    prop_oneof![
        Just(InputValue::Null),
        Just(InputValue::from("")),
        Just(InputValue::from("0")),
        Just(InputValue::Bool(false)),
        Just(InputValue::Int(0)),
        Just(InputValue::Float(0.0)),
        Just(InputValue::Array(Default::default())),
    ]
}
