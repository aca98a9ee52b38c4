use crate::error::DecodeError;
use crate::hydrate::{hydrate, Hydrate};
use crate::input::InputLookup;
use crate::policy::{MappingPolicy, PolicySnapshot};
use crate::value::InputValue;

/// Hydrates target structures from request input under a mapping policy.
///
/// For every declared field of the target, the resolver:
/// 1. yields no value if the field is excluded;
/// 2. otherwise looks up the field's effective key (its rename, or its own
///    name) in the input;
/// 3. fails with [`DecodeError::MissingRequiredField`] if the field is
///    required and the value is empty;
/// 4. otherwise hands the raw value to the target's setter for conversion.
///
/// Exclusion is applied before the required check, so a field that is both
/// required and excluded always fails.
///
/// # Examples
///
/// ```
/// use request_hydrate::{hydratable, EntityResolver, InputMap, InputSource};
///
/// hydratable! {
///     #[derive(Debug, Default)]
///     pub struct UserEntity {
///         pub name: String,
///         pub age: Option<i64>,
///         pub email: String,
///     }
/// }
///
/// let mut query = InputMap::new();
/// query.insert("name_input".into(), "Kristoffer".into());
/// query.insert("age".into(), "30".into());
/// let input = InputSource::from_query(query);
///
/// let user: UserEntity = EntityResolver::new(&input)
///     .decode_with(|policy| policy.assign("name_input", "name").exclude("age"))
///     .unwrap();
///
/// assert_eq!(user.name, "Kristoffer");
/// assert_eq!(user.age, None);
/// ```
#[derive(Debug)]
pub struct EntityResolver<'a, L: InputLookup + ?Sized> {
    input: &'a L,
}

impl<'a, L: InputLookup + ?Sized> EntityResolver<'a, L> {
    /// Creates a resolver reading from `input`.
    pub fn new(input: &'a L) -> Self {
        Self { input }
    }

    /// Hydrates a fresh `T` with plain field-name lookup.
    ///
    /// Equivalent to [`decode_with`](Self::decode_with) with a callback that
    /// configures nothing.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if a field value fails to convert.
    pub fn decode<T: Hydrate + Default>(&self) -> Result<T, DecodeError> {
        self.run(T::default(), MappingPolicy::new())
    }

    /// Hydrates a fresh `T` under the policy built by `configure`.
    ///
    /// `configure` runs exactly once, before any field is resolved.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::MissingRequiredField` for the first required
    /// field (in declaration order) whose value is empty, or a conversion
    /// error from the target.
    pub fn decode_with<T, C>(&self, configure: C) -> Result<T, DecodeError>
    where
        T: Hydrate + Default,
        C: FnOnce(MappingPolicy) -> MappingPolicy,
    {
        self.run(T::default(), configure(MappingPolicy::new()))
    }

    /// Hydrates an existing instance with plain field-name lookup.
    ///
    /// Fields that resolve to no value keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if a field value fails to convert.
    pub fn decode_into<T: Hydrate>(&self, target: T) -> Result<T, DecodeError> {
        self.run(target, MappingPolicy::new())
    }

    /// Hydrates an existing instance under the policy built by `configure`.
    ///
    /// # Errors
    ///
    /// See [`decode_with`](Self::decode_with).
    pub fn decode_into_with<T, C>(&self, target: T, configure: C) -> Result<T, DecodeError>
    where
        T: Hydrate,
        C: FnOnce(MappingPolicy) -> MappingPolicy,
    {
        self.run(target, configure(MappingPolicy::new()))
    }

    /// Computes the raw value for a single field under `policy`.
    ///
    /// Returns `Ok(None)` for excluded fields and for keys missing from the
    /// input.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::MissingRequiredField` if `field` is required and
    /// its value is empty.
    pub fn resolve_field(
        &self,
        policy: &PolicySnapshot,
        field: &str,
    ) -> Result<Option<InputValue>, DecodeError> {
        let excluded = policy.is_excluded(field);
        let key = policy.effective_key(field);

        let value = if excluded {
            None
        } else {
            self.input.lookup(key)
        };

        tracing::trace!(
            field,
            key,
            excluded,
            present = value.is_some(),
            "resolving field"
        );

        if value.map_or(true, InputValue::is_empty) && policy.is_required(field) {
            tracing::warn!(field, key, excluded, "missing required field");
            return Err(DecodeError::missing_required(field));
        }

        Ok(value.cloned())
    }

    fn run<T: Hydrate>(&self, target: T, policy: MappingPolicy) -> Result<T, DecodeError> {
        let span = tracing::debug_span!("decode", target = std::any::type_name::<T>());
        let _guard = span.enter();

        let policy = policy.into_snapshot();
        let result = hydrate(target, |field| self.resolve_field(&policy, field.name));

        if let Err(err) = &result {
            tracing::debug!(field = err.field(), error = %err, "decode failed");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hydratable;
    use crate::input::InputSource;
    use crate::value::InputMap;

    hydratable! {
        #[derive(Debug, Default, PartialEq)]
        struct UserEntity {
            name: String,
            age: Option<i64>,
            email: String,
        }
    }

    fn source(pairs: &[(&str, &str)]) -> InputSource {
        InputSource::from_query(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), InputValue::from(*v)))
                .collect(),
        )
    }

    #[test]
    fn default_mapping_uses_field_names() {
        let input = source(&[
            ("name", "Kristoffer"),
            ("age", "30"),
            ("email", "kristoffer@example.com"),
        ]);
        let user: UserEntity = EntityResolver::new(&input).decode().unwrap();
        assert_eq!(
            user,
            UserEntity {
                name: "Kristoffer".into(),
                age: Some(30),
                email: "kristoffer@example.com".into(),
            }
        );
    }

    #[test]
    fn rename_ignores_own_key() {
        let input = source(&[("name", "own"), ("name_input", "renamed")]);
        let user: UserEntity = EntityResolver::new(&input)
            .decode_with(|p| p.assign("name_input", "name"))
            .unwrap();
        assert_eq!(user.name, "renamed");
    }

    #[test]
    fn rename_to_missing_key_leaves_default() {
        let input = source(&[("name", "own")]);
        let user: UserEntity = EntityResolver::new(&input)
            .decode_with(|p| p.assign("nope", "name"))
            .unwrap();
        assert_eq!(user.name, "");
    }

    #[test]
    fn exclusion_beats_rename_and_input() {
        let input = source(&[("age", "30"), ("years", "31")]);
        let user: UserEntity = EntityResolver::new(&input)
            .decode_with(|p| p.assign("years", "age").exclude("age"))
            .unwrap();
        assert_eq!(user.age, None);
    }

    #[test]
    fn required_and_excluded_always_fails() {
        let input = source(&[("age", "30")]);
        let err = EntityResolver::new(&input)
            .decode_with::<UserEntity, _>(|p| p.require("age").exclude("age"))
            .unwrap_err();
        assert_eq!(err, DecodeError::missing_required("age"));
    }

    #[test]
    fn required_checks_emptiness_not_presence() {
        for empty in ["", "0"] {
            let input = source(&[("email", empty)]);
            let err = EntityResolver::new(&input)
                .decode_with::<UserEntity, _>(|p| p.require("email"))
                .unwrap_err();
            assert_eq!(err.to_string(), "Missing required property: email");
        }
    }

    #[test]
    fn required_uses_renamed_key() {
        let input = source(&[("mail", "a@example.com")]);
        let user: UserEntity = EntityResolver::new(&input)
            .decode_with(|p| p.require("email").assign("mail", "email"))
            .unwrap();
        assert_eq!(user.email, "a@example.com");
    }

    #[test]
    fn first_missing_field_in_declaration_order_is_reported() {
        let input = source(&[]);
        let err = EntityResolver::new(&input)
            .decode_with::<UserEntity, _>(|p| p.require("email").require("name"))
            .unwrap_err();
        assert_eq!(err, DecodeError::missing_required("name"));
    }

    #[test]
    fn unknown_policy_fields_are_ignored() {
        let input = source(&[("name", "Kristoffer")]);
        let user: UserEntity = EntityResolver::new(&input)
            .decode_with(|p| p.assign("x", "nickname").exclude("role").require("ghost"))
            .unwrap();
        assert_eq!(user.name, "Kristoffer");
    }

    #[test]
    fn configure_runs_exactly_once() {
        let input = source(&[("name", "Kristoffer")]);
        let mut calls = 0;
        let _: UserEntity = EntityResolver::new(&input)
            .decode_with(|p| {
                calls += 1;
                p
            })
            .unwrap();
        assert_eq!(calls, 1);
    }

    #[test]
    fn decode_into_keeps_unresolved_fields() {
        let input = source(&[("age", "41")]);
        let existing = UserEntity {
            name: "Kristoffer".into(),
            age: Some(30),
            email: "kristoffer@example.com".into(),
        };
        let user = EntityResolver::new(&input).decode_into(existing).unwrap();
        assert_eq!(user.name, "Kristoffer");
        assert_eq!(user.age, Some(41));
        assert_eq!(user.email, "kristoffer@example.com");
    }

    #[test]
    fn decode_into_with_excluded_field_keeps_current_value() {
        let input = source(&[("name", "Mallory")]);
        let existing = UserEntity {
            name: "Kristoffer".into(),
            ..UserEntity::default()
        };
        let user = EntityResolver::new(&input)
            .decode_into_with(existing, |p| p.exclude("name"))
            .unwrap();
        assert_eq!(user.name, "Kristoffer");
    }

    #[test]
    fn conversion_failure_names_field() {
        let input = source(&[("age", "thirty")]);
        let err = EntityResolver::new(&input)
            .decode::<UserEntity>()
            .unwrap_err();
        assert_eq!(err.field(), "age");
        assert!(matches!(err, DecodeError::InvalidValue { .. }));
    }

    #[test]
    fn resolve_field_returns_raw_value() {
        let input = source(&[("age", "30")]);
        let resolver = EntityResolver::new(&input);
        let policy = MappingPolicy::new().snapshot();
        assert_eq!(
            resolver.resolve_field(&policy, "age").unwrap(),
            Some(InputValue::from("30"))
        );
        assert_eq!(resolver.resolve_field(&policy, "missing").unwrap(), None);
    }

    #[test]
    fn works_over_plain_map() {
        let mut map = InputMap::new();
        map.insert("name".into(), "Kristoffer".into());
        let user: UserEntity = EntityResolver::new(&map).decode().unwrap();
        assert_eq!(user.name, "Kristoffer");
    }

    mod proptests {
        use super::*;
        use crate::test_utils::{arb_empty_value, arb_key, arb_non_empty_text};
        use proptest::prelude::*;

        proptest! {
            /// Property: an excluded field resolves to nothing, whatever the rename and input say
            #[test]
            fn proptest_exclusion_wins(
                field in arb_key(),
                source_key in arb_key(),
                value in arb_non_empty_text()
            ) {
                let mut map = InputMap::new();
                map.insert(field.clone(), InputValue::from(value.clone()));
                map.insert(source_key.clone(), InputValue::from(value));
                let policy = MappingPolicy::new()
                    .assign(source_key, field.clone())
                    .exclude(field.clone())
                    .snapshot();

                let resolved = EntityResolver::new(&map).resolve_field(&policy, &field).unwrap();
                prop_assert_eq!(resolved, None);
            }

            /// Property: a required field with an empty value fails and names the field
            #[test]
            fn proptest_required_empty_fails(field in arb_key(), empty in arb_empty_value()) {
                let mut map = InputMap::new();
                map.insert(field.clone(), empty);
                let policy = MappingPolicy::new().require(field.clone()).snapshot();

                let err = EntityResolver::new(&map).resolve_field(&policy, &field).unwrap_err();
                prop_assert_eq!(err, DecodeError::missing_required(field));
            }

            /// Property: a required field with a non-empty value passes through unchanged
            #[test]
            fn proptest_required_non_empty_passes(field in arb_key(), value in arb_non_empty_text()) {
                let mut map = InputMap::new();
                map.insert(field.clone(), InputValue::from(value.clone()));
                let policy = MappingPolicy::new().require(field.clone()).snapshot();

                let resolved = EntityResolver::new(&map).resolve_field(&policy, &field).unwrap();
                prop_assert_eq!(resolved, Some(InputValue::from(value)));
            }

            /// Property: a renamed field reads its source key and never its own name
            #[test]
            fn proptest_rename_reads_source_key(
                field in arb_key(),
                source_key in arb_key(),
                own in arb_non_empty_text(),
                renamed in arb_non_empty_text()
            ) {
                prop_assume!(field != source_key);
                let mut map = InputMap::new();
                map.insert(field.clone(), InputValue::from(own));
                map.insert(source_key.clone(), InputValue::from(renamed.clone()));
                let policy = MappingPolicy::new().assign(source_key, field.clone()).snapshot();

                let resolved = EntityResolver::new(&map).resolve_field(&policy, &field).unwrap();
                prop_assert_eq!(resolved, Some(InputValue::from(renamed)));
            }
        }
    }
}
