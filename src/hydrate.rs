//! Construction of target structures from resolved field values.
//!
//! A target type describes itself through [`Hydrate`]: a static list of
//! [`Field`] descriptors plus a setter that converts a raw value into the
//! field's type. The [`hydratable!`](crate::hydratable) macro generates both
//! from a plain struct definition.

use crate::error::DecodeError;
use crate::field::Field;
use crate::value::InputValue;

/// Capability of a structure to be populated field by field.
///
/// # Invariants
///
/// Implementations MUST:
/// - list every settable field in `FIELDS`, in declaration order
/// - accept every name listed in `FIELDS` in `set_field`
/// - return `DecodeError::UnknownField` for any other name
/// - report conversion failures as `DecodeError::InvalidValue`
pub trait Hydrate: Sized {
    /// Declared fields, in declaration order.
    const FIELDS: &'static [Field];

    /// Converts `value` and assigns it to the field called `name`.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if the field is unknown or the value does not convert.
    fn set_field(&mut self, name: &str, value: InputValue) -> Result<(), DecodeError>;
}

/// Populates `target` by asking `resolve` for each declared field.
///
/// `resolve` is called once per entry of [`Hydrate::FIELDS`], in order.
/// `None` (or an explicit `Null`) leaves the field at its current value,
/// which for a freshly defaulted target is its default. The first error
/// from `resolve` or from a setter aborts the walk and is returned; the
/// partially populated target is dropped.
///
/// # Examples
///
/// ```
/// use request_hydrate::{hydratable, hydrate, InputValue};
///
/// hydratable! {
///     #[derive(Debug, Default)]
///     pub struct Point {
///         pub x: i64,
///         pub y: i64,
///     }
/// }
///
/// let point = hydrate(Point::default(), |field| {
///     Ok(match field.name {
///         "x" => Some(InputValue::from("3")),
///         _ => None,
///     })
/// })
/// .unwrap();
///
/// assert_eq!((point.x, point.y), (3, 0));
/// ```
pub fn hydrate<T, F>(mut target: T, mut resolve: F) -> Result<T, DecodeError>
where
    T: Hydrate,
    F: FnMut(&Field) -> Result<Option<InputValue>, DecodeError>,
{
    for field in T::FIELDS {
        match resolve(field)? {
            None | Some(InputValue::Null) => {}
            Some(value) => target.set_field(field.name, value)?,
        }
    }
    Ok(target)
}

/// Declares a struct and implements [`Hydrate`] and [`FromInput`] for it.
///
/// Every field type must implement [`FromInput`]. The struct must implement
/// `Default`: nested occurrences are hydrated into a defaulted instance.
///
/// [`FromInput`]: crate::FromInput
///
/// # Examples
///
/// ```
/// use request_hydrate::{hydratable, FieldKind, Hydrate};
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
/// assert_eq!(UserEntity::FIELDS.len(), 3);
/// assert_eq!(UserEntity::FIELDS[1].name, "age");
/// assert_eq!(UserEntity::FIELDS[1].kind, FieldKind::Int);
/// assert!(UserEntity::FIELDS[1].optional);
/// ```
#[macro_export]
macro_rules! hydratable {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::Hydrate for $name {
            const FIELDS: &'static [$crate::Field] = &[
                $(
                    $crate::Field::new(
                        stringify!($field),
                        <$ty as $crate::FromInput>::KIND,
                        <$ty as $crate::FromInput>::OPTIONAL,
                    ),
                )*
            ];

            fn set_field(
                &mut self,
                name: &str,
                value: $crate::InputValue,
            ) -> ::core::result::Result<(), $crate::DecodeError> {
                match name {
                    $(
                        stringify!($field) => {
                            self.$field = <$ty as $crate::FromInput>::from_input(value).map_err(
                                |e| {
                                    $crate::DecodeError::invalid_value(
                                        name,
                                        <$ty as $crate::FromInput>::KIND,
                                        e,
                                    )
                                },
                            )?;
                            ::core::result::Result::Ok(())
                        }
                    )*
                    _ => ::core::result::Result::Err($crate::DecodeError::unknown_field(name)),
                }
            }
        }

        impl $crate::FromInput for $name {
            const KIND: $crate::FieldKind = $crate::FieldKind::Object;

            fn from_input(
                value: $crate::InputValue,
            ) -> ::core::result::Result<Self, $crate::CoerceError> {
                $crate::hydrate_nested::<$name>(value)
            }
        }
    };
}

/// Hydrates a nested object from an array value using plain field-name lookup.
///
/// Used by [`hydratable!`](crate::hydratable); not meant to be called directly.
#[doc(hidden)]
pub fn hydrate_nested<T: Hydrate + Default>(
    value: InputValue,
) -> Result<T, crate::error::CoerceError> {
    use crate::error::{CoerceError, CoerceErrorKind};

    match value {
        InputValue::Array(map) => crate::resolver::EntityResolver::new(&map)
            .decode::<T>()
            .map_err(|e| CoerceError::new(CoerceErrorKind::Nested, e.to_string())),
        other => Err(CoerceError::new(
            CoerceErrorKind::TypeMismatch,
            format!("expected array, got {}", other.type_name()),
        )),
    }
}
