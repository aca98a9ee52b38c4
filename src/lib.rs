//! Policy-driven hydration of typed entities from HTTP request input.
//!
//! This crate populates plain Rust structures from loosely-typed request
//! parameters (query string and body), governed by a small per-field policy:
//! - **Assign**: read a field from a differently-named input key
//! - **Require**: fail when a field's value is empty
//! - **Exclude**: never take a field from input
//!
//! # Core Types
//!
//! - [`InputSource`]: Query and body parameters of one request
//! - [`MappingPolicy`]: Builder for per-field directives
//! - [`EntityResolver`]: Applies a policy and hydrates a target
//! - [`Hydrate`] / [`hydratable!`]: Compile-time field list and setters for a target
//! - [`FromInput`]: Conversion from raw input into field types
//!
//! # Examples
//!
//! ```
//! use request_hydrate::{hydratable, web::{ExtractInput, RequestAdapter}};
//!
//! hydratable! {
//!     #[derive(Debug, Default)]
//!     pub struct UserEntity {
//!         pub name: String,
//!         pub age: Option<i64>,
//!         pub email: String,
//!     }
//! }
//!
//! let mut adapter = RequestAdapter::new();
//! adapter.add_query_string("name=Kristoffer&age=30&email=kristoffer%40example.com");
//! let input = adapter.extract_input();
//!
//! let user: UserEntity = input.decode().expect("valid input");
//! assert_eq!(user.age, Some(30));
//!
//! // Required fields are enforced; excluded fields never come from input
//! let err = input
//!     .decode_with::<UserEntity, _>(|p| p.assign("mail", "email").require("email"))
//!     .unwrap_err();
//! assert_eq!(err.to_string(), "Missing required property: email");
//!
//! let guarded: UserEntity = input.decode_with(|p| p.exclude("age")).unwrap();
//! assert_eq!(guarded.age, None);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod coerce;
mod error;
mod field;
mod hydrate;
mod input;
mod policy;
mod resolver;
mod value;
pub mod web;

#[cfg(test)]
mod test_utils;

pub use coerce::FromInput;
pub use error::{CoerceError, CoerceErrorKind, DecodeError, InputError};
pub use field::{Field, FieldKind};
#[doc(hidden)]
pub use hydrate::hydrate_nested;
pub use hydrate::{hydrate, Hydrate};
pub use input::{InputLookup, InputSource};
pub use policy::{MappingPolicy, PolicySnapshot};
pub use resolver::EntityResolver;
pub use value::{InputMap, InputValue, UploadedFile};
