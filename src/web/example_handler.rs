//! Example handlers demonstrating request hydration at the web boundary.
//!
//! This module shows realistic request handler flows that turn raw request
//! input into typed forms under a mapping policy.
//!
//! **These examples are for documentation and testing only.**
//! They demonstrate proper usage patterns without requiring actual HTTP infrastructure.

use crate::error::DecodeError;
use crate::hydratable;
use crate::resolver::EntityResolver;

use super::{ExtractInput, RequestAdapter};

hydratable! {
    /// Sign-up form submitted by a new user.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct SignupForm {
        /// Display name
        pub name: String,
        /// Contact address
        pub email: String,
        /// Age, if given
        pub age: Option<u32>,
        /// Newsletter opt-in checkbox
        pub newsletter: bool,
        /// Never taken from input
        pub is_admin: bool,
    }
}

/// Handles a sign-up form submission.
///
/// This handler demonstrates:
/// - Required fields (`name`, `email`)
/// - Excluding a privileged field (`is_admin`) from mass assignment
/// - Checkbox-style boolean coercion
///
/// # Examples
///
/// ```
/// use request_hydrate::web::{RequestAdapter, example_handler::handle_signup};
///
/// let mut adapter = RequestAdapter::new();
/// adapter.add_form_body("name=Kristoffer&email=kristoffer%40example.com&newsletter=on&is_admin=1");
///
/// let form = handle_signup(&adapter).expect("valid sign-up");
/// assert_eq!(form.name, "Kristoffer");
/// assert!(form.newsletter);
/// assert!(!form.is_admin); // excluded
/// ```
pub fn handle_signup(adapter: &RequestAdapter) -> Result<SignupForm, DecodeError> {
    let input = adapter.extract_input();

    let form: SignupForm = EntityResolver::new(&input).decode_with(|policy| {
        policy
            .require("name")
            .require("email")
            .exclude("is_admin")
    })?;

    tracing::info!(newsletter = form.newsletter, "sign-up accepted");
    Ok(form)
}

hydratable! {
    /// Search parameters taken from the query string.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct SearchQuery {
        /// Search term, sent as `q`
        pub term: String,
        /// Page number, sent as `p`
        pub page: Option<u32>,
        /// Tag filter, sent as `tags[]`
        pub tags: Vec<String>,
    }
}

/// Handles a public search endpoint.
///
/// This handler demonstrates renaming short query keys onto descriptive
/// field names.
///
/// # Examples
///
/// ```
/// use request_hydrate::web::{RequestAdapter, example_handler::handle_search};
///
/// let mut adapter = RequestAdapter::new();
/// adapter.add_query_string("q=rust&p=2&tags[]=web&tags[]=forms");
///
/// let query = handle_search(&adapter).expect("valid search");
/// assert_eq!(query.term, "rust");
/// assert_eq!(query.page, Some(2));
/// assert_eq!(query.tags, vec!["web", "forms"]);
/// ```
pub fn handle_search(adapter: &RequestAdapter) -> Result<SearchQuery, DecodeError> {
    let input = adapter.extract_input();

    EntityResolver::new(&input).decode_with(|policy| {
        policy
            .assign("q", "term")
            .assign("p", "page")
            .require("term")
    })
}

hydratable! {
    /// Stored user profile that can be partially updated.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Profile {
        /// Primary key; never changed through input
        pub id: u64,
        /// Display name
        pub name: String,
        /// Free-text biography
        pub bio: Option<String>,
    }
}

/// Handles a partial profile update.
///
/// Fields absent from the request keep their stored values; `id` is excluded
/// so a client cannot re-key the record.
///
/// # Examples
///
/// ```
/// use request_hydrate::web::{RequestAdapter, example_handler::{handle_profile_update, Profile}};
///
/// let current = Profile { id: 7, name: "Kristoffer".into(), bio: None };
///
/// let mut adapter = RequestAdapter::new();
/// adapter.add_form_body("id=99&bio=Rustacean");
///
/// let updated = handle_profile_update(&adapter, current).expect("valid update");
/// assert_eq!(updated.id, 7);
/// assert_eq!(updated.name, "Kristoffer");
/// assert_eq!(updated.bio.as_deref(), Some("Rustacean"));
/// ```
pub fn handle_profile_update(
    adapter: &RequestAdapter,
    current: Profile,
) -> Result<Profile, DecodeError> {
    let input = adapter.extract_input();
    let id = current.id;

    let updated =
        EntityResolver::new(&input).decode_into_with(current, |policy| policy.exclude("id"))?;

    tracing::debug!(id, "profile updated");
    Ok(updated)
}
