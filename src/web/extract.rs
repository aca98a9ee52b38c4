//! Extraction boundary trait for web integration.
//!
//! This module defines the seam between framework-specific request types
//! and the resolver's [`InputSource`].

use crate::input::InputSource;

/// Collects request input from a framework-specific request.
///
/// Implementations gather query-string parameters and body parameters
/// (form fields, JSON fields, uploaded files) into an [`InputSource`],
/// keeping the two origins apart. The resolver relies on that split:
/// single-key lookups prefer the body, full merges prefer the query.
///
/// # Design Notes
///
/// This trait intentionally does NOT:
/// - Convert values to typed fields (that's the target's `FromInput` job)
/// - Apply mapping policies (that's `EntityResolver`'s job)
///
/// It ONLY maps framework types to input values.
///
/// # Examples
///
/// ```
/// use request_hydrate::web::{ExtractInput, RequestAdapter};
/// use request_hydrate::InputSource;
/// use std::collections::HashMap;
///
/// // Example framework-specific implementation
/// struct MyFrameworkRequest {
///     query: HashMap<String, String>,
///     form: String,
/// }
///
/// impl ExtractInput for MyFrameworkRequest {
///     fn extract_input(&self) -> InputSource {
///         // Use RequestAdapter as a helper for building InputSource
///         let mut adapter = RequestAdapter::new();
///         for (k, v) in &self.query {
///             adapter.add_query_param(k.clone(), v.clone());
///         }
///         adapter.add_form_body(&self.form);
///         adapter.extract_input()
///     }
/// }
///
/// let req = MyFrameworkRequest {
///     query: HashMap::from([("page".to_string(), "2".to_string())]),
///     form: "name=Kristoffer".to_string(),
/// };
/// let input = req.extract_input();
/// assert_eq!(input.input_int("page"), Some(2));
/// assert_eq!(input.input_string("name").as_deref(), Some("Kristoffer"));
/// ```
pub trait ExtractInput {
    /// Extracts query and body input from the request.
    fn extract_input(&self) -> InputSource;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{InputMap, InputValue};

    // Test implementation for documentation
    struct TestRequest {
        query: Vec<(&'static str, &'static str)>,
    }

    impl ExtractInput for TestRequest {
        fn extract_input(&self) -> InputSource {
            InputSource::from_query(
                self.query
                    .iter()
                    .map(|(k, v)| (k.to_string(), InputValue::from(*v)))
                    .collect::<InputMap>(),
            )
        }
    }

    #[test]
    fn extract_input_trait_works() {
        let req = TestRequest {
            query: vec![("q", "rust")],
        };

        let input = req.extract_input();
        assert_eq!(input.input("q"), Some(&InputValue::from("rust")));
        assert!(input.body().is_empty());
    }

    #[test]
    fn extract_input_with_no_params() {
        let req = TestRequest { query: vec![] };

        let input = req.extract_input();
        assert!(input.all().is_empty());
    }
}
