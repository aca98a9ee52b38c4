//! Web framework integration surface.
//!
//! This module provides the boundary between HTTP frameworks and the
//! resolver. It handles:
//! - Collecting query and body parameters into an [`InputSource`](crate::InputSource)
//! - Decoding raw query strings, URL-encoded forms and JSON bodies
//! - Keeping the two input origins apart
//!
//! # Design Principles
//!
//! 1. **No Framework Dependencies**: This module contains no framework-specific code.
//!    It defines interfaces that framework-specific code can implement.
//!
//! 2. **Origins Stay Separate**: Query and body parameters are stored apart.
//!    Single-key lookups prefer the body; full merges prefer the query.
//!
//! 3. **No Conversion Here**: Values stay raw. Typed conversion happens when a
//!    target is hydrated.
//!
//! # Integration Model
//!
//! Framework-specific extractors should:
//! 1. Build a `RequestAdapter` from framework request parts
//! 2. Call `.extract_input()` to get an `InputSource`
//! 3. Hydrate a target with `EntityResolver` under a `MappingPolicy`
//!
//! # Example Flow
//!
//! ```ignore
//! // In a framework-specific integration (e.g., axum, actix):
//!
//! // 1. Collect request input
//! let mut adapter = RequestAdapter::new();
//! adapter.add_query_string(uri.query().unwrap_or(""));
//! adapter.add_form_body(&body);
//! let input = adapter.extract_input();
//!
//! // 2. Hydrate the form
//! let form: SignupForm = EntityResolver::new(&input)
//!     .decode_with(|p| p.require("email").exclude("is_admin"))?;
//! ```

mod adapter;
pub mod example_handler;
mod extract;

pub use adapter::RequestAdapter;
pub use extract::ExtractInput;
