use std::collections::{HashMap, HashSet};

/// Per-field directives for one hydration call.
///
/// `MappingPolicy` is a builder: each directive consumes and returns the
/// policy so calls can be chained. It is handed to the configuration
/// callback of [`EntityResolver::decode_with`](crate::EntityResolver::decode_with)
/// and frozen into a [`PolicySnapshot`] before any field is resolved.
///
/// No directive is validated against the target type. Naming a field the
/// target does not declare is accepted and simply has no effect.
///
/// # Examples
///
/// ```
/// use request_hydrate::MappingPolicy;
///
/// let policy = MappingPolicy::new()
///     .assign("name_input", "name")
///     .require("email")
///     .exclude("is_admin");
///
/// let snapshot = policy.snapshot();
/// assert_eq!(snapshot.effective_key("name"), "name_input");
/// assert!(snapshot.is_required("email"));
/// assert!(snapshot.is_excluded("is_admin"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingPolicy {
    renames: HashMap<String, String>,
    required: HashSet<String>,
    excluded: HashSet<String>,
}

impl MappingPolicy {
    /// Creates an empty policy: no renames, nothing required or excluded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves `field` from the input key `source_key` instead of its own name.
    ///
    /// A later `assign` for the same field replaces the earlier one.
    pub fn assign(mut self, source_key: impl Into<String>, field: impl Into<String>) -> Self {
        self.renames.insert(field.into(), source_key.into());
        self
    }

    /// Marks `field` as required. Idempotent.
    ///
    /// Hydration fails if the field's effective value is empty.
    pub fn require(mut self, field: impl Into<String>) -> Self {
        self.required.insert(field.into());
        self
    }

    /// Marks `field` as excluded. Idempotent.
    ///
    /// An excluded field never receives a value from input, whatever the
    /// renames or input content say.
    pub fn exclude(mut self, field: impl Into<String>) -> Self {
        self.excluded.insert(field.into());
        self
    }

    /// Returns an immutable copy of the accumulated directives.
    pub fn snapshot(&self) -> PolicySnapshot {
        self.clone().into_snapshot()
    }

    /// Freezes the policy without copying.
    pub fn into_snapshot(self) -> PolicySnapshot {
        PolicySnapshot {
            renames: self.renames,
            required: self.required,
            excluded: self.excluded,
        }
    }
}

/// Frozen form of a [`MappingPolicy`], consumed by field resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicySnapshot {
    renames: HashMap<String, String>,
    required: HashSet<String>,
    excluded: HashSet<String>,
}

impl PolicySnapshot {
    /// Target-field-name to source-input-key renames.
    pub fn renames(&self) -> &HashMap<String, String> {
        &self.renames
    }

    /// Names of required fields.
    pub fn required(&self) -> &HashSet<String> {
        &self.required
    }

    /// Names of excluded fields.
    pub fn excluded(&self) -> &HashSet<String> {
        &self.excluded
    }

    /// Returns the input key to look up for `field`: its rename, or its own name.
    pub fn effective_key<'a>(&'a self, field: &'a str) -> &'a str {
        self.renames.get(field).map_or(field, String::as_str)
    }

    /// Returns `true` if `field` must resolve to a non-empty value.
    pub fn is_required(&self, field: &str) -> bool {
        self.required.contains(field)
    }

    /// Returns `true` if `field` is forced to "no value".
    pub fn is_excluded(&self, field: &str) -> bool {
        self.excluded.contains(field)
    }
}

impl From<MappingPolicy> for PolicySnapshot {
    fn from(policy: MappingPolicy) -> Self {
        policy.into_snapshot()
    }
}
