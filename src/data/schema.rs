//! Feature schema definitions.
//!
//! The schema is the ordered feature-name contract shared by datasets,
//! models, explainers, and artifacts. Order is significant: coefficient `i`
//! always refers to feature `i` of the schema, end to end.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Schema error raised during construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A schema must name at least one feature.
    #[error("schema must contain at least one feature")]
    Empty,

    /// Feature names must be unique.
    #[error("duplicate feature name: {0}")]
    DuplicateName(String),
}

/// Ordered list of feature names.
///
/// Equality is order-sensitive: two schemas with the same names in a
/// different order describe different models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    /// Create a schema from an ordered list of names.
    ///
    /// # Errors
    /// Fails if the list is empty or contains duplicates.
    pub fn new(names: Vec<String>) -> Result<Self, SchemaError> {
        if names.is_empty() {
            return Err(SchemaError::Empty);
        }
        let mut seen: HashMap<&str, usize> = HashMap::with_capacity(names.len());
        for name in &names {
            if seen.insert(name.as_str(), 0).is_some() {
                return Err(SchemaError::DuplicateName(name.clone()));
            }
        }
        Ok(Self { names })
    }

    /// Convenience constructor from string slices.
    pub fn from_names(names: &[&str]) -> Result<Self, SchemaError> {
        Self::new(names.iter().map(|s| s.to_string()).collect())
    }

    /// Number of features.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always `false`: construction rejects empty schemas.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Feature names in schema order.
    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Name of the feature at `index`.
    #[inline]
    pub fn name(&self, index: usize) -> &str {
        &self.names[index]
    }

    /// Index of a feature by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

impl TryFrom<Vec<String>> for FeatureSchema {
    type Error = SchemaError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(names)
    }
}

impl From<FeatureSchema> for Vec<String> {
    fn from(schema: FeatureSchema) -> Self {
        schema.names
    }
}
