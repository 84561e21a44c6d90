//! Cities: immutable reference data every expert points at.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
  pub id:          i64,
  pub name:        String,
  pub country:     String,
  pub description: Option<String>,
}

/// Input to [`crate::store::DirectoryStore::add_city`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCity {
  pub name:        String,
  pub country:     String,
  #[serde(default)]
  pub description: Option<String>,
}

impl NewCity {
  pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
    Self { name: name.into(), country: country.into(), description: None }
  }
}
