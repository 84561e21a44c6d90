//! Derived, read-only statistics over the whole directory. Recomputed from
//! scratch on every request.

use serde::{Deserialize, Serialize};

use crate::expert::FocusArea;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCounts {
  pub individual:   i64,
  pub organization: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityCount {
  pub name:    String,
  pub country: String,
  pub count:   i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCount {
  pub country: String,
  pub count:   i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusAreaCount {
  pub focus_area: FocusArea,
  pub count:      i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiasporaCounts {
  pub diaspora:     i64,
  pub non_diaspora: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
  pub name:  String,
  pub count: i64,
}

/// Maximum number of rows in the ranked focus-area and tag lists.
pub const TOP_N: usize = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Statistics {
  pub total:         i64,
  pub by_type:       TypeCounts,
  /// Most populated city first.
  pub by_city:       Vec<CityCount>,
  pub by_country:    Vec<CountryCount>,
  /// At most [`TOP_N`] entries.
  pub by_focus_area: Vec<FocusAreaCount>,
  pub by_diaspora:   DiasporaCounts,
  /// At most [`TOP_N`] entries.
  pub top_tags:      Vec<TagCount>,
}
