//! Write inputs: the payloads accepted by create/update and the data rules
//! they are checked against before anything touches the store.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
  Error, Result,
  expert::{ContactType, ExpertType, FocusArea},
};

// ─── Child inputs ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
  #[serde(rename = "type")]
  pub kind:       ContactType,
  pub value:      String,
  #[serde(default)]
  pub is_primary: bool,
}

impl NewContact {
  pub fn new(kind: ContactType, value: impl Into<String>) -> Self {
    Self { kind, value: value.into(), is_primary: false }
  }

  pub fn primary(kind: ContactType, value: impl Into<String>) -> Self {
    Self { is_primary: true, ..Self::new(kind, value) }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewKeyFigure {
  pub name:        String,
  #[serde(default)]
  pub role:        Option<String>,
  #[serde(default)]
  pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLink {
  #[serde(default)]
  pub title:       Option<String>,
  pub url:         String,
  #[serde(default)]
  pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewActivity {
  pub title:       String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub date_start:  Option<NaiveDate>,
  #[serde(default)]
  pub date_end:    Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPublication {
  pub title:            String,
  #[serde(default)]
  pub url:              Option<String>,
  #[serde(default)]
  pub publication_date: Option<NaiveDate>,
  #[serde(default)]
  pub description:      Option<String>,
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// Variant-specific part of a new expert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewExpertKind {
  Individual,
  Organization { key_figures: Vec<NewKeyFigure> },
}

impl NewExpertKind {
  /// Build the variant from a flat payload's `type` and `key_figures`.
  /// Key figures only exist for organizations.
  pub fn new(kind: ExpertType, key_figures: Vec<NewKeyFigure>) -> Result<Self> {
    match kind {
      ExpertType::Organization => Ok(Self::Organization { key_figures }),
      ExpertType::Individual if key_figures.is_empty() => Ok(Self::Individual),
      ExpertType::Individual => Err(Error::Validation(
        "key_figures are only allowed for organizations".into(),
      )),
    }
  }

  pub fn expert_type(&self) -> ExpertType {
    match self {
      Self::Individual => ExpertType::Individual,
      Self::Organization { .. } => ExpertType::Organization,
    }
  }
}

/// Input to [`crate::store::DirectoryStore::create_expert`].
#[derive(Debug, Clone)]
pub struct NewExpert {
  pub name:          String,
  pub kind:          NewExpertKind,
  pub title:         Option<String>,
  pub affiliation:   Option<String>,
  pub city_id:       i64,
  pub description:   Option<String>,
  pub founding_year: Option<i32>,
  pub is_diaspora:   bool,
  pub image:         Option<String>,
  pub focus_areas:   Vec<FocusArea>,
  pub contacts:      Vec<NewContact>,
  pub tags:          Vec<String>,
  pub links:         Vec<NewLink>,
}

impl NewExpert {
  /// Convenience constructor with all optional fields empty.
  pub fn new(name: impl Into<String>, kind: NewExpertKind, city_id: i64) -> Self {
    Self {
      name: name.into(),
      kind,
      title: None,
      affiliation: None,
      city_id,
      description: None,
      founding_year: None,
      is_diaspora: false,
      image: None,
      focus_areas: Vec::new(),
      contacts: Vec::new(),
      tags: Vec::new(),
      links: Vec::new(),
    }
  }

  pub fn validate(&self) -> Result<()> {
    validate_name(&self.name)?;
    validate_contacts(&self.contacts)?;
    normalize_tags(&self.tags)?;
    if let NewExpertKind::Organization { key_figures } = &self.kind {
      validate_key_figures(key_figures)?;
    }
    if self.links.iter().any(|l| l.url.trim().is_empty()) {
      return Err(Error::Validation("link url must not be empty".into()));
    }
    Ok(())
  }
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// Replace-or-leave policy for one child collection in an update.
///
/// `Leave` (key absent or `null`) keeps the stored collection as is;
/// `Replace` swaps in the given set, and `Replace(vec![])` clears it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionUpdate<T> {
  Leave,
  Replace(Vec<T>),
}

impl<T> CollectionUpdate<T> {
  pub fn is_leave(&self) -> bool { matches!(self, Self::Leave) }

  /// The replacement set, if this update touches the collection.
  pub fn replacement(&self) -> Option<&[T]> {
    match self {
      Self::Leave => None,
      Self::Replace(items) => Some(items),
    }
  }
}

impl<T> Default for CollectionUpdate<T> {
  fn default() -> Self { Self::Leave }
}

impl<T> From<Option<Vec<T>>> for CollectionUpdate<T> {
  fn from(value: Option<Vec<T>>) -> Self {
    value.map_or(Self::Leave, Self::Replace)
  }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for CollectionUpdate<T> {
  fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
    Option::<Vec<T>>::deserialize(d).map(Self::from)
  }
}

/// Input to [`crate::store::DirectoryStore::update_expert`]. Every field is
/// optional; absent scalars are left untouched. The expert's type cannot be
/// changed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpertPatch {
  #[serde(default)]
  pub name:          Option<String>,
  #[serde(default)]
  pub title:         Option<String>,
  #[serde(default)]
  pub affiliation:   Option<String>,
  #[serde(default)]
  pub city_id:       Option<i64>,
  #[serde(default)]
  pub description:   Option<String>,
  #[serde(default)]
  pub founding_year: Option<i32>,
  #[serde(default)]
  pub is_diaspora:   Option<bool>,
  #[serde(default)]
  pub image:         Option<String>,
  #[serde(default)]
  pub focus_areas:   CollectionUpdate<FocusArea>,
  #[serde(default)]
  pub contacts:      CollectionUpdate<NewContact>,
  #[serde(default)]
  pub key_figures:   CollectionUpdate<NewKeyFigure>,
  #[serde(default)]
  pub tags:          CollectionUpdate<String>,
}

impl ExpertPatch {
  /// Check the patch against the stored expert's type.
  pub fn validate(&self, kind: ExpertType) -> Result<()> {
    if let Some(name) = &self.name {
      validate_name(name)?;
    }
    if let Some(contacts) = self.contacts.replacement() {
      validate_contacts(contacts)?;
    }
    if let Some(tags) = self.tags.replacement() {
      normalize_tags(tags)?;
    }
    if let Some(figures) = self.key_figures.replacement() {
      if kind == ExpertType::Individual && !figures.is_empty() {
        return Err(Error::Validation(
          "key_figures are only allowed for organizations".into(),
        ));
      }
      validate_key_figures(figures)?;
    }
    Ok(())
  }
}

// ─── Rules ───────────────────────────────────────────────────────────────────

fn validate_name(name: &str) -> Result<()> {
  if name.trim().is_empty() {
    return Err(Error::Validation("name must not be empty".into()));
  }
  Ok(())
}

/// Contact values must be non-empty and at most one contact per type may be
/// marked primary.
fn validate_contacts(contacts: &[NewContact]) -> Result<()> {
  let mut primaries = HashSet::new();
  for contact in contacts {
    if contact.value.trim().is_empty() {
      return Err(Error::Validation(format!(
        "{} contact has an empty value",
        contact.kind.as_str()
      )));
    }
    if contact.is_primary && !primaries.insert(contact.kind) {
      return Err(Error::Validation(format!(
        "more than one primary {} contact",
        contact.kind.as_str()
      )));
    }
  }
  Ok(())
}

fn validate_key_figures(figures: &[NewKeyFigure]) -> Result<()> {
  if figures.iter().any(|f| f.name.trim().is_empty()) {
    return Err(Error::Validation("key figure name must not be empty".into()));
  }
  Ok(())
}

/// Trim tag names and drop duplicates, keeping first-seen order. Blank names
/// are rejected.
pub fn normalize_tags(tags: &[String]) -> Result<Vec<String>> {
  let mut seen = HashSet::new();
  let mut out = Vec::with_capacity(tags.len());
  for tag in tags {
    let tag = tag.trim();
    if tag.is_empty() {
      return Err(Error::Validation("tag names must not be empty".into()));
    }
    if seen.insert(tag) {
      out.push(tag.to_owned());
    }
  }
  Ok(out)
}
