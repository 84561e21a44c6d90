//! Expert types: the central entity of the directory and the child
//! collections folded into it on read.
//!
//! An expert is either an individual or an organization. The two share one
//! base attribute set ([`Expert`]); what differs is the variant-specific child
//! collection carried in [`Profile`].

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Enumerations ────────────────────────────────────────────────────────────

/// Whether an expert is a person or an organization.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ExpertType {
  Individual,
  Organization,
}

impl ExpertType {
  /// The lowercase form used on the wire, in storage and on the command line.
  pub fn as_str(self) -> &'static str { self.into() }

  pub fn parse(s: &str) -> Result<Self> {
    Self::from_str(s).map_err(|_| Error::UnknownValue {
      what:  "expert type",
      value: s.to_owned(),
    })
  }
}

/// The fixed set of thematic areas an expert can work in.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FocusArea {
  Advocacy,
  Humanitarian,
  CulturalDiplomacy,
  PoliticalMobilization,
  Research,
  PolicyAnalysis,
  CommunitySupport,
  Integration,
  Education,
  Media,
}

impl FocusArea {
  /// The snake_case form used on the wire and in storage.
  pub fn as_str(self) -> &'static str { self.into() }

  pub fn parse(s: &str) -> Result<Self> {
    Self::from_str(s).map_err(|_| Error::UnknownValue {
      what:  "focus area",
      value: s.to_owned(),
    })
  }
}

/// The channel a [`Contact`] refers to.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContactType {
  Email,
  Phone,
  Website,
  /// Generic social-media handle; older seed data spells it `social`.
  #[serde(rename = "social_media", alias = "social")]
  #[strum(to_string = "social_media", serialize = "social")]
  Social,
  Twitter,
  Facebook,
  Linkedin,
  Instagram,
  Address,
}

impl ContactType {
  pub fn as_str(self) -> &'static str { self.into() }

  pub fn parse(s: &str) -> Result<Self> {
    Self::from_str(s).map_err(|_| Error::UnknownValue {
      what:  "contact type",
      value: s.to_owned(),
    })
  }
}

// ─── Base record ─────────────────────────────────────────────────────────────

/// The core `experts` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expert {
  pub id:            Uuid,
  pub name:          String,
  #[serde(rename = "type")]
  pub kind:          ExpertType,
  pub title:         Option<String>,
  pub affiliation:   Option<String>,
  pub city_id:       i64,
  pub description:   Option<String>,
  pub founding_year: Option<i32>,
  pub is_diaspora:   bool,
  /// A URL or a `data:` URL holding the encoded image bytes.
  pub image:         Option<String>,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

/// An expert joined with the city it is based in; the shape of every list
/// query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpertSummary {
  #[serde(flatten)]
  pub expert:    Expert,
  pub city_name: String,
  pub country:   String,
}

// ─── Child collections ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
  pub id:         i64,
  #[serde(rename = "type")]
  pub kind:       ContactType,
  pub value:      String,
  pub is_primary: bool,
}

/// A named person attached to an organization, e.g. its director.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFigure {
  pub id:          i64,
  pub name:        String,
  pub role:        Option<String>,
  pub description: Option<String>,
}

/// A URL attached to an expert, typically a logo or a profile page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
  pub id:          i64,
  pub title:       Option<String>,
  pub url:         String,
  pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
  pub id:          i64,
  pub title:       String,
  pub description: Option<String>,
  pub date_start:  Option<NaiveDate>,
  pub date_end:    Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
  pub id:               i64,
  pub title:            String,
  pub url:              Option<String>,
  pub publication_date: Option<NaiveDate>,
  pub description:      Option<String>,
}

// ─── Aggregated views ────────────────────────────────────────────────────────

/// Variant-specific children: key figures belong only to organizations,
/// publications only to individuals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Profile {
  Individual { publications: Vec<Publication> },
  Organization { key_figures: Vec<KeyFigure> },
}

/// The composite read model for one expert. Never stored, always assembled
/// from the base row and its child tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpertDetails {
  #[serde(flatten)]
  pub summary:     ExpertSummary,
  pub focus_areas: Vec<FocusArea>,
  pub contacts:    Vec<Contact>,
  pub links:       Vec<Link>,
  pub tags:        Vec<String>,
  /// Most recent first.
  pub activities:  Vec<Activity>,
  #[serde(flatten)]
  pub profile:     Profile,
}

impl ExpertDetails {
  pub fn id(&self) -> Uuid { self.summary.expert.id }

  pub fn key_figures(&self) -> &[KeyFigure] {
    match &self.profile {
      Profile::Organization { key_figures } => key_figures,
      Profile::Individual { .. } => &[],
    }
  }

  pub fn publications(&self) -> &[Publication] {
    match &self.profile {
      Profile::Individual { publications } => publications,
      Profile::Organization { .. } => &[],
    }
  }
}

/// An organization together with its key figures (empty, never absent, when
/// it has none).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationSummary {
  #[serde(flatten)]
  pub summary:     ExpertSummary,
  pub key_figures: Vec<KeyFigure>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn details(profile: Profile) -> ExpertDetails {
    let now = Utc::now();
    ExpertDetails {
      summary: ExpertSummary {
        expert:    Expert {
          id: Uuid::new_v4(),
          name: "Razom".into(),
          kind: ExpertType::Organization,
          title: None,
          affiliation: None,
          city_id: 3,
          description: Some("Humanitarian aid".into()),
          founding_year: Some(2014),
          is_diaspora: true,
          image: None,
          created_at: now,
          updated_at: now,
        },
        city_name: "Berlin".into(),
        country:   "Germany".into(),
      },
      focus_areas: vec![FocusArea::Humanitarian],
      contacts: vec![],
      links: vec![],
      tags: vec!["diaspora".into()],
      activities: vec![],
      profile,
    }
  }

  #[test]
  fn expert_type_text_form_matches_serde() {
    for kind in [ExpertType::Individual, ExpertType::Organization] {
      assert_eq!(ExpertType::parse(kind.as_str()).unwrap(), kind);
      assert_eq!(serde_json::to_value(kind).unwrap(), kind.as_str());
    }
    assert_eq!(ExpertType::Organization.as_str(), "organization");
    assert!(ExpertType::parse("collective").is_err());
  }

  #[test]
  fn focus_area_wire_form_is_snake_case() {
    assert_eq!(FocusArea::CulturalDiplomacy.as_str(), "cultural_diplomacy");
    assert_eq!(
      FocusArea::parse("policy_analysis").unwrap(),
      FocusArea::PolicyAnalysis
    );
    assert!(FocusArea::parse("astrology").is_err());
    assert_eq!(
      serde_json::to_value(FocusArea::PoliticalMobilization).unwrap(),
      "political_mobilization"
    );
  }

  #[test]
  fn social_contact_type_accepts_both_spellings() {
    assert_eq!(ContactType::Social.as_str(), "social_media");
    assert_eq!(ContactType::parse("social").unwrap(), ContactType::Social);
    assert_eq!(
      ContactType::parse("social_media").unwrap(),
      ContactType::Social
    );
    let from_json: ContactType = serde_json::from_str("\"social\"").unwrap();
    assert_eq!(from_json, ContactType::Social);
  }

  #[test]
  fn details_flatten_base_row_and_profile() {
    let d = details(Profile::Organization {
      key_figures: vec![KeyFigure {
        id:          1,
        name:        "Dora Chomiak".into(),
        role:        Some("President".into()),
        description: None,
      }],
    });

    let json = serde_json::to_value(&d).unwrap();
    assert_eq!(json["name"], "Razom");
    assert_eq!(json["type"], "organization");
    assert_eq!(json["city_name"], "Berlin");
    assert_eq!(json["key_figures"][0]["name"], "Dora Chomiak");
    assert!(json.get("publications").is_none());
  }

  #[test]
  fn details_deserialize_picks_profile_by_collection() {
    let org = details(Profile::Organization { key_figures: vec![] });
    let json = serde_json::to_string(&org).unwrap();
    let back: ExpertDetails = serde_json::from_str(&json).unwrap();
    assert!(matches!(back.profile, Profile::Organization { .. }));
    assert_eq!(back.id(), org.id());

    let ind = details(Profile::Individual { publications: vec![] });
    let json = serde_json::to_string(&ind).unwrap();
    let back: ExpertDetails = serde_json::from_str(&json).unwrap();
    assert!(matches!(back.profile, Profile::Individual { .. }));
    assert!(back.key_figures().is_empty());
  }
}
