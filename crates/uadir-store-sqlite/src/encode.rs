//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as `YYYY-MM-DD`.
//! UUIDs are stored as hyphenated lowercase strings. Enumerations are stored
//! in their snake_case wire form.

use chrono::{DateTime, NaiveDate, Utc};
use uadir_core::expert::{
  Activity, Contact, ContactType, Expert, ExpertSummary, ExpertType, FocusArea,
  Publication,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> / NaiveDate ───────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::Decode(format!("date {s:?}: {e}")))
}

// ─── Enumerations ────────────────────────────────────────────────────────────

pub fn decode_expert_type(s: &str) -> Result<ExpertType> {
  Ok(ExpertType::parse(s)?)
}

pub fn decode_focus_area(s: &str) -> Result<FocusArea> {
  Ok(FocusArea::parse(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawExpert::from_row`]; callers alias `experts` as
/// `e` and `cities` as `c`.
pub const EXPERT_COLUMNS: &str = "
  e.id, e.name, e.type, e.title, e.affiliation, e.city_id, e.description,
  e.founding_year, e.is_diaspora, e.image, e.created_at, e.updated_at,
  c.name, c.country";

/// Raw values read from an `experts` row joined with its city.
pub struct RawExpert {
  pub id:            String,
  pub name:          String,
  pub kind:          String,
  pub title:         Option<String>,
  pub affiliation:   Option<String>,
  pub city_id:       i64,
  pub description:   Option<String>,
  pub founding_year: Option<i32>,
  pub is_diaspora:   bool,
  pub image:         Option<String>,
  pub created_at:    String,
  pub updated_at:    String,
  pub city_name:     String,
  pub country:       String,
}

impl RawExpert {
  /// Read the first fourteen columns in [`EXPERT_COLUMNS`] order.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      name:          row.get(1)?,
      kind:          row.get(2)?,
      title:         row.get(3)?,
      affiliation:   row.get(4)?,
      city_id:       row.get(5)?,
      description:   row.get(6)?,
      founding_year: row.get(7)?,
      is_diaspora:   row.get(8)?,
      image:         row.get(9)?,
      created_at:    row.get(10)?,
      updated_at:    row.get(11)?,
      city_name:     row.get(12)?,
      country:       row.get(13)?,
    })
  }

  pub fn into_summary(self) -> Result<ExpertSummary> {
    Ok(ExpertSummary {
      expert:    Expert {
        id:            decode_uuid(&self.id)?,
        name:          self.name,
        kind:          decode_expert_type(&self.kind)?,
        title:         self.title,
        affiliation:   self.affiliation,
        city_id:       self.city_id,
        description:   self.description,
        founding_year: self.founding_year,
        is_diaspora:   self.is_diaspora,
        image:         self.image,
        created_at:    decode_dt(&self.created_at)?,
        updated_at:    decode_dt(&self.updated_at)?,
      },
      city_name: self.city_name,
      country:   self.country,
    })
  }
}

pub struct RawContact {
  pub id:         i64,
  pub kind:       String,
  pub value:      String,
  pub is_primary: bool,
}

impl RawContact {
  pub fn into_contact(self) -> Result<Contact> {
    Ok(Contact {
      id:         self.id,
      kind:       ContactType::parse(&self.kind)?,
      value:      self.value,
      is_primary: self.is_primary,
    })
  }
}

pub struct RawActivity {
  pub id:          i64,
  pub title:       String,
  pub description: Option<String>,
  pub date_start:  Option<String>,
  pub date_end:    Option<String>,
}

impl RawActivity {
  pub fn into_activity(self) -> Result<Activity> {
    Ok(Activity {
      id:          self.id,
      title:       self.title,
      description: self.description,
      date_start:  self.date_start.as_deref().map(decode_date).transpose()?,
      date_end:    self.date_end.as_deref().map(decode_date).transpose()?,
    })
  }
}

pub struct RawPublication {
  pub id:               i64,
  pub title:            String,
  pub url:              Option<String>,
  pub publication_date: Option<String>,
  pub description:      Option<String>,
}

impl RawPublication {
  pub fn into_publication(self) -> Result<Publication> {
    Ok(Publication {
      id:               self.id,
      title:            self.title,
      url:              self.url,
      publication_date: self
        .publication_date
        .as_deref()
        .map(decode_date)
        .transpose()?,
      description:      self.description,
    })
  }
}
