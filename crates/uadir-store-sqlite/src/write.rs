//! Multi-statement writes. Each function expects to be called inside an open
//! transaction and leaves committing or rolling back to the caller.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension as _, params};
use uadir_core::{
  city::{City, NewCity},
  expert::{Activity, ExpertType, FocusArea, Publication},
  input::{
    ExpertPatch, NewActivity, NewContact, NewExpert, NewExpertKind, NewKeyFigure,
    NewLink, NewPublication, normalize_tags,
  },
};
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{decode_expert_type, encode_date, encode_dt, encode_uuid},
  read::city_exists,
};

// ─── Cities ──────────────────────────────────────────────────────────────────

pub fn add_city(conn: &Connection, city: NewCity) -> Result<City> {
  if city.name.trim().is_empty() || city.country.trim().is_empty() {
    return Err(
      uadir_core::Error::Validation("city name and country are required".into())
        .into(),
    );
  }
  conn.execute(
    "INSERT INTO cities (name, country, description) VALUES (?1, ?2, ?3)",
    params![city.name, city.country, city.description],
  )?;
  Ok(City {
    id:          conn.last_insert_rowid(),
    name:        city.name,
    country:     city.country,
    description: city.description,
  })
}

// ─── Experts ─────────────────────────────────────────────────────────────────

pub fn create(
  conn: &Connection,
  id: Uuid,
  input: &NewExpert,
  now: DateTime<Utc>,
) -> Result<()> {
  input.validate()?;
  if !city_exists(conn, input.city_id)? {
    return Err(Error::CityNotFound(input.city_id));
  }

  let id_str = encode_uuid(id);
  let now_str = encode_dt(now);
  conn.execute(
    "INSERT INTO experts
       (id, name, type, title, affiliation, city_id, description,
        founding_year, is_diaspora, image, created_at, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
    params![
      id_str,
      input.name,
      input.kind.expert_type().as_str(),
      input.title,
      input.affiliation,
      input.city_id,
      input.description,
      input.founding_year,
      input.is_diaspora,
      input.image,
      now_str,
    ],
  )?;

  insert_focus_areas(conn, &id_str, &input.focus_areas)?;
  insert_contacts(conn, &id_str, &input.contacts)?;
  if let NewExpertKind::Organization { key_figures } = &input.kind {
    insert_key_figures(conn, &id_str, key_figures)?;
  }
  insert_links(conn, &id_str, &input.links)?;
  insert_tags(conn, &id_str, &normalize_tags(&input.tags)?)?;
  Ok(())
}

/// Overwrite the scalars present in `patch` and replace every collection it
/// names. `updated_at` is refreshed even if nothing else changes.
pub fn update(
  conn: &Connection,
  id: Uuid,
  patch: &ExpertPatch,
  now: DateTime<Utc>,
) -> Result<()> {
  let id_str = encode_uuid(id);
  let kind = stored_type(conn, &id_str)?.ok_or(Error::ExpertNotFound(id))?;
  patch.validate(kind)?;
  if let Some(city_id) = patch.city_id {
    if !city_exists(conn, city_id)? {
      return Err(Error::CityNotFound(city_id));
    }
  }

  conn.execute(
    "UPDATE experts SET
       name          = COALESCE(?2, name),
       title         = COALESCE(?3, title),
       affiliation   = COALESCE(?4, affiliation),
       city_id       = COALESCE(?5, city_id),
       description   = COALESCE(?6, description),
       founding_year = COALESCE(?7, founding_year),
       is_diaspora   = COALESCE(?8, is_diaspora),
       image         = COALESCE(?9, image),
       updated_at    = ?10
     WHERE id = ?1",
    params![
      id_str,
      patch.name,
      patch.title,
      patch.affiliation,
      patch.city_id,
      patch.description,
      patch.founding_year,
      patch.is_diaspora,
      patch.image,
      encode_dt(now),
    ],
  )?;

  if let Some(areas) = patch.focus_areas.replacement() {
    conn.execute(
      "DELETE FROM expert_focus_areas WHERE expert_id = ?1",
      params![id_str],
    )?;
    insert_focus_areas(conn, &id_str, areas)?;
  }
  if let Some(contacts) = patch.contacts.replacement() {
    conn.execute("DELETE FROM contacts WHERE expert_id = ?1", params![id_str])?;
    insert_contacts(conn, &id_str, contacts)?;
  }
  if let Some(figures) = patch.key_figures.replacement() {
    conn.execute(
      "DELETE FROM key_figures WHERE organization_id = ?1",
      params![id_str],
    )?;
    insert_key_figures(conn, &id_str, figures)?;
  }
  if let Some(tags) = patch.tags.replacement() {
    conn.execute("DELETE FROM expert_tags WHERE expert_id = ?1", params![id_str])?;
    insert_tags(conn, &id_str, &normalize_tags(tags)?)?;
  }
  Ok(())
}

/// Child rows go with the expert through `ON DELETE CASCADE`.
pub fn delete(conn: &Connection, id: Uuid) -> Result<bool> {
  let n = conn.execute(
    "DELETE FROM experts WHERE id = ?1",
    params![encode_uuid(id)],
  )?;
  Ok(n > 0)
}

pub fn add_activity(
  conn: &Connection,
  id: Uuid,
  activity: NewActivity,
  now: DateTime<Utc>,
) -> Result<Activity> {
  let id_str = encode_uuid(id);
  stored_type(conn, &id_str)?.ok_or(Error::ExpertNotFound(id))?;
  if activity.title.trim().is_empty() {
    return Err(
      uadir_core::Error::Validation("activity title must not be empty".into())
        .into(),
    );
  }

  conn.execute(
    "INSERT INTO activities (expert_id, title, description, date_start, date_end)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    params![
      id_str,
      activity.title,
      activity.description,
      activity.date_start.map(encode_date),
      activity.date_end.map(encode_date),
    ],
  )?;
  let row_id = conn.last_insert_rowid();
  touch(conn, &id_str, now)?;

  Ok(Activity {
    id:          row_id,
    title:       activity.title,
    description: activity.description,
    date_start:  activity.date_start,
    date_end:    activity.date_end,
  })
}

pub fn add_publication(
  conn: &Connection,
  id: Uuid,
  publication: NewPublication,
  now: DateTime<Utc>,
) -> Result<Publication> {
  let id_str = encode_uuid(id);
  match stored_type(conn, &id_str)? {
    None => return Err(Error::ExpertNotFound(id)),
    Some(ExpertType::Organization) => return Err(Error::NotAnIndividual(id)),
    Some(ExpertType::Individual) => {}
  }
  if publication.title.trim().is_empty() {
    return Err(
      uadir_core::Error::Validation("publication title must not be empty".into())
        .into(),
    );
  }

  conn.execute(
    "INSERT INTO publications (expert_id, title, url, publication_date, description)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    params![
      id_str,
      publication.title,
      publication.url,
      publication.publication_date.map(encode_date),
      publication.description,
    ],
  )?;
  let row_id = conn.last_insert_rowid();
  touch(conn, &id_str, now)?;

  Ok(Publication {
    id:               row_id,
    title:            publication.title,
    url:              publication.url,
    publication_date: publication.publication_date,
    description:      publication.description,
  })
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn stored_type(conn: &Connection, id: &str) -> Result<Option<ExpertType>> {
  let kind: Option<String> = conn
    .query_row("SELECT type FROM experts WHERE id = ?1", params![id], |r| {
      r.get(0)
    })
    .optional()?;
  kind.as_deref().map(decode_expert_type).transpose()
}

fn touch(conn: &Connection, id: &str, now: DateTime<Utc>) -> Result<()> {
  conn.execute(
    "UPDATE experts SET updated_at = ?2 WHERE id = ?1",
    params![id, encode_dt(now)],
  )?;
  Ok(())
}

fn insert_focus_areas(conn: &Connection, id: &str, areas: &[FocusArea]) -> Result<()> {
  let mut stmt = conn.prepare(
    "INSERT OR IGNORE INTO expert_focus_areas (expert_id, focus_area) VALUES (?1, ?2)",
  )?;
  for area in areas {
    stmt.execute(params![id, area.as_str()])?;
  }
  Ok(())
}

fn insert_contacts(conn: &Connection, id: &str, contacts: &[NewContact]) -> Result<()> {
  let mut stmt = conn.prepare(
    "INSERT INTO contacts (expert_id, contact_type, contact_value, is_primary)
     VALUES (?1, ?2, ?3, ?4)",
  )?;
  for c in contacts {
    stmt.execute(params![id, c.kind.as_str(), c.value, c.is_primary])?;
  }
  Ok(())
}

fn insert_key_figures(
  conn: &Connection,
  id: &str,
  figures: &[NewKeyFigure],
) -> Result<()> {
  let mut stmt = conn.prepare(
    "INSERT INTO key_figures (organization_id, name, role, description)
     VALUES (?1, ?2, ?3, ?4)",
  )?;
  for f in figures {
    stmt.execute(params![id, f.name, f.role, f.description])?;
  }
  Ok(())
}

fn insert_links(conn: &Connection, id: &str, links: &[NewLink]) -> Result<()> {
  let mut stmt = conn.prepare(
    "INSERT INTO links (expert_id, title, url, description) VALUES (?1, ?2, ?3, ?4)",
  )?;
  for l in links {
    stmt.execute(params![id, l.title, l.url, l.description])?;
  }
  Ok(())
}

/// Find-or-create each tag by name, then associate it. A tag created by a
/// concurrent writer is picked up by the conflict clause rather than failing.
fn insert_tags(conn: &Connection, id: &str, tags: &[String]) -> Result<()> {
  let mut create =
    conn.prepare("INSERT INTO tags (name) VALUES (?1) ON CONFLICT (name) DO NOTHING")?;
  let mut lookup = conn.prepare("SELECT id FROM tags WHERE name = ?1")?;
  let mut link = conn
    .prepare("INSERT OR IGNORE INTO expert_tags (expert_id, tag_id) VALUES (?1, ?2)")?;
  for name in tags {
    create.execute(params![name])?;
    let tag_id: i64 = lookup.query_row(params![name], |r| r.get(0))?;
    link.execute(params![id, tag_id])?;
  }
  Ok(())
}
