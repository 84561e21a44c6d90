//! Read and aggregation queries. Everything here runs synchronously on the
//! connection thread and returns raw rows; decoding happens on the async side.

use rusqlite::{Connection, OptionalExtension as _, Params, params};
use uadir_core::{
  city::City,
  expert::{ExpertDetails, ExpertType, KeyFigure, Link, Profile},
};

use crate::{
  Result,
  encode::{
    EXPERT_COLUMNS, RawActivity, RawContact, RawExpert, RawPublication,
    decode_focus_area,
  },
};

// ─── Cities ──────────────────────────────────────────────────────────────────

pub fn cities(conn: &Connection) -> rusqlite::Result<Vec<City>> {
  let mut stmt = conn.prepare(
    "SELECT id, name, country, description FROM cities ORDER BY name, country",
  )?;
  let rows = stmt
    .query_map([], |row| {
      Ok(City {
        id:          row.get(0)?,
        name:        row.get(1)?,
        country:     row.get(2)?,
        description: row.get(3)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

pub fn city_exists(conn: &Connection, city_id: i64) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row("SELECT 1 FROM cities WHERE id = ?1", params![city_id], |_| {
        Ok(true)
      })
      .optional()?
      .unwrap_or(false),
  )
}

// ─── Expert lists ────────────────────────────────────────────────────────────

/// Run an expert+city query with the given `WHERE` clause and ordering.
pub fn experts<P: Params>(
  conn: &Connection,
  where_clause: &str,
  order_by: &str,
  params: P,
) -> rusqlite::Result<Vec<RawExpert>> {
  let sql = format!(
    "SELECT {EXPERT_COLUMNS}
     FROM experts e
     JOIN cities c ON c.id = e.city_id
     {where_clause}
     ORDER BY {order_by}"
  );
  let mut stmt = conn.prepare(&sql)?;
  let rows = stmt
    .query_map(params, RawExpert::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

/// Case-insensitive search. `needle` must already be case-folded; the
/// `casefold` SQL function is registered by the store at connection startup.
pub fn search(conn: &Connection, needle: &str) -> rusqlite::Result<Vec<RawExpert>> {
  experts(
    conn,
    "WHERE instr(casefold(e.name), ?1) > 0
        OR instr(casefold(e.description), ?1) > 0
        OR instr(casefold(e.title), ?1) > 0
        OR instr(casefold(e.affiliation), ?1) > 0
        OR EXISTS (
          SELECT 1 FROM expert_tags et
          JOIN tags t ON t.id = et.tag_id
          WHERE et.expert_id = e.id AND instr(casefold(t.name), ?1) > 0
        )",
    "e.name, e.id",
    params![needle],
  )
}

/// Organizations outer-joined with their key figures, folded so that each
/// organization appears once.
pub fn organizations_with_key_figures(
  conn: &Connection,
  city_id: Option<i64>,
) -> rusqlite::Result<Vec<(RawExpert, Vec<KeyFigure>)>> {
  let sql = format!(
    "SELECT {EXPERT_COLUMNS}, kf.id, kf.name, kf.role, kf.description
     FROM experts e
     JOIN cities c ON c.id = e.city_id
     LEFT JOIN key_figures kf ON kf.organization_id = e.id
     WHERE e.type = 'organization'
       AND (?1 IS NULL OR e.city_id = ?1)
     ORDER BY e.name, e.id, kf.id"
  );
  let mut stmt = conn.prepare(&sql)?;
  let mut rows = stmt.query(params![city_id])?;

  let mut out: Vec<(RawExpert, Vec<KeyFigure>)> = Vec::new();
  while let Some(row) = rows.next()? {
    let id: String = row.get(0)?;
    if out.last().is_none_or(|(e, _)| e.id != id) {
      out.push((RawExpert::from_row(row)?, Vec::new()));
    }
    let figure_id: Option<i64> = row.get(14)?;
    if let (Some(figure_id), Some((_, figures))) = (figure_id, out.last_mut()) {
      figures.push(KeyFigure {
        id:          figure_id,
        name:        row.get(15)?,
        role:        row.get(16)?,
        description: row.get(17)?,
      });
    }
  }
  Ok(out)
}

// ─── Details ─────────────────────────────────────────────────────────────────

/// Every row that makes up one [`ExpertDetails`], still undecoded.
pub struct RawDetails {
  pub expert:       RawExpert,
  pub focus_areas:  Vec<String>,
  pub contacts:     Vec<RawContact>,
  pub links:        Vec<Link>,
  pub tags:         Vec<String>,
  pub activities:   Vec<RawActivity>,
  pub key_figures:  Vec<KeyFigure>,
  pub publications: Vec<RawPublication>,
}

impl RawDetails {
  pub fn into_details(self) -> Result<ExpertDetails> {
    let summary = self.expert.into_summary()?;
    let profile = match summary.expert.kind {
      ExpertType::Organization => Profile::Organization {
        key_figures: self.key_figures,
      },
      ExpertType::Individual => Profile::Individual {
        publications: self
          .publications
          .into_iter()
          .map(RawPublication::into_publication)
          .collect::<Result<_>>()?,
      },
    };

    Ok(ExpertDetails {
      summary,
      focus_areas: self
        .focus_areas
        .iter()
        .map(|a| decode_focus_area(a))
        .collect::<Result<_>>()?,
      contacts: self
        .contacts
        .into_iter()
        .map(RawContact::into_contact)
        .collect::<Result<_>>()?,
      links: self.links,
      tags: self.tags,
      activities: self
        .activities
        .into_iter()
        .map(RawActivity::into_activity)
        .collect::<Result<_>>()?,
      profile,
    })
  }
}

/// Fetch the base row, then each child collection. Key figures are only
/// read for organizations and publications only for individuals.
pub fn details(conn: &Connection, id: &str) -> rusqlite::Result<Option<RawDetails>> {
  let Some(expert) = experts(conn, "WHERE e.id = ?1", "e.id", params![id])?
    .into_iter()
    .next()
  else {
    return Ok(None);
  };

  let focus_areas = strings(
    conn,
    "SELECT focus_area FROM expert_focus_areas
     WHERE expert_id = ?1 ORDER BY focus_area",
    id,
  )?;

  let mut stmt = conn.prepare(
    "SELECT id, contact_type, contact_value, is_primary
     FROM contacts WHERE expert_id = ?1 ORDER BY id",
  )?;
  let contacts = stmt
    .query_map(params![id], |row| {
      Ok(RawContact {
        id:         row.get(0)?,
        kind:       row.get(1)?,
        value:      row.get(2)?,
        is_primary: row.get(3)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut stmt = conn.prepare(
    "SELECT id, title, url, description
     FROM links WHERE expert_id = ?1 ORDER BY id",
  )?;
  let links = stmt
    .query_map(params![id], |row| {
      Ok(Link {
        id:          row.get(0)?,
        title:       row.get(1)?,
        url:         row.get(2)?,
        description: row.get(3)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let tags = strings(
    conn,
    "SELECT t.name FROM expert_tags et
     JOIN tags t ON t.id = et.tag_id
     WHERE et.expert_id = ?1 ORDER BY t.name",
    id,
  )?;

  let mut stmt = conn.prepare(
    "SELECT id, title, description, date_start, date_end
     FROM activities WHERE expert_id = ?1
     ORDER BY date_start DESC, id DESC",
  )?;
  let activities = stmt
    .query_map(params![id], |row| {
      Ok(RawActivity {
        id:          row.get(0)?,
        title:       row.get(1)?,
        description: row.get(2)?,
        date_start:  row.get(3)?,
        date_end:    row.get(4)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let key_figures = if expert.kind == "organization" {
    key_figures(conn, id)?
  } else {
    Vec::new()
  };

  let publications = if expert.kind == "individual" {
    let mut stmt = conn.prepare(
      "SELECT id, title, url, publication_date, description
       FROM publications WHERE expert_id = ?1
       ORDER BY publication_date DESC, id DESC",
    )?;
    stmt
      .query_map(params![id], |row| {
        Ok(RawPublication {
          id:               row.get(0)?,
          title:            row.get(1)?,
          url:              row.get(2)?,
          publication_date: row.get(3)?,
          description:      row.get(4)?,
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?
  } else {
    Vec::new()
  };

  Ok(Some(RawDetails {
    expert,
    focus_areas,
    contacts,
    links,
    tags,
    activities,
    key_figures,
    publications,
  }))
}

fn key_figures(conn: &Connection, org_id: &str) -> rusqlite::Result<Vec<KeyFigure>> {
  let mut stmt = conn.prepare(
    "SELECT id, name, role, description
     FROM key_figures WHERE organization_id = ?1 ORDER BY id",
  )?;
  let rows = stmt
    .query_map(params![org_id], |row| {
      Ok(KeyFigure {
        id:          row.get(0)?,
        name:        row.get(1)?,
        role:        row.get(2)?,
        description: row.get(3)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn strings(conn: &Connection, sql: &str, id: &str) -> rusqlite::Result<Vec<String>> {
  let mut stmt = conn.prepare(sql)?;
  let rows = stmt
    .query_map(params![id], |row| row.get(0))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}
