//! Aggregate counts for the statistics endpoint.

use rusqlite::{Connection, params};
use uadir_core::stats::{
  CityCount, CountryCount, DiasporaCounts, FocusAreaCount, Statistics, TOP_N,
  TagCount, TypeCounts,
};

use crate::{Result, encode::decode_focus_area};

pub fn statistics(conn: &Connection) -> Result<Statistics> {
  let total: i64 = conn.query_row("SELECT COUNT(*) FROM experts", [], |r| r.get(0))?;

  let by_type = conn.query_row(
    "SELECT
       COALESCE(SUM(type = 'individual'), 0),
       COALESCE(SUM(type = 'organization'), 0)
     FROM experts",
    [],
    |r| Ok(TypeCounts { individual: r.get(0)?, organization: r.get(1)? }),
  )?;

  let by_diaspora = conn.query_row(
    "SELECT
       COALESCE(SUM(is_diaspora != 0), 0),
       COALESCE(SUM(is_diaspora = 0), 0)
     FROM experts",
    [],
    |r| Ok(DiasporaCounts { diaspora: r.get(0)?, non_diaspora: r.get(1)? }),
  )?;

  let mut stmt = conn.prepare(
    "SELECT c.name, c.country, COUNT(*) AS n
     FROM experts e JOIN cities c ON c.id = e.city_id
     GROUP BY c.id
     ORDER BY n DESC, c.name",
  )?;
  let by_city = stmt
    .query_map([], |r| {
      Ok(CityCount { name: r.get(0)?, country: r.get(1)?, count: r.get(2)? })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut stmt = conn.prepare(
    "SELECT c.country, COUNT(*) AS n
     FROM experts e JOIN cities c ON c.id = e.city_id
     GROUP BY c.country
     ORDER BY n DESC, c.country",
  )?;
  let by_country = stmt
    .query_map([], |r| Ok(CountryCount { country: r.get(0)?, count: r.get(1)? }))?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut stmt = conn.prepare(
    "SELECT focus_area, COUNT(*) AS n
     FROM expert_focus_areas
     GROUP BY focus_area
     ORDER BY n DESC, focus_area
     LIMIT ?1",
  )?;
  let by_focus_area = stmt
    .query_map(params![TOP_N as i64], |r| {
      Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)?))
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?
    .into_iter()
    .map(|(area, count)| {
      Ok(FocusAreaCount { focus_area: decode_focus_area(&area)?, count })
    })
    .collect::<Result<Vec<_>>>()?;

  let mut stmt = conn.prepare(
    "SELECT t.name, COUNT(*) AS n
     FROM expert_tags et JOIN tags t ON t.id = et.tag_id
     GROUP BY t.id
     ORDER BY n DESC, t.name
     LIMIT ?1",
  )?;
  let top_tags = stmt
    .query_map(params![TOP_N as i64], |r| {
      Ok(TagCount { name: r.get(0)?, count: r.get(1)? })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok(Statistics {
    total,
    by_type,
    by_city,
    by_country,
    by_focus_area,
    by_diaspora,
    top_tags,
  })
}
