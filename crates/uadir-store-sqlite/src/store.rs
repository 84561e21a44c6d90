//! [`SqliteStore`], the SQLite implementation of [`DirectoryStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, functions::FunctionFlags, params};
use tracing::{debug, warn};
use uuid::Uuid;

use uadir_core::{
  Classify, ErrorKind,
  city::{City, NewCity},
  expert::{
    Activity, ExpertDetails, ExpertSummary, ExpertType, FocusArea,
    OrganizationSummary, Publication,
  },
  input::{ExpertPatch, NewActivity, NewExpert, NewPublication},
  stats::Statistics,
  store::DirectoryStore,
};

use crate::{
  Error, Result,
  encode::{RawExpert, encode_uuid},
  read, schema::SCHEMA, stats, write,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An expert directory backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection handle is shared.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        // Unicode-aware lowercasing; SQLite's own lower() is ASCII-only.
        conn.create_scalar_function(
          "casefold",
          1,
          FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
          |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|s| s.to_lowercase())),
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` on the connection thread.
  async fn read<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
  {
    Ok(self.conn.call(move |conn| Ok(f(conn)?)).await?)
  }

  /// Run `f` inside a transaction that commits only if `f` succeeds.
  async fn write<T, F>(&self, op: &'static str, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T> + Send + 'static,
  {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let outcome = f(&tx);
        if outcome.is_ok() {
          tx.commit()?;
        }
        Ok(outcome)
      })
      .await?
      .inspect_err(|e| log_rollback(op, e))
  }

  async fn summaries<F>(&self, f: F) -> Result<Vec<ExpertSummary>>
  where
    F: FnOnce(&Connection) -> rusqlite::Result<Vec<RawExpert>> + Send + 'static,
  {
    self
      .read(f)
      .await?
      .into_iter()
      .map(RawExpert::into_summary)
      .collect()
  }
}

/// Whether a rolled-back write was refused by the directory's own rules
/// rather than by a failing database.
pub(crate) fn is_refusal(e: &Error) -> bool {
  matches!(e.kind(), ErrorKind::NotFound | ErrorKind::Constraint)
}

fn log_rollback(op: &'static str, e: &Error) {
  if is_refusal(e) {
    debug!(op, error = %e, "write rolled back");
  } else {
    warn!(op, error = %e, "write rolled back");
  }
}

// ─── DirectoryStore impl ─────────────────────────────────────────────────────

impl DirectoryStore for SqliteStore {
  type Error = Error;

  async fn list_cities(&self) -> Result<Vec<City>> {
    self.read(read::cities).await
  }

  async fn add_city(&self, city: NewCity) -> Result<City> {
    let city = self
      .write("add_city", move |conn| write::add_city(conn, city))
      .await?;
    debug!(id = city.id, name = %city.name, "city added");
    Ok(city)
  }

  async fn list_experts(&self, kind: Option<ExpertType>) -> Result<Vec<ExpertSummary>> {
    let kind = kind.map(ExpertType::as_str);
    self
      .summaries(move |conn| {
        read::experts(
          conn,
          "WHERE ?1 IS NULL OR e.type = ?1",
          "e.name, e.id",
          params![kind],
        )
      })
      .await
  }

  async fn experts_by_city(&self, city_id: i64) -> Result<Vec<ExpertSummary>> {
    self
      .summaries(move |conn| {
        read::experts(conn, "WHERE e.city_id = ?1", "e.name, e.id", params![city_id])
      })
      .await
  }

  async fn organizations_with_key_figures(
    &self,
    city_id: Option<i64>,
  ) -> Result<Vec<OrganizationSummary>> {
    self
      .read(move |conn| read::organizations_with_key_figures(conn, city_id))
      .await?
      .into_iter()
      .map(|(raw, key_figures)| {
        Ok(OrganizationSummary { summary: raw.into_summary()?, key_figures })
      })
      .collect()
  }

  async fn expert_details(&self, id: Uuid) -> Result<Option<ExpertDetails>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| {
        // One read transaction so every child query sees the same snapshot.
        let tx = conn.transaction()?;
        Ok(read::details(&tx, &id_str)?)
      })
      .await?;
    raw.map(read::RawDetails::into_details).transpose()
  }

  async fn search<'a>(&'a self, term: &'a str) -> Result<Vec<ExpertSummary>> {
    let term = term.trim();
    if term.is_empty() {
      return Err(
        uadir_core::Error::Validation("search term must not be empty".into()).into(),
      );
    }
    let needle = term.to_lowercase();
    self.summaries(move |conn| read::search(conn, &needle)).await
  }

  async fn experts_by_focus_area(&self, area: FocusArea) -> Result<Vec<ExpertSummary>> {
    let area = area.as_str();
    self
      .summaries(move |conn| {
        read::experts(
          conn,
          "WHERE EXISTS (
             SELECT 1 FROM expert_focus_areas f
             WHERE f.expert_id = e.id AND f.focus_area = ?1
           )",
          "e.name, e.id",
          params![area],
        )
      })
      .await
  }

  async fn diaspora_organizations(&self) -> Result<Vec<ExpertSummary>> {
    self
      .summaries(|conn| {
        read::experts(
          conn,
          "WHERE e.type = 'organization' AND e.is_diaspora = 1",
          "c.name, e.name, e.id",
          [],
        )
      })
      .await
  }

  async fn create_expert(&self, input: NewExpert) -> Result<Uuid> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let name = input.name.clone();
    self
      .write("create_expert", move |conn| write::create(conn, id, &input, now))
      .await?;
    debug!(%id, %name, "expert created");
    Ok(id)
  }

  async fn update_expert(&self, id: Uuid, patch: ExpertPatch) -> Result<()> {
    let now = Utc::now();
    self
      .write("update_expert", move |conn| write::update(conn, id, &patch, now))
      .await?;
    debug!(%id, "expert updated");
    Ok(())
  }

  async fn delete_expert(&self, id: Uuid) -> Result<bool> {
    let deleted = self
      .write("delete_expert", move |conn| write::delete(conn, id))
      .await?;
    debug!(%id, deleted, "expert delete");
    Ok(deleted)
  }

  async fn add_activity(&self, expert_id: Uuid, activity: NewActivity) -> Result<Activity> {
    let now = Utc::now();
    self
      .write("add_activity", move |conn| {
        write::add_activity(conn, expert_id, activity, now)
      })
      .await
  }

  async fn add_publication(
    &self,
    expert_id: Uuid,
    publication: NewPublication,
  ) -> Result<Publication> {
    let now = Utc::now();
    self
      .write("add_publication", move |conn| {
        write::add_publication(conn, expert_id, publication, now)
      })
      .await
  }

  async fn statistics(&self) -> Result<Statistics> {
    self
      .conn
      .call(|conn| Ok(stats::statistics(conn)))
      .await?
  }
}

// ─── Test helpers ────────────────────────────────────────────────────────────

#[cfg(test)]
impl SqliteStore {
  pub(crate) async fn execute_batch(&self, sql: &'static str) -> Result<()> {
    self.read(move |conn| conn.execute_batch(sql)).await
  }

  pub(crate) async fn count_rows(&self, table: &'static str) -> Result<i64> {
    self
      .read(move |conn| {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
      })
      .await
  }
}
