//! Bulk import of create payloads and timestamped JSON exports.

use std::{
  collections::HashSet,
  fs,
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::client::ApiClient;

// ─── Import ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
  pub created: usize,
  pub skipped: usize,
  pub failed:  usize,
}

/// Comparison key for duplicate detection.
fn fold(name: &str) -> String { name.trim().to_lowercase() }

/// Split `entries` into payloads to create and names to skip. An entry is
/// skipped if it has no name or its name matches an existing one (or an
/// earlier entry) case-insensitively.
pub fn plan_import(
  entries: Vec<Value>,
  existing: impl IntoIterator<Item = String>,
) -> (Vec<Value>, Vec<String>) {
  let mut seen: HashSet<String> = existing.into_iter().map(|n| fold(&n)).collect();
  let mut create = Vec::new();
  let mut skip = Vec::new();
  for entry in entries {
    let name = entry.get("name").and_then(Value::as_str).map(str::to_owned);
    match name {
      Some(name) if seen.insert(fold(&name)) => create.push(entry),
      Some(name) => skip.push(name),
      None => skip.push(String::from("<unnamed>")),
    }
  }
  (create, skip)
}

pub async fn import(client: &ApiClient, path: &Path) -> Result<ImportReport> {
  let raw = fs::read_to_string(path)
    .with_context(|| format!("reading {}", path.display()))?;
  let entries: Vec<Value> =
    serde_json::from_str(&raw).context("expected a JSON array of experts")?;

  let existing = client
    .experts(None)
    .await?
    .into_iter()
    .map(|e| e.expert.name);
  let (create, skipped) = plan_import(entries, existing);

  let mut report = ImportReport { skipped: skipped.len(), ..Default::default() };
  for name in &skipped {
    info!(%name, "skipping existing expert");
  }
  for entry in &create {
    let name = entry.get("name").and_then(Value::as_str).unwrap_or_default();
    match client.create_expert(entry).await {
      Ok(id) => {
        info!(%id, %name, "created");
        report.created += 1;
      }
      Err(e) => {
        warn!(%name, error = %e, "create failed");
        report.failed += 1;
      }
    }
  }
  Ok(report)
}

// ─── Export ───────────────────────────────────────────────────────────────────

/// Fetch every listing plus each expert's details and write them to `dir` as
/// `<name>_<timestamp>.json`. Returns the files written.
pub async fn export(client: &ApiClient, dir: &Path) -> Result<Vec<PathBuf>> {
  fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
  let stamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();
  let mut written = Vec::new();

  let experts = client.experts(None).await?;
  let mut details = Vec::with_capacity(experts.len());
  for e in &experts {
    details.push(client.expert(e.expert.id).await?);
  }

  written.push(write_json(dir, "cities", &stamp, &client.cities().await?)?);
  written.push(write_json(dir, "experts", &stamp, &experts)?);
  written.push(write_json(
    dir,
    "organizations",
    &stamp,
    &client.organizations().await?,
  )?);
  written.push(write_json(
    dir,
    "diaspora_organizations",
    &stamp,
    &client.diaspora_organizations().await?,
  )?);
  written.push(write_json(dir, "statistics", &stamp, &client.statistics().await?)?);
  written.push(write_json(dir, "expert_details", &stamp, &details)?);
  Ok(written)
}

fn write_json<T: Serialize>(
  dir: &Path,
  name: &str,
  stamp: &str,
  value: &T,
) -> Result<PathBuf> {
  let path = dir.join(format!("{name}_{stamp}.json"));
  let json = serde_json::to_string_pretty(value)?;
  fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
  Ok(path)
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn import_skips_existing_names_case_insensitively() {
    let entries = vec![
      json!({ "name": "Razom", "type": "organization", "city_id": 1 }),
      json!({ "name": "razom ", "type": "organization", "city_id": 1 }),
      json!({ "name": "New Org", "type": "organization", "city_id": 1 }),
      json!({ "name": "NEW ORG", "type": "organization", "city_id": 1 }),
      json!({ "type": "individual", "city_id": 1 }),
    ];
    let (create, skip) = plan_import(entries, vec!["RAZOM".to_string()]);
    assert_eq!(create.len(), 1);
    assert_eq!(create[0]["name"], "New Org");
    assert_eq!(skip, vec!["Razom", "razom ", "NEW ORG", "<unnamed>"]);
  }

  #[test]
  fn export_files_are_timestamped() {
    let dir = std::env::temp_dir()
      .join(format!("uadir-export-{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    let path = write_json(&dir, "cities", "20240101_000000", &json!([])).unwrap();
    assert_eq!(
      path.file_name().unwrap().to_str().unwrap(),
      "cities_20240101_000000.json"
    );
    assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    fs::remove_dir_all(&dir).unwrap();
  }
}
