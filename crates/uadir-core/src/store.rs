//! The `DirectoryStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `uadir-store-sqlite`).
//! Higher layers (`uadir-api`, `uadir-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  Classify,
  city::{City, NewCity},
  expert::{
    Activity, ExpertDetails, ExpertSummary, ExpertType, FocusArea,
    OrganizationSummary, Publication,
  },
  input::{ExpertPatch, NewActivity, NewExpert, NewPublication},
  stats::Statistics,
};

/// Abstraction over a directory store backend.
///
/// Every write is a single atomic unit: it either commits completely or
/// leaves the previous state untouched. Reads never mutate.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait DirectoryStore: Send + Sync {
  type Error: std::error::Error + Classify + Send + Sync + 'static;

  // ── Cities ────────────────────────────────────────────────────────────

  /// All cities, ordered by name.
  fn list_cities(
    &self,
  ) -> impl Future<Output = Result<Vec<City>, Self::Error>> + Send + '_;

  /// Persist a new city. A duplicate `(name, country)` is a constraint error.
  fn add_city(
    &self,
    city: NewCity,
  ) -> impl Future<Output = Result<City, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// All experts, optionally of one type, ordered by name.
  fn list_experts(
    &self,
    kind: Option<ExpertType>,
  ) -> impl Future<Output = Result<Vec<ExpertSummary>, Self::Error>> + Send + '_;

  /// Experts based in `city_id`, ordered by name. An unknown city yields an
  /// empty list.
  fn experts_by_city(
    &self,
    city_id: i64,
  ) -> impl Future<Output = Result<Vec<ExpertSummary>, Self::Error>> + Send + '_;

  /// Every organization with its key figures, optionally restricted to one
  /// city, ordered by name.
  fn organizations_with_key_figures(
    &self,
    city_id: Option<i64>,
  ) -> impl Future<Output = Result<Vec<OrganizationSummary>, Self::Error>>
  + Send
  + '_;

  /// Assemble the full [`ExpertDetails`] for one expert. Returns `None` if the
  /// expert does not exist.
  fn expert_details(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ExpertDetails>, Self::Error>> + Send + '_;

  /// Case-insensitive substring search over name, description, title,
  /// affiliation and tag names. Each expert appears at most once.
  fn search<'a>(
    &'a self,
    term: &'a str,
  ) -> impl Future<Output = Result<Vec<ExpertSummary>, Self::Error>> + Send + 'a;

  /// Experts working in `area`, ordered by name.
  fn experts_by_focus_area(
    &self,
    area: FocusArea,
  ) -> impl Future<Output = Result<Vec<ExpertSummary>, Self::Error>> + Send + '_;

  /// Diaspora organizations ordered by city name, then name.
  fn diaspora_organizations(
    &self,
  ) -> impl Future<Output = Result<Vec<ExpertSummary>, Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Insert an expert together with all of its child rows and return the new
  /// identifier. Tags are found or created by name.
  fn create_expert(
    &self,
    input: NewExpert,
  ) -> impl Future<Output = Result<Uuid, Self::Error>> + Send + '_;

  /// Apply `patch` to an existing expert. Scalars present in the patch are
  /// overwritten; each child collection is either replaced entirely or left
  /// alone. Fails with a not-found error if the expert does not exist.
  fn update_expert(
    &self,
    id: Uuid,
    patch: ExpertPatch,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete an expert and every child row. Returns `false` if there was
  /// nothing to delete.
  fn delete_expert(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Append an activity to an existing expert.
  fn add_activity(
    &self,
    expert_id: Uuid,
    activity: NewActivity,
  ) -> impl Future<Output = Result<Activity, Self::Error>> + Send + '_;

  /// Append a publication to an existing individual.
  fn add_publication(
    &self,
    expert_id: Uuid,
    publication: NewPublication,
  ) -> impl Future<Output = Result<Publication, Self::Error>> + Send + '_;

  // ── Statistics ────────────────────────────────────────────────────────

  fn statistics(
    &self,
  ) -> impl Future<Output = Result<Statistics, Self::Error>> + Send + '_;
}
