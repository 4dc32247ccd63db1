use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;

use crate::metrics::WRITE_CONFLICTS_TOTAL;
use crate::models::catalog::{Component, QuizQuestion};
use crate::models::team::Team;

use super::errors::ServiceError;

/// Attempts before an optimistic update gives up on a contended team record
pub const MAX_WRITE_ATTEMPTS: usize = 5;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Duplicate(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One record per team, keyed by team id.
///
/// Listing returns teams in store order (ascending id, which is registration
/// order).
#[async_trait]
pub trait TeamStore: Send + Sync {
    async fn insert(&self, team: &Team) -> StoreResult<()>;

    async fn find_by_id(&self, team_id: &str) -> StoreResult<Option<Team>>;

    async fn find_by_name(&self, team_name: &str) -> StoreResult<Option<Team>>;

    async fn list(&self) -> StoreResult<Vec<Team>>;

    /// Replaces the record only if its stored version still equals
    /// `expected_version`. Returns `false` when another writer got there first.
    async fn replace_if_version(&self, team: &Team, expected_version: i64) -> StoreResult<bool>;

    async fn delete(&self, team_id: &str) -> StoreResult<bool>;

    async fn ping(&self) -> StoreResult<()>;
}

/// Read-only reference data: quiz questions and purchasable components
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Active questions in a stable order (ascending id), capped at `limit`
    async fn active_questions(&self, limit: usize) -> StoreResult<Vec<QuizQuestion>>;

    async fn available_components(&self) -> StoreResult<Vec<Component>>;

    /// Resolves ids regardless of availability; unknown ids are skipped
    async fn components_by_ids(&self, ids: &[String]) -> StoreResult<Vec<Component>>;
}

/// Read-modify-write of one team record with an optimistic version check.
///
/// `apply` runs against a fresh copy on every attempt, so its checks always
/// see the latest committed state. An error from `apply` aborts without
/// writing anything.
pub async fn update_team<T, F>(
    store: &dyn TeamStore,
    team_id: &str,
    mut apply: F,
) -> Result<(Team, T), ServiceError>
where
    F: FnMut(&mut Team) -> Result<T, ServiceError>,
{
    for attempt in 1..=MAX_WRITE_ATTEMPTS {
        let mut team = store
            .find_by_id(team_id)
            .await?
            .ok_or_else(ServiceError::team_not_found)?;

        let expected_version = team.version;
        let outcome = apply(&mut team)?;

        team.version = expected_version + 1;
        team.updated_at = Utc::now();
        team.refresh_total_score();

        if store.replace_if_version(&team, expected_version).await? {
            return Ok((team, outcome));
        }

        WRITE_CONFLICTS_TOTAL.inc();
        tracing::warn!(
            "Concurrent update on team {} (attempt {}/{}), retrying",
            team_id,
            attempt,
            MAX_WRITE_ATTEMPTS
        );
    }

    Err(ServiceError::Internal(anyhow::anyhow!(
        "Team {} is under heavy concurrent modification",
        team_id
    )))
}
