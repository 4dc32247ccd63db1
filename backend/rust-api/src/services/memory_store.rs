use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::models::catalog::{Component, QuizQuestion};
use crate::models::team::Team;

use super::store::{Catalog, StoreError, StoreResult, TeamStore};

/// Process-local team store; used for demos and the test-suite
#[derive(Default)]
pub struct MemoryTeamStore {
    teams: RwLock<Vec<Team>>,
}

impl MemoryTeamStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TeamStore for MemoryTeamStore {
    async fn insert(&self, team: &Team) -> StoreResult<()> {
        let mut teams = self.teams.write().await;
        if teams
            .iter()
            .any(|t| t.id == team.id || t.team_name == team.team_name)
        {
            return Err(StoreError::Duplicate("Team name already exists".to_string()));
        }
        teams.push(team.clone());
        Ok(())
    }

    async fn find_by_id(&self, team_id: &str) -> StoreResult<Option<Team>> {
        let teams = self.teams.read().await;
        Ok(teams.iter().find(|t| t.id == team_id).cloned())
    }

    async fn find_by_name(&self, team_name: &str) -> StoreResult<Option<Team>> {
        let teams = self.teams.read().await;
        Ok(teams.iter().find(|t| t.team_name == team_name).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<Team>> {
        Ok(self.teams.read().await.clone())
    }

    async fn replace_if_version(&self, team: &Team, expected_version: i64) -> StoreResult<bool> {
        let mut teams = self.teams.write().await;
        match teams
            .iter_mut()
            .find(|t| t.id == team.id && t.version == expected_version)
        {
            Some(slot) => {
                *slot = team.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, team_id: &str) -> StoreResult<bool> {
        let mut teams = self.teams.write().await;
        let before = teams.len();
        teams.retain(|t| t.id != team_id);
        Ok(teams.len() != before)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[derive(Deserialize)]
struct SeedCatalog {
    components: Vec<Component>,
    questions: Vec<QuizQuestion>,
}

#[derive(Default)]
pub struct MemoryCatalog {
    components: Vec<Component>,
    questions: Vec<QuizQuestion>,
}

impl MemoryCatalog {
    pub fn new(components: Vec<Component>, mut questions: Vec<QuizQuestion>) -> Self {
        questions.sort_by(|a, b| a.id.cmp(&b.id));
        Self {
            components,
            questions,
        }
    }

    /// Loads components and quiz questions from a JSON seed file
    pub fn from_seed_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed catalog {}", path.display()))?;
        let seed: SeedCatalog = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid seed catalog {}", path.display()))?;

        tracing::info!(
            "Seed catalog loaded: {} components, {} questions",
            seed.components.len(),
            seed.questions.len()
        );

        Ok(Self::new(seed.components, seed.questions))
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn active_questions(&self, limit: usize) -> StoreResult<Vec<QuizQuestion>> {
        Ok(self
            .questions
            .iter()
            .filter(|q| q.is_active)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn available_components(&self) -> StoreResult<Vec<Component>> {
        Ok(self
            .components
            .iter()
            .filter(|c| c.is_available)
            .cloned()
            .collect())
    }

    async fn components_by_ids(&self, ids: &[String]) -> StoreResult<Vec<Component>> {
        Ok(self
            .components
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }
}
