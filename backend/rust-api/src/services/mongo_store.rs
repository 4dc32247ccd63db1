use anyhow::{anyhow, Context};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};

use crate::metrics::track_db_operation;
use crate::models::catalog::{Component, QuizQuestion};
use crate::models::team::Team;
use crate::utils::retry::{retry_async_with_config, RetryConfig};

use super::store::{Catalog, StoreError, StoreResult, TeamStore};

const TEAMS: &str = "teams";
const COMPONENTS: &str = "components";
const QUESTIONS: &str = "quizquestions";

pub struct MongoTeamStore {
    mongo: Database,
    teams: Collection<Team>,
}

impl MongoTeamStore {
    pub fn new(mongo: Database) -> Self {
        let teams = mongo.collection::<Team>(TEAMS);
        Self { mongo, teams }
    }

    pub async fn ensure_indexes(&self) -> anyhow::Result<()> {
        let unique_name = IndexModel::builder()
            .keys(doc! { "teamName": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        let by_score = IndexModel::builder().keys(doc! { "totalScore": -1 }).build();
        let by_sector = IndexModel::builder().keys(doc! { "sector": 1 }).build();

        self.teams
            .create_indexes([unique_name, by_score, by_sector])
            .await
            .context("Failed to create team indexes")?;

        tracing::info!("Team indexes ensured");
        Ok(())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        *err.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref we)) if we.code == 11000
    )
}

#[async_trait]
impl TeamStore for MongoTeamStore {
    async fn insert(&self, team: &Team) -> StoreResult<()> {
        match self.teams.insert_one(team).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => {
                Err(StoreError::Duplicate("Team name already exists".to_string()))
            }
            Err(e) => Err(StoreError::Backend(
                anyhow!(e).context("Failed to insert team"),
            )),
        }
    }

    async fn find_by_id(&self, team_id: &str) -> StoreResult<Option<Team>> {
        let team = track_db_operation("find_one", TEAMS, async {
            retry_async_with_config(RetryConfig::default(), || async {
                self.teams.find_one(doc! { "_id": team_id }).await
            })
            .await
            .context("Failed to query team")
        })
        .await?;
        Ok(team)
    }

    async fn find_by_name(&self, team_name: &str) -> StoreResult<Option<Team>> {
        let team = track_db_operation("find_one", TEAMS, async {
            retry_async_with_config(RetryConfig::default(), || async {
                self.teams.find_one(doc! { "teamName": team_name }).await
            })
            .await
            .context("Failed to query team by name")
        })
        .await?;
        Ok(team)
    }

    async fn list(&self) -> StoreResult<Vec<Team>> {
        let teams = track_db_operation("find", TEAMS, async {
            let cursor = self
                .teams
                .find(doc! {})
                .sort(doc! { "_id": 1 })
                .await
                .context("Failed to query teams")?;
            cursor
                .try_collect::<Vec<Team>>()
                .await
                .context("Failed to read teams cursor")
        })
        .await?;
        Ok(teams)
    }

    async fn replace_if_version(&self, team: &Team, expected_version: i64) -> StoreResult<bool> {
        let result = track_db_operation("replace_one", TEAMS, async {
            self.teams
                .replace_one(doc! { "_id": &team.id, "version": expected_version }, team)
                .await
                .context("Failed to replace team")
        })
        .await?;
        Ok(result.matched_count == 1)
    }

    async fn delete(&self, team_id: &str) -> StoreResult<bool> {
        let result = track_db_operation("delete_one", TEAMS, async {
            self.teams
                .delete_one(doc! { "_id": team_id })
                .await
                .context("Failed to delete team")
        })
        .await?;
        Ok(result.deleted_count == 1)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.mongo
            .run_command(doc! { "ping": 1 })
            .await
            .context("MongoDB ping failed")?;
        Ok(())
    }
}

pub struct MongoCatalog {
    components: Collection<Component>,
    questions: Collection<QuizQuestion>,
}

impl MongoCatalog {
    pub fn new(mongo: &Database) -> Self {
        Self {
            components: mongo.collection::<Component>(COMPONENTS),
            questions: mongo.collection::<QuizQuestion>(QUESTIONS),
        }
    }
}

#[async_trait]
impl Catalog for MongoCatalog {
    async fn active_questions(&self, limit: usize) -> StoreResult<Vec<QuizQuestion>> {
        let questions = track_db_operation("find", QUESTIONS, async {
            let cursor = self
                .questions
                .find(doc! { "isActive": true })
                .sort(doc! { "_id": 1 })
                .limit(limit as i64)
                .await
                .context("Failed to query quiz questions")?;
            cursor
                .try_collect::<Vec<QuizQuestion>>()
                .await
                .context("Failed to read quiz questions cursor")
        })
        .await?;
        Ok(questions)
    }

    async fn available_components(&self) -> StoreResult<Vec<Component>> {
        let components = track_db_operation("find", COMPONENTS, async {
            let cursor = self
                .components
                .find(doc! { "isAvailable": true })
                .sort(doc! { "_id": 1 })
                .await
                .context("Failed to query components")?;
            cursor
                .try_collect::<Vec<Component>>()
                .await
                .context("Failed to read components cursor")
        })
        .await?;
        Ok(components)
    }

    async fn components_by_ids(&self, ids: &[String]) -> StoreResult<Vec<Component>> {
        // Seeded catalogs use ObjectId keys, hand-written ones plain strings
        let keys: Vec<Bson> = ids
            .iter()
            .flat_map(|id| {
                let mut keys = vec![Bson::String(id.clone())];
                if let Ok(oid) = ObjectId::parse_str(id) {
                    keys.push(Bson::ObjectId(oid));
                }
                keys
            })
            .collect();

        let components = track_db_operation("find", COMPONENTS, async {
            let cursor = self
                .components
                .find(doc! { "_id": { "$in": keys } })
                .await
                .context("Failed to query components by id")?;
            cursor
                .try_collect::<Vec<Component>>()
                .await
                .context("Failed to read components cursor")
        })
        .await?;
        Ok(components)
    }
}
