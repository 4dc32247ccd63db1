use std::sync::Arc;

use crate::config::Config;
use mongodb::Client as MongoClient;

use self::memory_store::{MemoryCatalog, MemoryTeamStore};
use self::mongo_store::{MongoCatalog, MongoTeamStore};
use self::store::{Catalog, TeamStore};

pub struct AppState {
    pub config: Config,
    pub teams: Arc<dyn TeamStore>,
    pub catalog: Arc<dyn Catalog>,
}

impl AppState {
    pub async fn new(config: Config, mongo_client: MongoClient) -> anyhow::Result<Self> {
        let mongo = mongo_client.database(&config.mongo_database);

        tracing::info!("Preparing MongoDB collections in {}", config.mongo_database);

        let teams = MongoTeamStore::new(mongo.clone());
        teams.ensure_indexes().await?;
        let catalog = MongoCatalog::new(&mongo);

        tracing::info!("MongoDB storage ready");

        Ok(Self::with_stores(config, Arc::new(teams), Arc::new(catalog)))
    }

    /// Process-local state over the seed catalog named in the config
    pub fn in_memory(config: Config) -> anyhow::Result<Self> {
        let catalog = MemoryCatalog::from_seed_file(&config.seed_catalog)?;
        Ok(Self::with_stores(
            config,
            Arc::new(MemoryTeamStore::new()),
            Arc::new(catalog),
        ))
    }

    pub fn with_stores(
        config: Config,
        teams: Arc<dyn TeamStore>,
        catalog: Arc<dyn Catalog>,
    ) -> Self {
        Self {
            config,
            teams,
            catalog,
        }
    }
}

pub mod admin_service;
pub mod errors;
pub mod memory_store;
pub mod mongo_store;
pub mod round1_service;
pub mod round2_service;
pub mod round3_service;
pub mod scoring;
pub mod store;
pub mod team_service;
