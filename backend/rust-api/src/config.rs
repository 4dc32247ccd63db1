use serde::Deserialize;
use std::env;

use crate::models::catalog::ComponentType;
use crate::models::team::Sector;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub mongo_uri: String,
    pub mongo_database: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub store_backend: StoreBackend,
    /// JSON catalog loaded by the memory backend
    pub seed_catalog: String,
    pub event: EventSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Mongo,
    Memory,
}

/// Tunable rules of the three rounds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EventSettings {
    /// Flat amount credited on top of quiz earnings
    pub quiz_bonus: i64,
    pub reward_per_correct: i64,
    pub quiz_question_limit: usize,
    pub purchase_size: usize,
    /// Expected component type per schematic slot
    pub correct_flow: Vec<ComponentType>,
    pub challenge_links: ChallengeLinks,
    /// Minutes announced at challenge hand-off
    pub challenge_time_limit: u32,
    /// Upper bound (and bonus base) for team-reported round 3 time
    pub round3_submission_time_cap: u32,
    /// Upper bound (and bonus base) for the admin round 3 override
    pub round3_override_time_cap: u32,
    pub registration_sectors: Vec<Sector>,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            quiz_bonus: 1200,
            reward_per_correct: 100,
            quiz_question_limit: 12,
            purchase_size: 6,
            correct_flow: vec![
                ComponentType::Sensor,
                ComponentType::Signal,
                ComponentType::Controller,
                ComponentType::Communication,
                ComponentType::Cloud,
                ComponentType::Actuator,
            ],
            challenge_links: ChallengeLinks::default(),
            challenge_time_limit: 30,
            round3_submission_time_cap: 30,
            round3_override_time_cap: 25,
            registration_sectors: vec![Sector::LuminaDistrict, Sector::HydroCore],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChallengeLinks {
    pub lumina_district: String,
    pub hydro_core: String,
    pub aero_hab: String,
}

impl Default for ChallengeLinks {
    fn default() -> Self {
        Self {
            lumina_district: "https://unstop.com/your-lumina-challenge".to_string(),
            hydro_core: "https://unstop.com/your-hydrocore-challenge".to_string(),
            aero_hab: "https://unstop.com/your-aerohab-challenge".to_string(),
        }
    }
}

impl ChallengeLinks {
    pub fn for_sector(&self, sector: Sector) -> &str {
        match sector {
            Sector::LuminaDistrict => &self.lumina_district,
            Sector::HydroCore => &self.hydro_core,
            Sector::AeroHab => &self.aero_hab,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // Root .env first, then a local one
        let skip_root_env = env::var("SKIP_ROOT_ENV").is_ok();
        if skip_root_env {
            dotenvy::dotenv().ok();
        } else if dotenvy::from_path("../../.env").is_err() {
            dotenvy::dotenv().ok();
        }

        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // config/*.toml + ENV overrides (prefix: APP_)
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let mongo_uri = settings
            .get_string("database.mongo_uri")
            .or_else(|_| env::var("MONGO_URI"))
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

        let mongo_database = settings
            .get_string("database.mongo_database")
            .or_else(|_| env::var("MONGO_DATABASE"))
            .unwrap_or_else(|_| "neurovia".to_string());

        let jwt_secret = match settings
            .get_string("auth.jwt_secret")
            .or_else(|_| env::var("JWT_SECRET"))
        {
            Ok(secret) => secret,
            Err(_) if env == "prod" => {
                return Err(config::ConfigError::Message(
                    "JWT_SECRET must be set in production".to_string(),
                ));
            }
            Err(_) => {
                tracing::warn!("Using default JWT_SECRET (dev mode only!)");
                "dev-secret-only-for-local-testing".to_string()
            }
        };

        let bind_addr = settings
            .get_string("server.bind_addr")
            .or_else(|_| env::var("BIND_ADDR"))
            .unwrap_or_else(|_| "0.0.0.0:5000".to_string());

        let store_backend = settings
            .get::<StoreBackend>("storage.backend")
            .ok()
            .or_else(|| match env::var("STORE_BACKEND").ok()?.as_str() {
                "memory" => Some(StoreBackend::Memory),
                "mongo" => Some(StoreBackend::Mongo),
                _ => None,
            })
            .unwrap_or(StoreBackend::Mongo);

        let seed_catalog = settings
            .get_string("storage.seed_catalog")
            .or_else(|_| env::var("SEED_CATALOG"))
            .unwrap_or_else(|_| "config/seed_catalog.json".to_string());

        let mut event = settings
            .get::<EventSettings>("event")
            .unwrap_or_default();

        if let Some(bonus) = env::var("QUIZ_BONUS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
        {
            event.quiz_bonus = bonus;
        }

        Ok(Config {
            mongo_uri,
            mongo_database,
            jwt_secret,
            bind_addr,
            store_backend,
            seed_catalog,
            event,
        })
    }
}
