use std::cmp::Reverse;
use std::sync::Arc;

use anyhow::anyhow;
use mongodb::bson::oid::ObjectId;
use rand::seq::IndexedRandom;
use validator::Validate;

use crate::metrics::TEAMS_REGISTERED_TOTAL;
use crate::models::team::{
    Member, RegisterTeamRequest, RegisterTeamResponse, Sector, Team,
};

use super::errors::ServiceError;
use super::store::TeamStore;

pub struct TeamService {
    teams: Arc<dyn TeamStore>,
    sectors: Vec<Sector>,
}

impl TeamService {
    pub fn new(teams: Arc<dyn TeamStore>, sectors: Vec<Sector>) -> Self {
        Self { teams, sectors }
    }

    pub async fn register(
        &self,
        req: RegisterTeamRequest,
    ) -> Result<RegisterTeamResponse, ServiceError> {
        let req = req.normalized();
        req.validate()?;

        if self.teams.find_by_name(&req.team_name).await?.is_some() {
            tracing::warn!("Registration rejected, name taken: {}", req.team_name);
            return Err(ServiceError::Conflict("Team name already exists".to_string()));
        }

        let sector = *self
            .sectors
            .choose(&mut rand::rng())
            .ok_or_else(|| anyhow!("No registration sectors configured"))?;

        let members: Vec<Member> = req
            .members
            .into_iter()
            .map(|m| Member {
                name: m.name,
                email: m.email,
            })
            .collect();

        let team = Team::new(ObjectId::new().to_hex(), req.team_name, members, sector);

        // The unique index still catches a concurrent registration of the same name
        self.teams.insert(&team).await?;

        TEAMS_REGISTERED_TOTAL.inc();
        tracing::info!(
            "Team registered: id={}, name={}, sector={}",
            team.id,
            team.team_name,
            team.sector
        );

        Ok(RegisterTeamResponse {
            team_id: team.id,
            team_name: team.team_name,
            sector: team.sector,
            member_count: team.members.len(),
        })
    }

    pub async fn get(&self, team_id: &str) -> Result<Team, ServiceError> {
        self.teams
            .find_by_id(team_id)
            .await?
            .ok_or_else(ServiceError::team_not_found)
    }

    pub async fn get_by_name(&self, team_name: &str) -> Result<Team, ServiceError> {
        self.teams
            .find_by_name(team_name)
            .await?
            .ok_or_else(ServiceError::team_not_found)
    }

    /// All teams by total score, highest first; ties keep registration order
    pub async fn list(&self) -> Result<Vec<Team>, ServiceError> {
        let mut teams = self.teams.list().await?;
        sort_by_total_desc(&mut teams);
        Ok(teams)
    }
}

pub(crate) fn sort_by_total_desc(teams: &mut [Team]) {
    teams.sort_by_key(|team| Reverse(team.total_score));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::team::MemberInput;
    use crate::services::memory_store::MemoryTeamStore;

    fn service(sectors: Vec<Sector>) -> TeamService {
        TeamService::new(Arc::new(MemoryTeamStore::new()), sectors)
    }

    fn request(team_name: &str) -> RegisterTeamRequest {
        RegisterTeamRequest {
            team_name: team_name.to_string(),
            members: vec![MemberInput {
                name: "Ada Lovelace".to_string(),
                email: "Ada@Example.com".to_string(),
            }],
        }
    }

    #[tokio::test]
    async fn register_assigns_configured_sector() {
        let service = service(vec![Sector::HydroCore]);

        let response = service.register(request("  Circuit Breakers ")).await.unwrap();
        assert_eq!(response.team_name, "Circuit Breakers");
        assert_eq!(response.sector, Sector::HydroCore);
        assert_eq!(response.member_count, 1);

        let team = service.get(&response.team_id).await.unwrap();
        assert_eq!(team.members[0].email, "ada@example.com");
        assert_eq!(team.version, 0);
        assert!(team.is_active);
    }

    #[tokio::test]
    async fn duplicate_name_is_a_conflict() {
        let service = service(vec![Sector::LuminaDistrict]);
        service.register(request("Voltage")).await.unwrap();

        let err = service.register(request("Voltage")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn invalid_request_is_rejected_before_storage() {
        let service = service(vec![Sector::LuminaDistrict]);

        let err = service.register(request("ab")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_team_is_not_found() {
        let service = service(vec![Sector::LuminaDistrict]);
        assert!(matches!(
            service.get("000000000000000000000000").await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.get_by_name("Nobody").await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
