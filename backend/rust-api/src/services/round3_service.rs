use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::config::EventSettings;
use crate::metrics::{ROUND3_SUBMISSIONS_TOTAL, ROUND3_VERIFICATIONS_TOTAL};
use crate::models::round3::{
    ChallengeResponse, SubmitRound3Request, SubmitRound3Response, VerifyRound3Request,
    VerifyRound3Response,
};
use crate::models::team::Round3State;

use super::errors::ServiceError;
use super::scoring::{round3_final_score, round3_time_bonus};
use super::store::{update_team, TeamStore};

/// Round 3 "Neural Logic": an externally judged challenge whose result teams
/// report themselves and admins confirm.
pub struct Round3Service {
    teams: Arc<dyn TeamStore>,
    settings: EventSettings,
}

impl Round3Service {
    pub fn new(teams: Arc<dyn TeamStore>, settings: EventSettings) -> Self {
        Self { teams, settings }
    }

    pub async fn challenge(&self, team_id: &str) -> Result<ChallengeResponse, ServiceError> {
        let team = self
            .teams
            .find_by_id(team_id)
            .await?
            .ok_or_else(ServiceError::team_not_found)?;

        if !team.round2.submitted {
            return Err(ServiceError::precondition("Team must complete Round 2 first"));
        }

        Ok(ChallengeResponse {
            sector: team.sector,
            challenge_link: self
                .settings
                .challenge_links
                .for_sector(team.sector)
                .to_string(),
            time_limit: self.settings.challenge_time_limit,
        })
    }

    pub async fn submit(
        &self,
        req: &SubmitRound3Request,
    ) -> Result<SubmitRound3Response, ServiceError> {
        req.validate()?;

        let cap = self.settings.round3_submission_time_cap;
        let time_taken = checked_minutes(req.time_taken, cap)?;
        // validated to 0..=10 above
        let test_cases_passed = req.test_cases_passed as u32;

        let links = &self.settings.challenge_links;
        let (team, round3) = update_team(self.teams.as_ref(), &req.team_id, |team| {
            if !team.round2.submitted {
                return Err(ServiceError::precondition("Team must complete Round 2 first"));
            }

            team.round3 = Round3State {
                challenge_link: Some(links.for_sector(team.sector).to_string()),
                test_cases_passed,
                time_taken,
                submitted: true,
                submitted_at: Some(Utc::now()),
                final_score: round3_final_score(test_cases_passed, time_taken, cap),
                admin_verified: false,
            };
            Ok(team.round3.clone())
        })
        .await?;

        ROUND3_SUBMISSIONS_TOTAL.inc();
        tracing::info!(
            "Round 3 submitted: team={}, tests={}, time={}min, score={}",
            team.id,
            round3.test_cases_passed,
            round3.time_taken,
            round3.final_score
        );

        Ok(SubmitRound3Response {
            test_cases_passed: round3.test_cases_passed,
            time_taken: round3.time_taken,
            time_bonus: round3_time_bonus(time_taken, cap),
            final_score: round3.final_score,
            total_score: team.total_score,
            awaiting_verification: true,
        })
    }

    pub async fn round3(&self, team_id: &str) -> Result<Round3State, ServiceError> {
        self.teams
            .find_by_id(team_id)
            .await?
            .map(|team| team.round3)
            .ok_or_else(ServiceError::team_not_found)
    }

    /// Confirms or rejects a reported result; `adjusted_score` replaces the
    /// computed score as is.
    pub async fn verify(
        &self,
        team_id: &str,
        req: &VerifyRound3Request,
    ) -> Result<VerifyRound3Response, ServiceError> {
        let (team, _) = update_team(self.teams.as_ref(), team_id, |team| {
            if !team.round3.submitted {
                return Err(ServiceError::precondition(
                    "Team has not submitted Round 3 yet",
                ));
            }
            team.round3.admin_verified = req.verified;
            if let Some(score) = req.adjusted_score {
                team.round3.final_score = score;
            }
            Ok(())
        })
        .await?;

        ROUND3_VERIFICATIONS_TOTAL
            .with_label_values(&[if req.verified { "true" } else { "false" }])
            .inc();
        tracing::info!(
            "Round 3 verification: team={}, verified={}, score={}, adjusted={}",
            team.id,
            req.verified,
            team.round3.final_score,
            req.adjusted_score.is_some()
        );

        Ok(VerifyRound3Response {
            team_name: team.team_name,
            verified: team.round3.admin_verified,
            final_score: team.round3.final_score,
            total_score: team.total_score,
        })
    }
}

/// Range-checks reported minutes against a cap
pub(crate) fn checked_minutes(minutes: i32, cap: u32) -> Result<u32, ServiceError> {
    u32::try_from(minutes)
        .ok()
        .filter(|m| *m <= cap)
        .ok_or_else(|| {
            ServiceError::validation(format!(
                "Time taken must be between 0 and {} minutes",
                cap
            ))
        })
}
