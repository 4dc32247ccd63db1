use std::sync::Arc;

use validator::Validate;

use crate::config::EventSettings;
use crate::metrics::ROUND3_OVERRIDES_TOTAL;
use crate::models::admin::{
    AdminTeamsResponse, CompletionStats, DeleteTeamResponse, EventStats, LeaderboardEntry,
    Round3OverrideRequest, Round3OverrideResponse, RoundScores, ScoreStats, SectorStats,
};
use crate::models::team::{Sector, Team};

use super::errors::ServiceError;
use super::round3_service::checked_minutes;
use super::scoring::round3_final_score;
use super::store::{update_team, TeamStore};
use super::team_service::sort_by_total_desc;

/// Cross-team views and manual corrections
pub struct AdminService {
    teams: Arc<dyn TeamStore>,
    settings: EventSettings,
}

impl AdminService {
    pub fn new(teams: Arc<dyn TeamStore>, settings: EventSettings) -> Self {
        Self { teams, settings }
    }

    pub async fn teams(&self) -> Result<AdminTeamsResponse, ServiceError> {
        let mut teams = self.teams.list().await?;
        sort_by_total_desc(&mut teams);

        Ok(AdminTeamsResponse {
            stats: completion_stats(&teams),
            count: teams.len(),
            teams,
        })
    }

    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ServiceError> {
        let teams = self.teams.list().await?;
        Ok(leaderboard(teams))
    }

    pub async fn stats(&self) -> Result<EventStats, ServiceError> {
        let teams = self.teams.list().await?;

        Ok(EventStats {
            teams: completion_stats(&teams),
            sectors: sector_stats(&teams),
            scores: score_stats(&teams),
        })
    }

    /// Sets round 3 time and/or test count directly, rescoring with the
    /// override cap and marking the result verified.
    pub async fn override_round3(
        &self,
        team_id: &str,
        req: &Round3OverrideRequest,
    ) -> Result<Round3OverrideResponse, ServiceError> {
        req.validate()?;

        let cap = self.settings.round3_override_time_cap;
        let time_taken = req
            .time_taken
            .map(|minutes| checked_minutes(minutes, cap))
            .transpose()?;
        let test_cases_passed = req.test_cases_passed.map(|passed| passed as u32);

        let (team, _) = update_team(self.teams.as_ref(), team_id, |team| {
            let round3 = &mut team.round3;
            if let Some(minutes) = time_taken {
                round3.time_taken = minutes;
            }
            if let Some(passed) = test_cases_passed {
                round3.test_cases_passed = passed;
            }
            round3.final_score = round3_final_score(round3.test_cases_passed, round3.time_taken, cap);
            round3.admin_verified = true;
            Ok(())
        })
        .await?;

        ROUND3_OVERRIDES_TOTAL.inc();
        tracing::info!(
            "Round 3 overridden: team={}, tests={}, time={}min, score={}",
            team.id,
            team.round3.test_cases_passed,
            team.round3.time_taken,
            team.round3.final_score
        );

        Ok(Round3OverrideResponse {
            team_name: team.team_name,
            round3: team.round3,
            total_score: team.total_score,
        })
    }

    pub async fn delete_team(&self, team_id: &str) -> Result<DeleteTeamResponse, ServiceError> {
        if !self.teams.delete(team_id).await? {
            return Err(ServiceError::team_not_found());
        }

        tracing::warn!("Team deleted: {}", team_id);

        Ok(DeleteTeamResponse {
            message: "Team deleted successfully".to_string(),
            team_id: team_id.to_string(),
        })
    }
}

/// Ranks teams that finished round 1; equal totals keep store order
pub fn leaderboard(teams: Vec<Team>) -> Vec<LeaderboardEntry> {
    let mut ranked: Vec<Team> = teams.into_iter().filter(|t| t.round1.submitted).collect();
    sort_by_total_desc(&mut ranked);

    ranked
        .into_iter()
        .enumerate()
        .map(|(index, team)| LeaderboardEntry {
            rank: index + 1,
            scores: RoundScores {
                round1: team.round1.final_score,
                round2: team.round2.final_score,
                round3: team.round3.final_score,
                total: team.total_score,
            },
            verified: team.round3.admin_verified,
            team_id: team.id,
            team_name: team.team_name,
            sector: team.sector,
        })
        .collect()
}

pub fn completion_stats(teams: &[Team]) -> CompletionStats {
    CompletionStats {
        total: teams.len(),
        round1_completed: teams.iter().filter(|t| t.round1.submitted).count(),
        round2_completed: teams.iter().filter(|t| t.round2.submitted).count(),
        round3_completed: teams.iter().filter(|t| t.round3.submitted).count(),
        round3_verified: teams.iter().filter(|t| t.round3.admin_verified).count(),
    }
}

/// Sectors in order of first appearance
pub fn sector_stats(teams: &[Team]) -> Vec<SectorStats> {
    let mut groups: Vec<(Sector, usize, i64)> = Vec::new();
    for team in teams {
        match groups.iter_mut().find(|(sector, _, _)| *sector == team.sector) {
            Some((_, count, sum)) => {
                *count += 1;
                *sum += team.total_score;
            }
            None => groups.push((team.sector, 1, team.total_score)),
        }
    }

    groups
        .into_iter()
        .map(|(sector, count, sum)| SectorStats {
            sector,
            count,
            avg_score: sum as f64 / count as f64,
        })
        .collect()
}

pub fn score_stats(teams: &[Team]) -> Option<ScoreStats> {
    let finished: Vec<&Team> = teams.iter().filter(|t| t.round1.submitted).collect();
    if finished.is_empty() {
        return None;
    }

    let n = finished.len() as f64;
    let avg = |score: fn(&Team) -> i64| finished.iter().map(|&t| score(t)).sum::<i64>() as f64 / n;

    Some(ScoreStats {
        avg_round1: avg(|t| t.round1.final_score),
        avg_round2: avg(|t| t.round2.final_score),
        avg_round3: avg(|t| t.round3.final_score),
        avg_total: avg(|t| t.total_score),
        max_total: finished.iter().map(|t| t.total_score).max().unwrap_or_default(),
        min_total: finished.iter().map(|t| t.total_score).min().unwrap_or_default(),
    })
}
