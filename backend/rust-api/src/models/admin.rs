use serde::{Deserialize, Serialize};
use validator::Validate;

use super::team::{Round3State, Sector, Team};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Round3OverrideRequest {
    /// Minutes; the upper bound comes from the event settings
    pub time_taken: Option<i32>,
    #[validate(range(min = 0, max = 10, message = "Test cases passed must be between 0 and 10"))]
    pub test_cases_passed: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Round3OverrideResponse {
    pub team_name: String,
    pub round3: Round3State,
    pub total_score: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RoundScores {
    pub round1: i64,
    pub round2: i64,
    pub round3: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub team_id: String,
    pub team_name: String,
    pub sector: Sector,
    pub scores: RoundScores,
    pub verified: bool,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompletionStats {
    pub total: usize,
    pub round1_completed: usize,
    pub round2_completed: usize,
    pub round3_completed: usize,
    pub round3_verified: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorStats {
    pub sector: Sector,
    pub count: usize,
    pub avg_score: f64,
}

/// Computed over teams that completed round 1
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreStats {
    pub avg_round1: f64,
    pub avg_round2: f64,
    pub avg_round3: f64,
    pub avg_total: f64,
    pub max_total: i64,
    pub min_total: i64,
}

#[derive(Debug, Serialize)]
pub struct EventStats {
    pub teams: CompletionStats,
    pub sectors: Vec<SectorStats>,
    /// `None` until at least one team completes round 1
    pub scores: Option<ScoreStats>,
}

#[derive(Debug, Serialize)]
pub struct AdminTeamsResponse {
    pub stats: CompletionStats,
    pub count: usize,
    pub teams: Vec<Team>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTeamResponse {
    pub message: String,
    pub team_id: String,
}
