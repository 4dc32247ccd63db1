use serde::{Deserialize, Serialize};
use validator::Validate;

use super::team::Sector;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeResponse {
    pub sector: Sector,
    pub challenge_link: String,
    /// Minutes
    pub time_limit: u32,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRound3Request {
    #[validate(length(min = 1, message = "Team ID is required"))]
    pub team_id: String,
    #[validate(range(min = 0, max = 10, message = "Test cases passed must be between 0 and 10"))]
    pub test_cases_passed: i32,
    /// Minutes; the upper bound comes from the event settings
    pub time_taken: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRound3Response {
    pub test_cases_passed: u32,
    pub time_taken: u32,
    pub time_bonus: i64,
    pub final_score: i64,
    pub total_score: i64,
    pub awaiting_verification: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRound3Request {
    pub verified: bool,
    /// Replaces the computed round 3 score verbatim when present
    pub adjusted_score: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRound3Response {
    pub team_name: String,
    pub verified: bool,
    pub final_score: i64,
    pub total_score: i64,
}
