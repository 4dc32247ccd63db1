use serde::{Deserialize, Serialize};
use validator::Validate;

use super::catalog::{Component, QuizQuestionView};
use super::team::PurchasedComponent;

#[derive(Debug, Serialize)]
pub struct QuizSet {
    pub count: usize,
    pub questions: Vec<QuizQuestionView>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateAnswerRequest {
    /// Zero-based position in the delivered quiz set
    pub question_index: i64,
    pub selected_answer: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateAnswerResponse {
    pub is_correct: bool,
    /// Only revealed when the selection was wrong
    pub correct_answer: Option<i32>,
    pub earned_amount: i64,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    #[validate(length(min = 1, message = "Team ID is required"))]
    pub team_id: String,
    /// One entry per question; `null` or `-1` means unanswered
    pub answers: Vec<Option<i32>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizResponse {
    pub correct_answers: u32,
    pub total_questions: usize,
    pub earned_amount: i64,
    pub bonus_amount: i64,
    pub total_balance: i64,
}

#[derive(Debug, Serialize)]
pub struct ComponentList {
    pub count: usize,
    pub components: Vec<Component>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    #[validate(length(min = 1, message = "Team ID is required"))]
    pub team_id: String,
    /// Emptiness is checked after the already-purchased check
    pub component_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    pub purchased_components: Vec<PurchasedComponent>,
    pub total_cost: i64,
    pub remaining_balance: i64,
    pub round1_score: i64,
}
