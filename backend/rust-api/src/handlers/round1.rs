use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use super::ApiError;
use crate::extractors::AppJson;
use crate::models::round1::{
    ComponentList, PurchaseRequest, PurchaseResponse, QuizSet, SubmitQuizRequest,
    SubmitQuizResponse, ValidateAnswerRequest, ValidateAnswerResponse,
};
use crate::models::team::Round1State;
use crate::services::{round1_service::Round1Service, AppState};

fn service(state: &AppState) -> Round1Service {
    Round1Service::new(
        state.teams.clone(),
        state.catalog.clone(),
        state.config.event.clone(),
    )
}

pub async fn get_quiz(State(state): State<Arc<AppState>>) -> Result<Json<QuizSet>, ApiError> {
    Ok(Json(service(&state).quiz().await?))
}

pub async fn validate_answer(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<ValidateAnswerRequest>,
) -> Result<Json<ValidateAnswerResponse>, ApiError> {
    Ok(Json(service(&state).validate_answer(&payload).await?))
}

pub async fn submit_quiz(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<SubmitQuizRequest>,
) -> Result<Json<SubmitQuizResponse>, ApiError> {
    Ok(Json(service(&state).submit_quiz(&payload).await?))
}

pub async fn get_components(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ComponentList>, ApiError> {
    Ok(Json(service(&state).components().await?))
}

pub async fn purchase_components(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<PurchaseRequest>,
) -> Result<Json<PurchaseResponse>, ApiError> {
    Ok(Json(service(&state).purchase(&payload).await?))
}

pub async fn get_round1(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<String>,
) -> Result<Json<Round1State>, ApiError> {
    Ok(Json(service(&state).round1(&team_id).await?))
}
