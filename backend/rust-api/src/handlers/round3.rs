use axum::{
    extract::{Extension, Path, State},
    Json,
};
use std::sync::Arc;

use super::ApiError;
use crate::extractors::AppJson;
use crate::middlewares::auth::JwtClaims;
use crate::models::round3::{
    ChallengeResponse, SubmitRound3Request, SubmitRound3Response, VerifyRound3Request,
    VerifyRound3Response,
};
use crate::models::team::Round3State;
use crate::services::{round3_service::Round3Service, AppState};

fn service(state: &AppState) -> Round3Service {
    Round3Service::new(state.teams.clone(), state.config.event.clone())
}

pub async fn get_challenge(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<String>,
) -> Result<Json<ChallengeResponse>, ApiError> {
    Ok(Json(service(&state).challenge(&team_id).await?))
}

pub async fn submit_round3(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<SubmitRound3Request>,
) -> Result<Json<SubmitRound3Response>, ApiError> {
    Ok(Json(service(&state).submit(&payload).await?))
}

pub async fn get_round3(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<String>,
) -> Result<Json<Round3State>, ApiError> {
    Ok(Json(service(&state).round3(&team_id).await?))
}

pub async fn verify_round3(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<JwtClaims>,
    Path(team_id): Path<String>,
    AppJson(payload): AppJson<VerifyRound3Request>,
) -> Result<Json<VerifyRound3Response>, ApiError> {
    tracing::info!("Admin {} reviewing round 3 of team {}", claims.sub, team_id);
    Ok(Json(service(&state).verify(&team_id, &payload).await?))
}
