use axum::{
    extract::{Extension, Path, State},
    Json,
};
use std::sync::Arc;

use super::ApiError;
use crate::extractors::AppJson;
use crate::middlewares::auth::JwtClaims;
use crate::models::admin::{
    AdminTeamsResponse, DeleteTeamResponse, EventStats, LeaderboardEntry, Round3OverrideRequest,
    Round3OverrideResponse,
};
use crate::services::{admin_service::AdminService, AppState};

fn service(state: &AppState) -> AdminService {
    AdminService::new(state.teams.clone(), state.config.event.clone())
}

pub async fn list_teams(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AdminTeamsResponse>, ApiError> {
    Ok(Json(service(&state).teams().await?))
}

pub async fn leaderboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    Ok(Json(service(&state).leaderboard().await?))
}

pub async fn event_stats(State(state): State<Arc<AppState>>) -> Result<Json<EventStats>, ApiError> {
    Ok(Json(service(&state).stats().await?))
}

pub async fn override_round3(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<JwtClaims>,
    Path(team_id): Path<String>,
    AppJson(payload): AppJson<Round3OverrideRequest>,
) -> Result<Json<Round3OverrideResponse>, ApiError> {
    tracing::info!("Admin {} overriding round 3 of team {}", claims.sub, team_id);
    Ok(Json(service(&state).override_round3(&team_id, &payload).await?))
}

pub async fn delete_team(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<JwtClaims>,
    Path(team_id): Path<String>,
) -> Result<Json<DeleteTeamResponse>, ApiError> {
    tracing::warn!("Super admin {} deleting team {}", claims.sub, team_id);
    Ok(Json(service(&state).delete_team(&team_id).await?))
}
