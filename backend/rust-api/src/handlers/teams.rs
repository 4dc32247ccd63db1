use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::ApiError;
use crate::extractors::AppJson;
use crate::models::team::{RegisterTeamRequest, RegisterTeamResponse, Team};
use crate::services::{team_service::TeamService, AppState};

fn service(state: &AppState) -> TeamService {
    TeamService::new(
        state.teams.clone(),
        state.config.event.registration_sectors.clone(),
    )
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<RegisterTeamRequest>,
) -> Result<(StatusCode, Json<RegisterTeamResponse>), ApiError> {
    let response = service(&state).register(payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn list_teams(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Team>>, ApiError> {
    let teams = service(&state).list().await?;
    Ok(Json(teams))
}

pub async fn get_team(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<String>,
) -> Result<Json<Team>, ApiError> {
    let team = service(&state).get(&team_id).await?;
    Ok(Json(team))
}

pub async fn get_team_by_name(
    State(state): State<Arc<AppState>>,
    Path(team_name): Path<String>,
) -> Result<Json<Team>, ApiError> {
    let team = service(&state).get_by_name(&team_name).await?;
    Ok(Json(team))
}
