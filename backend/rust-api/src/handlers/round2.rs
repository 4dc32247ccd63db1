use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use super::ApiError;
use crate::extractors::AppJson;
use crate::models::catalog::ComponentType;
use crate::models::round2::{SectorBriefing, SubmitSchematicRequest, SubmitSchematicResponse};
use crate::models::team::Round2State;
use crate::services::{round2_service::Round2Service, AppState};

fn service(state: &AppState) -> Round2Service {
    Round2Service::new(state.teams.clone(), state.config.event.clone())
}

pub async fn submit_schematic(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<SubmitSchematicRequest>,
) -> Result<Json<SubmitSchematicResponse>, ApiError> {
    Ok(Json(service(&state).submit(&payload).await?))
}

pub async fn get_round2(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<String>,
) -> Result<Json<Round2State>, ApiError> {
    Ok(Json(service(&state).round2(&team_id).await?))
}

pub async fn get_correct_flow(State(state): State<Arc<AppState>>) -> Json<Vec<ComponentType>> {
    Json(service(&state).correct_flow())
}

pub async fn get_sector_info(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<String>,
) -> Result<Json<SectorBriefing>, ApiError> {
    Ok(Json(service(&state).sector_info(&team_id).await?))
}
