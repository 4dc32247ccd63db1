use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::config::EventSettings;
use crate::metrics::SCHEMATICS_SUBMITTED_TOTAL;
use crate::models::catalog::ComponentType;
use crate::models::round2::{
    SchematicSlotInput, SectorBriefing, SubmitSchematicRequest, SubmitSchematicResponse,
};
use crate::models::team::{PurchasedComponent, Round2State, SchematicSlot};

use super::errors::ServiceError;
use super::scoring::score_schematic;
use super::store::{update_team, TeamStore};

/// Round 2 "System Genesis": arrange purchased components into the reference flow
pub struct Round2Service {
    teams: Arc<dyn TeamStore>,
    settings: EventSettings,
}

impl Round2Service {
    pub fn new(teams: Arc<dyn TeamStore>, settings: EventSettings) -> Self {
        Self { teams, settings }
    }

    pub fn correct_flow(&self) -> Vec<ComponentType> {
        self.settings.correct_flow.clone()
    }

    pub async fn submit(
        &self,
        req: &SubmitSchematicRequest,
    ) -> Result<SubmitSchematicResponse, ServiceError> {
        req.validate()?;

        let flow = &self.settings.correct_flow;

        let (team, outcome) = update_team(self.teams.as_ref(), &req.team_id, |team| {
            if !team.round1.submitted {
                return Err(ServiceError::precondition(
                    "Team must complete Round 1 first",
                ));
            }
            if req.schematic.len() != flow.len() {
                return Err(ServiceError::validation(format!(
                    "Schematic must have exactly {} slots",
                    flow.len()
                )));
            }

            let slots = build_slots(&req.schematic, &team.round1.purchased_components)?;
            let outcome = score_schematic(&slots, flow, req.time_taken);

            let now = Utc::now();
            team.round2 = Round2State {
                schematic: slots,
                correct_placements: outcome.correct_placements,
                time_taken: req.time_taken,
                submitted: true,
                submitted_at: Some(now),
                final_score: outcome.final_score,
            };
            Ok(outcome)
        })
        .await?;

        SCHEMATICS_SUBMITTED_TOTAL
            .with_label_values(&[if outcome.is_all_correct { "true" } else { "false" }])
            .inc();
        tracing::info!(
            "Schematic submitted: team={}, correct={}/{}, time={}min, score={}",
            team.id,
            outcome.correct_placements,
            flow.len(),
            req.time_taken,
            outcome.final_score
        );

        let message = if outcome.is_all_correct {
            "Perfect! All components are correctly placed!".to_string()
        } else {
            format!(
                "Schematic submitted! {} out of {} placed components are correct.",
                outcome.correct_placements, outcome.filled_slots
            )
        };

        Ok(SubmitSchematicResponse {
            message,
            correct_placements: outcome.correct_placements,
            filled_slots: outcome.filled_slots,
            total_slots: flow.len(),
            time_taken: req.time_taken,
            time_bonus: outcome.time_bonus,
            placement_score: outcome.placement_score,
            final_score: outcome.final_score,
            is_all_correct: outcome.is_all_correct,
            can_proceed: true,
        })
    }

    pub async fn round2(&self, team_id: &str) -> Result<Round2State, ServiceError> {
        self.teams
            .find_by_id(team_id)
            .await?
            .map(|team| team.round2)
            .ok_or_else(ServiceError::team_not_found)
    }

    pub async fn sector_info(&self, team_id: &str) -> Result<SectorBriefing, ServiceError> {
        let team = self
            .teams
            .find_by_id(team_id)
            .await?
            .ok_or_else(ServiceError::team_not_found)?;

        SectorBriefing::for_sector(team.sector).ok_or_else(|| {
            ServiceError::NotFound(format!("No briefing available for sector {}", team.sector))
        })
    }
}

/// Turns submitted slots into stored slots.
///
/// A slot that names a component must reference one the team bought, at most
/// once across the schematic. Missing name or type is filled from the
/// purchase snapshot. Every filled slot consumes one purchased item of its
/// type, so a schematic can never use more of a type than was bought.
fn build_slots(
    schematic: &[Option<SchematicSlotInput>],
    purchased: &[PurchasedComponent],
) -> Result<Vec<SchematicSlot>, ServiceError> {
    let mut seen = HashSet::new();

    let slots = schematic
        .iter()
        .enumerate()
        .map(|(index, slot)| {
            let mut stored = SchematicSlot {
                slot_index: index as u32,
                component_id: None,
                component_name: None,
                component_type: None,
            };
            let Some(input) = slot else {
                return Ok(stored);
            };

            stored.component_name = input.component_name.clone();
            stored.component_type = input.component_type;

            if let Some(id) = &input.component_id {
                if !seen.insert(id.as_str()) {
                    return Err(ServiceError::validation(format!(
                        "Component {} is placed more than once",
                        id
                    )));
                }
                let owned = purchased
                    .iter()
                    .find(|c| &c.component_id == id)
                    .ok_or_else(|| {
                        ServiceError::validation(format!(
                            "Component {} was not purchased by this team",
                            id
                        ))
                    })?;
                if stored.component_type.is_some_and(|t| t != owned.component_type) {
                    return Err(ServiceError::validation(format!(
                        "Component {} is not of type {}",
                        id,
                        stored.component_type.map(|t| t.as_str()).unwrap_or_default()
                    )));
                }
                stored.component_id = Some(id.clone());
                stored.component_type = Some(owned.component_type);
                stored
                    .component_name
                    .get_or_insert_with(|| owned.name.clone());
            }

            Ok(stored)
        })
        .collect::<Result<Vec<_>, ServiceError>>()?;

    let mut remaining: HashMap<ComponentType, usize> = HashMap::new();
    for component in purchased {
        *remaining.entry(component.component_type).or_default() += 1;
    }
    for component_type in slots.iter().filter_map(|slot| slot.component_type) {
        match remaining.get_mut(&component_type) {
            Some(left) if *left > 0 => *left -= 1,
            _ => {
                return Err(ServiceError::validation(format!(
                    "Not enough purchased {} components for this schematic",
                    component_type
                )));
            }
        }
    }

    Ok(slots)
}
