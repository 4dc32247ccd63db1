use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use super::catalog::ComponentType;
use super::team::Sector;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchematicSlotInput {
    pub component_id: Option<String>,
    pub component_name: Option<String>,
    pub component_type: Option<ComponentType>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitSchematicRequest {
    #[validate(length(min = 1, message = "Team ID is required"))]
    pub team_id: String,
    /// Ordered slots, `null` for an empty slot
    pub schematic: Vec<Option<SchematicSlotInput>>,
    /// Minutes
    pub time_taken: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitSchematicResponse {
    pub message: String,
    pub correct_placements: u32,
    pub filled_slots: u32,
    pub total_slots: usize,
    pub time_taken: u32,
    pub time_bonus: i64,
    pub placement_score: i64,
    pub final_score: i64,
    pub is_all_correct: bool,
    pub can_proceed: bool,
}

/// Scenario framing shown to a team before it arranges its schematic
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorBriefing {
    pub sector: Sector,
    pub title: &'static str,
    pub failure: &'static str,
    pub universe_flaw: &'static str,
    pub icon: &'static str,
    pub components: HashMap<ComponentType, &'static str>,
}

impl SectorBriefing {
    pub fn for_sector(sector: Sector) -> Option<Self> {
        let (title, failure, universe_flaw, icon, sensor, actuator) = match sector {
            Sector::LuminaDistrict => (
                "Smart Street Lighting System",
                "The light-sensing system misreads day as night, causing power surges.",
                "The planet's day-night cycle changes every 4 hours — sensors must adapt dynamically.",
                "💡",
                "Light Sensor",
                "LED Streetlight / Relay Driver",
            ),
            Sector::HydroCore => (
                "Smart Water Distribution",
                "Reservoir valves malfunction due to corrupted pressure data, leading to shortages.",
                "Gravity fluctuates — water flows unpredictably upward or sideways.",
                "💧",
                "Pressure Sensor",
                "Pump/Valve Driver",
            ),
            Sector::AeroHab => return None,
        };

        let components = HashMap::from([
            (ComponentType::Sensor, sensor),
            (ComponentType::Signal, "Signal Conditioning"),
            (ComponentType::Controller, "Controller"),
            (ComponentType::Communication, "Communication Interface"),
            (ComponentType::Cloud, "Cloud/Local Log"),
            (ComponentType::Actuator, actuator),
        ]);

        Some(SectorBriefing {
            sector,
            title,
            failure,
            universe_flaw,
            icon,
            components,
        })
    }
}
