use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use validator::{Validate, ValidationError};

use super::catalog::ComponentType;

/// Thematic track a team is assigned at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sector {
    #[serde(rename = "Lumina District")]
    LuminaDistrict,
    #[serde(rename = "HydroCore")]
    HydroCore,
    #[serde(rename = "AeroHab")]
    AeroHab,
}

impl Sector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sector::LuminaDistrict => "Lumina District",
            Sector::HydroCore => "HydroCore",
            Sector::AeroHab => "AeroHab",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Member {
    pub name: String,
    pub email: String,
}

/// Team record stored in the "teams" collection.
///
/// `total_score` is derived: it is only ever written by
/// [`Team::refresh_total_score`], which the store helper calls before every
/// persist. `version` backs the optimistic write check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(rename = "_id")]
    pub id: String,
    pub team_name: String,
    pub members: Vec<Member>,
    pub sector: Sector,
    pub registration_date: DateTime<Utc>,
    #[serde(default)]
    pub round1: Round1State,
    #[serde(default)]
    pub round2: Round2State,
    #[serde(default)]
    pub round3: Round3State,
    #[serde(default)]
    pub total_score: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    pub fn new(id: String, team_name: String, members: Vec<Member>, sector: Sector) -> Self {
        let now = Utc::now();
        Team {
            id,
            team_name,
            members,
            sector,
            registration_date: now,
            round1: Round1State::default(),
            round2: Round2State::default(),
            round3: Round3State::default(),
            total_score: 0,
            is_active: true,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn refresh_total_score(&mut self) {
        self.total_score =
            self.round1.final_score + self.round2.final_score + self.round3.final_score;
    }
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Round1State {
    pub quiz_score: u32,
    pub earned_amount: i64,
    pub total_balance: i64,
    /// Empty until the one-time purchase, then exactly the purchase size
    pub purchased_components: Vec<PurchasedComponent>,
    pub submitted: bool,
    pub submitted_at: Option<DateTime<Utc>>,
    pub final_score: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PurchasedComponent {
    pub component_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    pub price: i64,
    pub icon: String,
    pub purchased_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Round2State {
    pub schematic: Vec<SchematicSlot>,
    pub correct_placements: u32,
    /// Minutes
    pub time_taken: u32,
    pub submitted: bool,
    pub submitted_at: Option<DateTime<Utc>>,
    pub final_score: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchematicSlot {
    pub slot_index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_type: Option<ComponentType>,
}

impl SchematicSlot {
    pub fn is_filled(&self) -> bool {
        self.component_type.is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Round3State {
    pub challenge_link: Option<String>,
    pub test_cases_passed: u32,
    /// Minutes
    pub time_taken: u32,
    pub submitted: bool,
    pub submitted_at: Option<DateTime<Utc>>,
    pub final_score: i64,
    pub admin_verified: bool,
}

lazy_static! {
    static ref MEMBER_NAME_RE: Regex = Regex::new(r"^[a-zA-Z\s]+$").unwrap();
}

/// Registration payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTeamRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Team name must be between 3 and 50 characters"
    ))]
    pub team_name: String,

    #[validate(length(min = 1, message = "Team must have at least 1 member"), nested)]
    pub members: Vec<MemberInput>,
}

impl RegisterTeamRequest {
    /// Trims names and lowercases emails before validation
    pub fn normalized(self) -> Self {
        RegisterTeamRequest {
            team_name: self.team_name.trim().to_string(),
            members: self
                .members
                .into_iter()
                .map(|member| MemberInput {
                    name: member.name.trim().to_string(),
                    email: member.email.trim().to_lowercase(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MemberInput {
    #[validate(custom(function = "validate_member_name"))]
    pub name: String,

    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
}

fn validate_member_name(name: &str) -> Result<(), ValidationError> {
    if name.chars().count() < 3 {
        return Err(ValidationError::new("member_name_length").with_message(Cow::Borrowed(
            "Each member name must be at least 3 characters long",
        )));
    }
    if !MEMBER_NAME_RE.is_match(name) {
        return Err(ValidationError::new("member_name_chars").with_message(Cow::Borrowed(
            "Member names can only contain letters and spaces (no numbers)",
        )));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTeamResponse {
    pub team_id: String,
    pub team_name: String,
    pub sector: Sector,
    pub member_count: usize,
}
