use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Functional role of a component in a schematic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Sensor,
    Signal,
    Controller,
    Communication,
    Cloud,
    Actuator,
    Other,
}

impl ComponentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Sensor => "sensor",
            ComponentType::Signal => "signal",
            ComponentType::Controller => "controller",
            ComponentType::Communication => "communication",
            ComponentType::Cloud => "cloud",
            ComponentType::Actuator => "actuator",
            ComponentType::Other => "other",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentCategory {
    Essential,
    #[default]
    Optional,
}

/// Purchasable component stored in the "components" collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    #[serde(rename = "_id", with = "object_id_or_string")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default)]
    pub description: String,
    pub price: i64,
    #[serde(default)]
    pub specifications: HashMap<String, String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub category: ComponentCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionCategory {
    Iot,
    Electronics,
    Programming,
    Networking,
    #[default]
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Quiz question stored in the "quizquestions" collection.
///
/// `correct_answer` never leaves the server before scoring; the team-facing
/// read path uses [`QuizQuestionView`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    #[serde(rename = "_id", with = "object_id_or_string")]
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: i32,
    #[serde(default = "default_points")]
    pub points: i64,
    #[serde(default)]
    pub category: QuestionCategory,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestionView {
    #[serde(rename = "_id")]
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub points: i64,
    pub category: QuestionCategory,
    pub difficulty: Difficulty,
}

impl From<QuizQuestion> for QuizQuestionView {
    fn from(question: QuizQuestion) -> Self {
        QuizQuestionView {
            id: question.id,
            question: question.question,
            options: question.options,
            points: question.points,
            category: question.category,
            difficulty: question.difficulty,
        }
    }
}

fn default_icon() -> String {
    "📦".to_string()
}

fn default_points() -> i64 {
    100
}

fn default_true() -> bool {
    true
}

/// Catalog documents may be seeded with ObjectId or plain string ids.
pub(crate) mod object_id_or_string {
    use mongodb::bson::Bson;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(id: &str, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(id)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Bson::deserialize(deserializer)? {
            Bson::ObjectId(oid) => Ok(oid.to_hex()),
            Bson::String(value) => Ok(value),
            other => Err(D::Error::custom(format!(
                "unsupported _id type: {:?}",
                other.element_type()
            ))),
        }
    }
}
