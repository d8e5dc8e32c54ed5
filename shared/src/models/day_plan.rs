//! Day Plan Model
//!
//! A day plan is an admin-selected set of recipes with planned start times
//! for one date and shift. The server expands a saved plan into tasks.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Identified, NamedRef, Ref, Task};
use crate::util::hhmm;

/// Working shift
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    #[default]
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl std::str::FromStr for Shift {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "morning" => Ok(Self::Morning),
            "afternoon" => Ok(Self::Afternoon),
            "evening" => Ok(Self::Evening),
            "night" => Ok(Self::Night),
            other => Err(format!("unknown shift: {other}")),
        }
    }
}

/// A recipe scheduled within a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedRecipe {
    pub recipe: Ref<NamedRef>,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    pub serves: u32,
}

/// Day plan entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(with = "crate::util::calendar_date")]
    pub date: NaiveDate,
    pub shift: Shift,
    #[serde(default)]
    pub recipes: Vec<PlannedRecipe>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tasks_generated: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Identified for DayPlan {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Planned recipe as sent by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedRecipeInput {
    /// Recipe id
    pub recipe: String,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    pub serves: u32,
}

/// `POST /day-plans` and `PUT /day-plans/{id}` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlanSave {
    pub date: NaiveDate,
    pub shift: Shift,
    pub recipes: Vec<PlannedRecipeInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Response of `POST /day-plans/{id}/generate-tasks`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedTasks {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}
