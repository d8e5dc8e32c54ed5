//! Recipe Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::default_true;
use super::Identified;

/// One preparation step; the server expands steps into tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeStep {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Minutes
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Recipe entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_serves")]
    pub serves: u32,
    #[serde(default)]
    pub steps: Vec<RecipeStep>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_serves() -> u32 {
    1
}

impl Recipe {
    /// Sum of step durations in minutes
    pub fn total_duration(&self) -> u32 {
        self.steps.iter().filter_map(|s| s.duration).sum()
    }
}

impl Identified for Recipe {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Create recipe payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub serves: u32,
    pub steps: Vec<RecipeStep>,
}

/// Update recipe payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serves: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<RecipeStep>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
