//! Day planner
//!
//! Pick recipes for a date and shift, give each a start time and a serves
//! count, save the selection as a day plan, then ask the backend to expand
//! it into tasks. Expansion happens server-side; this screen only
//! orchestrates the two calls.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use chrono::{NaiveDate, NaiveTime};
use shared::models::{
    DayPlan, DayPlanSave, GeneratedTasks, PlannedRecipeInput, Recipe, Shift,
};
use tokio::sync::RwLock;

use crate::api;
use crate::crud::SubmitGuard;
use crate::error::{ClientError, ClientResult};
use crate::http::{HttpClient, NetworkHttpClient};
use crate::notify::Notifier;
use crate::validation::{MAX_NOTE_LEN, parse_time, validate_optional_text};

/// Start time given to a recipe added during `shift`
pub fn default_start_time(shift: Shift) -> NaiveTime {
    let hour = match shift {
        Shift::Morning => 6,
        Shift::Afternoon => 12,
        Shift::Evening => 17,
        Shift::Night => 21,
    };
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default()
}

/// One selected recipe
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedItem {
    pub recipe_id: String,
    pub recipe_name: String,
    pub start_time: NaiveTime,
    pub serves: u32,
}

#[derive(Debug)]
struct PlannerState {
    date: NaiveDate,
    shift: Shift,
    notes: String,
    catalog: Vec<Recipe>,
    selection: Vec<PlannedItem>,
    plan_id: Option<String>,
}

pub struct DayPlanner<C: HttpClient = NetworkHttpClient> {
    client: Arc<C>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<PlannerState>,
    submitting: AtomicBool,
}

impl<C: HttpClient> DayPlanner<C> {
    pub fn new(client: Arc<C>, notifier: Arc<dyn Notifier>, date: NaiveDate) -> Self {
        Self {
            client,
            notifier,
            state: RwLock::new(PlannerState {
                date,
                shift: Shift::default(),
                notes: String::new(),
                catalog: Vec::new(),
                selection: Vec::new(),
                plan_id: None,
            }),
            submitting: AtomicBool::new(false),
        }
    }

    /// Fetch the recipe catalog; inactive recipes are not offered.
    pub async fn load_recipes(&self) -> ClientResult<Vec<Recipe>> {
        let recipes: Vec<Recipe> = match api::list::<Recipe, C>(&self.client).await {
            Ok(recipes) => recipes.into_iter().filter(|r| r.is_active).collect(),
            Err(e) => {
                if !e.is_unauthorized() {
                    self.notifier.error(&e.user_message("Failed to load recipes"));
                }
                return Err(e);
            }
        };
        tracing::debug!(count = recipes.len(), "Recipe catalog loaded");
        self.state.write().await.catalog = recipes.clone();
        Ok(recipes)
    }

    /// Load a saved plan for further editing
    pub async fn load_plan(&self, id: &str) -> ClientResult<()> {
        let plan = api::day_plans::fetch(&*self.client, id).await?;
        let mut state = self.state.write().await;
        let selection: Vec<PlannedItem> = plan
            .recipes
            .iter()
            .map(|planned| {
                let recipe_id = planned.recipe.id().to_string();
                let recipe_name = planned
                    .recipe
                    .doc()
                    .map(|r| r.name.clone())
                    .or_else(|| {
                        state
                            .catalog
                            .iter()
                            .find(|r| r.id == recipe_id)
                            .map(|r| r.name.clone())
                    })
                    .unwrap_or_default();
                PlannedItem {
                    recipe_id,
                    recipe_name,
                    start_time: planned.start_time,
                    serves: planned.serves,
                }
            })
            .collect();
        state.selection = selection;
        state.date = plan.date;
        state.shift = plan.shift;
        state.notes = plan.notes.unwrap_or_default();
        state.plan_id = Some(plan.id);
        Ok(())
    }

    pub async fn catalog(&self) -> Vec<Recipe> {
        self.state.read().await.catalog.clone()
    }

    pub async fn selection(&self) -> Vec<PlannedItem> {
        self.state.read().await.selection.clone()
    }

    pub async fn plan_id(&self) -> Option<String> {
        self.state.read().await.plan_id.clone()
    }

    pub async fn date(&self) -> NaiveDate {
        self.state.read().await.date
    }

    pub async fn shift(&self) -> Shift {
        self.state.read().await.shift
    }

    /// A different date or shift is a different plan: the saved id is dropped.
    pub async fn set_date(&self, date: NaiveDate) {
        let mut state = self.state.write().await;
        if state.date != date {
            state.date = date;
            state.plan_id = None;
        }
    }

    pub async fn set_shift(&self, shift: Shift) {
        let mut state = self.state.write().await;
        if state.shift != shift {
            state.shift = shift;
            state.plan_id = None;
        }
    }

    pub async fn set_notes(&self, notes: &str) {
        self.state.write().await.notes = notes.to_string();
    }

    /// Add a catalog recipe. Returns `false` when it is already selected.
    pub async fn add_recipe(&self, recipe_id: &str) -> ClientResult<bool> {
        let mut state = self.state.write().await;
        if state.selection.iter().any(|item| item.recipe_id == recipe_id) {
            return Ok(false);
        }
        let recipe = state
            .catalog
            .iter()
            .find(|r| r.id == recipe_id)
            .ok_or_else(|| ClientError::InvalidInput("Unknown recipe".into()))?;
        let item = PlannedItem {
            recipe_id: recipe.id.clone(),
            recipe_name: recipe.name.clone(),
            start_time: default_start_time(state.shift),
            serves: recipe.serves.max(1),
        };
        state.selection.push(item);
        Ok(true)
    }

    pub async fn remove_recipe(&self, recipe_id: &str) -> bool {
        let mut state = self.state.write().await;
        let before = state.selection.len();
        state.selection.retain(|item| item.recipe_id != recipe_id);
        state.selection.len() != before
    }

    /// `HH:MM`
    pub async fn set_start_time(&self, recipe_id: &str, time: &str) -> ClientResult<()> {
        let time = parse_time(time, "Start time")?;
        self.with_item(recipe_id, |item| item.start_time = time).await
    }

    pub async fn set_serves(&self, recipe_id: &str, serves: u32) -> ClientResult<()> {
        if serves == 0 {
            return Err(ClientError::InvalidInput("Serves must be at least 1".into()));
        }
        self.with_item(recipe_id, |item| item.serves = serves).await
    }

    async fn with_item(
        &self,
        recipe_id: &str,
        update: impl FnOnce(&mut PlannedItem),
    ) -> ClientResult<()> {
        let mut state = self.state.write().await;
        let item = state
            .selection
            .iter_mut()
            .find(|item| item.recipe_id == recipe_id)
            .ok_or_else(|| ClientError::InvalidInput("Recipe is not in the plan".into()))?;
        update(item);
        Ok(())
    }

    /// `POST /day-plans`, or `PUT /day-plans/{id}` once saved
    pub async fn save_plan(&self) -> ClientResult<DayPlan> {
        let _guard = SubmitGuard::acquire(&self.submitting)?;
        self.save().await
    }

    /// Save first when the plan has no id yet, then
    /// `POST /day-plans/{id}/generate-tasks`.
    pub async fn generate_tasks(&self) -> ClientResult<GeneratedTasks> {
        let _guard = SubmitGuard::acquire(&self.submitting)?;
        let plan_id = match self.plan_id().await {
            Some(id) => id,
            None => self.save().await?.id,
        };

        match api::day_plans::generate_tasks(&*self.client, &plan_id).await {
            Ok(generated) => {
                tracing::info!(plan_id = %plan_id, tasks = generated.tasks.len(), "Tasks generated");
                let message = generated
                    .message
                    .clone()
                    .unwrap_or_else(|| format!("{} tasks generated", generated.tasks.len()));
                self.notifier.success(&message);
                Ok(generated)
            }
            Err(e) => {
                tracing::warn!(plan_id = %plan_id, error = %e, "Task generation failed");
                if !e.is_unauthorized() {
                    self.notifier.error(&e.user_message("Failed to generate tasks"));
                }
                Err(e)
            }
        }
    }

    async fn save(&self) -> ClientResult<DayPlan> {
        let (body, plan_id) = {
            let state = self.state.read().await;
            if state.selection.is_empty() {
                return Err(ClientError::InvalidInput(
                    "Please add at least one recipe".into(),
                ));
            }
            let body = DayPlanSave {
                date: state.date,
                shift: state.shift,
                recipes: state
                    .selection
                    .iter()
                    .map(|item| PlannedRecipeInput {
                        recipe: item.recipe_id.clone(),
                        start_time: item.start_time,
                        serves: item.serves,
                    })
                    .collect(),
                notes: validate_optional_text(&state.notes, "Notes", MAX_NOTE_LEN)?,
            };
            (body, state.plan_id.clone())
        };

        let result = match &plan_id {
            Some(id) => api::day_plans::update(&*self.client, id, &body).await,
            None => api::day_plans::create(&*self.client, &body).await,
        };
        match result {
            Ok(plan) => {
                tracing::info!(plan_id = %plan.id, date = %plan.date, "Day plan saved");
                self.state.write().await.plan_id = Some(plan.id.clone());
                self.notifier.success("Day plan saved");
                Ok(plan)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Day plan save failed");
                if !e.is_unauthorized() {
                    self.notifier.error(&e.user_message("Failed to save day plan"));
                }
                Err(e)
            }
        }
    }
}
