//! Form state for admin resources
//!
//! Forms hold exactly what the user typed. Conversion to a create/update
//! payload runs client-side validation; nothing is sent when it fails.

use chrono::NaiveTime;
use shared::models::{
    CashSessionType, CashSessionTypeCreate, CashSessionTypeUpdate, Category, CategoryCreate,
    CategoryUpdate, Expense, ExpenseCategory, ExpenseCategoryCreate, ExpenseCategoryUpdate,
    ExpenseCreate, ExpenseUpdate, PaymentType, Product, ProductCreate, ProductUpdate, Recipe,
    RecipeCreate, RecipeStep, RecipeUpdate, Task, TaskCreate, TaskPriority, TaskStatus,
    TaskUpdate,
};

use crate::error::ClientResult;
use crate::resource::Resource;
use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, parse_amount, parse_count, parse_date, parse_optional_count,
    validate_optional_text, validate_required_text,
};

/// Conversion between an entity, its editable form and its payloads
pub trait ResourceForm<R: Resource>: Default + Clone + Send + Sync {
    /// Populate from a fetched entity (edit mode)
    fn from_entity(entity: &R) -> Self;

    fn to_create(&self) -> ClientResult<R::Create>;

    fn to_update(&self) -> ClientResult<R::Update>;
}

// ============================================================================
// Name + description forms
// ============================================================================

macro_rules! named_form {
    ($form:ident, $entity:ty, $create:ident, $update:ident) => {
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $form {
            pub name: String,
            pub description: String,
        }

        impl ResourceForm<$entity> for $form {
            fn from_entity(entity: &$entity) -> Self {
                Self {
                    name: entity.name.clone(),
                    description: entity.description.clone().unwrap_or_default(),
                }
            }

            fn to_create(&self) -> ClientResult<$create> {
                Ok($create {
                    name: validate_required_text(&self.name, "Name", MAX_NAME_LEN)?,
                    description: validate_optional_text(
                        &self.description,
                        "Description",
                        MAX_NOTE_LEN,
                    )?,
                })
            }

            fn to_update(&self) -> ClientResult<$update> {
                let description =
                    validate_optional_text(&self.description, "Description", MAX_NOTE_LEN)?;
                Ok($update {
                    name: Some(validate_required_text(&self.name, "Name", MAX_NAME_LEN)?),
                    description: Some(description.unwrap_or_default()),
                    is_active: None,
                })
            }
        }
    };
}

named_form!(CategoryForm, Category, CategoryCreate, CategoryUpdate);
named_form!(
    ExpenseCategoryForm,
    ExpenseCategory,
    ExpenseCategoryCreate,
    ExpenseCategoryUpdate
);
named_form!(
    SessionTypeForm,
    CashSessionType,
    CashSessionTypeCreate,
    CashSessionTypeUpdate
);

// ============================================================================
// Product
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    /// Category id
    pub category: String,
    pub image_url: String,
    pub stock: String,
}

impl ProductForm {
    fn validated(&self) -> ClientResult<ProductCreate> {
        let category = self.category.trim();
        if category.is_empty() {
            return Err(crate::ClientError::InvalidInput(
                "Please select a category".into(),
            ));
        }
        Ok(ProductCreate {
            name: validate_required_text(&self.name, "Name", MAX_NAME_LEN)?,
            description: self.description.trim().to_string(),
            price: parse_amount(&self.price, "Price")?,
            category: category.to_string(),
            image_url: validate_optional_text(&self.image_url, "Image URL", 2048)?,
            stock: parse_count(&self.stock, "Stock")?,
        })
    }
}

impl ResourceForm<Product> for ProductForm {
    fn from_entity(entity: &Product) -> Self {
        Self {
            name: entity.name.clone(),
            description: entity.description.clone(),
            price: entity.price.to_string(),
            category: entity.category.id().to_string(),
            image_url: entity.image_url.clone().unwrap_or_default(),
            stock: entity.stock.to_string(),
        }
    }

    fn to_create(&self) -> ClientResult<ProductCreate> {
        self.validated()
    }

    fn to_update(&self) -> ClientResult<ProductUpdate> {
        let p = self.validated()?;
        Ok(ProductUpdate {
            name: Some(p.name),
            description: Some(p.description),
            price: Some(p.price),
            category: Some(p.category),
            // Blank clears the stored image
            image_url: Some(p.image_url.unwrap_or_default()),
            stock: Some(p.stock),
            is_active: None,
        })
    }
}

// ============================================================================
// Expense
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseForm {
    pub amount: String,
    pub payment_type: PaymentType,
    /// User id
    pub paid_by: String,
    /// Expense category id
    pub category: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub description: String,
}

impl ExpenseForm {
    fn validated(&self) -> ClientResult<ExpenseCreate> {
        Ok(ExpenseCreate {
            amount: parse_amount(&self.amount, "Amount")?,
            payment_type: self.payment_type,
            paid_by: validate_required_text(&self.paid_by, "Paid by", MAX_NAME_LEN)?,
            category: validate_required_text(&self.category, "Category", MAX_NAME_LEN)?,
            date: parse_date(&self.date, "Date")?,
            description: validate_required_text(&self.description, "Description", MAX_NOTE_LEN)?,
        })
    }
}

impl ResourceForm<Expense> for ExpenseForm {
    fn from_entity(entity: &Expense) -> Self {
        Self {
            amount: entity.amount.to_string(),
            payment_type: entity.payment_type,
            paid_by: entity.paid_by.id().to_string(),
            category: entity.category.id().to_string(),
            date: entity.date.format("%Y-%m-%d").to_string(),
            description: entity.description.clone(),
        }
    }

    fn to_create(&self) -> ClientResult<ExpenseCreate> {
        self.validated()
    }

    fn to_update(&self) -> ClientResult<ExpenseUpdate> {
        let e = self.validated()?;
        Ok(ExpenseUpdate {
            amount: Some(e.amount),
            payment_type: Some(e.payment_type),
            paid_by: Some(e.paid_by),
            category: Some(e.category),
            date: Some(e.date),
            description: Some(e.description),
        })
    }
}

// ============================================================================
// Task
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    /// User id, blank for unassigned
    pub assigned_to: String,
    /// `YYYY-MM-DD`, blank for none
    pub due_date: String,
    /// Minutes
    pub estimated_duration: String,
    pub priority: TaskPriority,
    /// Only sent on update
    pub status: TaskStatus,
    pub location: String,
}

impl ResourceForm<Task> for TaskForm {
    fn from_entity(entity: &Task) -> Self {
        Self {
            title: entity.title.clone(),
            description: entity.description.clone().unwrap_or_default(),
            assigned_to: entity
                .assigned_to
                .as_ref()
                .map(|r| r.id().to_string())
                .unwrap_or_default(),
            due_date: entity
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            estimated_duration: entity
                .estimated_duration
                .map(|d| d.to_string())
                .unwrap_or_default(),
            priority: entity.priority,
            status: entity.status,
            location: entity.location.clone().unwrap_or_default(),
        }
    }

    fn to_create(&self) -> ClientResult<TaskCreate> {
        let due_date = if self.due_date.trim().is_empty() {
            None
        } else {
            Some(
                parse_date(&self.due_date, "Due date")?
                    .and_time(NaiveTime::default())
                    .and_utc(),
            )
        };
        Ok(TaskCreate {
            title: validate_required_text(&self.title, "Title", MAX_NAME_LEN)?,
            description: validate_optional_text(&self.description, "Description", MAX_NOTE_LEN)?,
            assigned_to: validate_optional_text(&self.assigned_to, "Assignee", MAX_NAME_LEN)?,
            due_date,
            estimated_duration: parse_optional_count(
                &self.estimated_duration,
                "Estimated duration",
            )?,
            priority: self.priority,
            location: validate_optional_text(&self.location, "Location", MAX_NAME_LEN)?,
        })
    }

    fn to_update(&self) -> ClientResult<TaskUpdate> {
        let t = self.to_create()?;
        Ok(TaskUpdate {
            title: Some(t.title),
            description: Some(t.description.unwrap_or_default()),
            assigned_to: Some(t.assigned_to),
            due_date: Some(t.due_date),
            estimated_duration: Some(t.estimated_duration),
            priority: Some(t.priority),
            status: Some(self.status),
            location: Some(t.location.unwrap_or_default()),
        })
    }
}

// ============================================================================
// Recipe
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeStepForm {
    pub title: String,
    pub description: String,
    /// Minutes
    pub duration: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeForm {
    pub name: String,
    pub description: String,
    pub serves: String,
    pub steps: Vec<RecipeStepForm>,
}

impl RecipeForm {
    fn validated_steps(&self) -> ClientResult<Vec<RecipeStep>> {
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| -> ClientResult<RecipeStep> {
                let n = i + 1;
                Ok(RecipeStep {
                    title: validate_required_text(
                        &step.title,
                        &format!("Step {n} title"),
                        MAX_NAME_LEN,
                    )?,
                    description: validate_optional_text(
                        &step.description,
                        &format!("Step {n} description"),
                        MAX_NOTE_LEN,
                    )?,
                    duration: parse_optional_count(&step.duration, &format!("Step {n} duration"))?,
                    location: validate_optional_text(
                        &step.location,
                        &format!("Step {n} location"),
                        MAX_NAME_LEN,
                    )?,
                })
            })
            .collect()
    }
}

impl ResourceForm<Recipe> for RecipeForm {
    fn from_entity(entity: &Recipe) -> Self {
        Self {
            name: entity.name.clone(),
            description: entity.description.clone().unwrap_or_default(),
            serves: entity.serves.to_string(),
            steps: entity
                .steps
                .iter()
                .map(|s| RecipeStepForm {
                    title: s.title.clone(),
                    description: s.description.clone().unwrap_or_default(),
                    duration: s.duration.map(|d| d.to_string()).unwrap_or_default(),
                    location: s.location.clone().unwrap_or_default(),
                })
                .collect(),
        }
    }

    fn to_create(&self) -> ClientResult<RecipeCreate> {
        Ok(RecipeCreate {
            name: validate_required_text(&self.name, "Name", MAX_NAME_LEN)?,
            description: validate_optional_text(&self.description, "Description", MAX_NOTE_LEN)?,
            serves: parse_count(&self.serves, "Serves")?,
            steps: self.validated_steps()?,
        })
    }

    fn to_update(&self) -> ClientResult<RecipeUpdate> {
        let r = self.to_create()?;
        Ok(RecipeUpdate {
            name: Some(r.name),
            description: Some(r.description.unwrap_or_default()),
            serves: Some(r.serves),
            steps: Some(r.steps),
            is_active: None,
        })
    }
}
