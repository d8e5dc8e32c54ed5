//! Admin resources managed through the generic CRUD screen
//!
//! A [`Resource`] ties an entity to its collection path, its create/update
//! payloads and the form that produces them.

use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::Identified;
use shared::models::{
    CashSessionType, CashSessionTypeUpdate, Category, CategoryUpdate, Expense, ExpenseCategory,
    ExpenseCategoryUpdate, Product, ProductUpdate, Recipe, RecipeUpdate, Task,
};

use crate::forms::{
    CategoryForm, ExpenseCategoryForm, ExpenseForm, ProductForm, RecipeForm, ResourceForm,
    SessionTypeForm, TaskForm,
};

/// Entity with a REST collection and a form
pub trait Resource: DeserializeOwned + Identified + Clone + Send + Sync + 'static {
    type Create: Serialize + Send + Sync;
    type Update: Serialize + Send + Sync;
    type Form: ResourceForm<Self>;

    /// Collection path, e.g. `/categories`
    const PATH: &'static str;

    /// Singular label used in notices, e.g. "category"
    const LABEL: &'static str;

    /// Display name
    fn name(&self) -> &str;

    /// Text the list filter matches against
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name()]
    }

    /// `Some` when the entity can be deactivated instead of deleted
    fn is_active(&self) -> Option<bool> {
        None
    }

    /// Update payload that only flips the active flag
    fn activation_update(_active: bool) -> Option<Self::Update> {
        None
    }

    /// Path of one entity
    fn item_path(id: &str) -> String {
        format!("{}/{}", Self::PATH, id)
    }
}

impl Resource for Category {
    type Create = shared::models::CategoryCreate;
    type Update = CategoryUpdate;
    type Form = CategoryForm;

    const PATH: &'static str = "/categories";
    const LABEL: &'static str = "category";

    fn name(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.slug.as_str()];
        fields.extend(self.description.as_deref());
        fields
    }

    fn is_active(&self) -> Option<bool> {
        Some(self.is_active)
    }

    fn activation_update(active: bool) -> Option<Self::Update> {
        Some(CategoryUpdate {
            is_active: Some(active),
            ..Default::default()
        })
    }
}

impl Resource for Product {
    type Create = shared::models::ProductCreate;
    type Update = ProductUpdate;
    type Form = ProductForm;

    const PATH: &'static str = "/products";
    const LABEL: &'static str = "product";

    fn name(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.description.as_str()];
        fields.extend(self.category_name());
        fields
    }

    fn is_active(&self) -> Option<bool> {
        Some(self.is_active)
    }

    fn activation_update(active: bool) -> Option<Self::Update> {
        Some(ProductUpdate {
            is_active: Some(active),
            ..Default::default()
        })
    }
}

impl Resource for ExpenseCategory {
    type Create = shared::models::ExpenseCategoryCreate;
    type Update = ExpenseCategoryUpdate;
    type Form = ExpenseCategoryForm;

    const PATH: &'static str = "/expense-categories";
    const LABEL: &'static str = "expense category";

    fn name(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.description.as_deref());
        fields
    }

    fn is_active(&self) -> Option<bool> {
        Some(self.is_active)
    }

    fn activation_update(active: bool) -> Option<Self::Update> {
        Some(ExpenseCategoryUpdate {
            is_active: Some(active),
            ..Default::default()
        })
    }
}

impl Resource for CashSessionType {
    type Create = shared::models::CashSessionTypeCreate;
    type Update = CashSessionTypeUpdate;
    type Form = SessionTypeForm;

    const PATH: &'static str = "/cashbox/session-types";
    const LABEL: &'static str = "session type";

    fn name(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.description.as_deref());
        fields
    }

    fn is_active(&self) -> Option<bool> {
        Some(self.is_active)
    }

    fn activation_update(active: bool) -> Option<Self::Update> {
        Some(CashSessionTypeUpdate {
            is_active: Some(active),
            ..Default::default()
        })
    }
}

impl Resource for Expense {
    type Create = shared::models::ExpenseCreate;
    type Update = shared::models::ExpenseUpdate;
    type Form = ExpenseForm;

    const PATH: &'static str = "/expenses";
    const LABEL: &'static str = "expense";

    fn name(&self) -> &str {
        &self.description
    }
}

impl Resource for Task {
    type Create = shared::models::TaskCreate;
    type Update = shared::models::TaskUpdate;
    type Form = TaskForm;

    const PATH: &'static str = "/tasks";
    const LABEL: &'static str = "task";

    fn name(&self) -> &str {
        &self.title
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        fields.extend(self.description.as_deref());
        fields.extend(self.location.as_deref());
        fields
    }
}

impl Resource for Recipe {
    type Create = shared::models::RecipeCreate;
    type Update = RecipeUpdate;
    type Form = RecipeForm;

    const PATH: &'static str = "/recipes";
    const LABEL: &'static str = "recipe";

    fn name(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.description.as_deref());
        fields
    }

    fn is_active(&self) -> Option<bool> {
        Some(self.is_active)
    }

    fn activation_update(active: bool) -> Option<Self::Update> {
        Some(RecipeUpdate {
            is_active: Some(active),
            ..Default::default()
        })
    }
}
