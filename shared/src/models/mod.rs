//! Data models
//!
//! Plain records exchanged with the backend verbatim. Field names are
//! camelCase on the wire, ids are strings and `_id` is accepted as an alias.
//! Each entity has a `*Create` payload and, where the backend supports
//! edits, an `*Update` payload with every field optional.

pub mod cart;
pub mod cash_session;
pub mod category;
pub mod day_plan;
pub mod expense;
pub mod order;
pub mod product;
pub mod recipe;
pub mod settings;
pub mod task;
pub mod user;

// Re-exports
pub use cart::*;
pub use cash_session::*;
pub use category::*;
pub use day_plan::*;
pub use expense::*;
pub use order::*;
pub use product::*;
pub use recipe::*;
pub use settings::*;
pub use task::*;
pub use user::*;

use serde::{Deserialize, Serialize};

/// Entities addressable by a server-assigned id
pub trait Identified {
    fn id(&self) -> &str;
}

/// A reference to another entity
///
/// Depending on the endpoint the backend either sends the bare id or the
/// populated document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ref<T> {
    Id(String),
    Doc(T),
}

impl<T: Identified> Ref<T> {
    /// The referenced id, whichever form was sent
    pub fn id(&self) -> &str {
        match self {
            Ref::Id(id) => id,
            Ref::Doc(doc) => doc.id(),
        }
    }

    /// The populated document, if the backend sent one
    pub fn doc(&self) -> Option<&T> {
        match self {
            Ref::Id(_) => None,
            Ref::Doc(doc) => Some(doc),
        }
    }
}

impl<T> From<String> for Ref<T> {
    fn from(id: String) -> Self {
        Ref::Id(id)
    }
}

/// Minimal populated reference: `{ _id, name }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl Identified for NamedRef {
    fn id(&self) -> &str {
        &self.id
    }
}
