//! Cash-box Models
//!
//! A session is a time-boxed cash-drawer accounting period with an opening
//! and a closing amount. All balance math happens server-side; the client
//! only derives the displayed net.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::category::default_true;
use super::{Identified, NamedRef, Ref, UserRef};
use crate::money;

/// Cash session type (e.g. "Morning counter", "Delivery float")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashSessionType {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Identified for CashSessionType {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Create session type payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashSessionTypeCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Update session type payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashSessionTypeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Session status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CashSessionStatus {
    #[default]
    Open,
    Closed,
}

/// Cash session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashSession {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(with = "crate::util::calendar_date")]
    pub date: NaiveDate,
    #[serde(alias = "type")]
    pub session_type: Ref<NamedRef>,
    #[serde(default)]
    pub session_name: Option<String>,
    pub opening_amount: f64,
    #[serde(default)]
    pub closing_amount: Option<f64>,
    pub status: CashSessionStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub opened_by: Option<Ref<UserRef>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl CashSession {
    /// `closing − opening`, for display. `None` while the session is open.
    pub fn net(&self) -> Option<f64> {
        self.closing_amount
            .map(|closing| money::difference(closing, self.opening_amount))
    }

    /// Name to show: explicit session name, else the populated type name
    pub fn display_name(&self) -> &str {
        self.session_name
            .as_deref()
            .or_else(|| self.session_type.doc().map(|t| t.name.as_str()))
            .unwrap_or_else(|| self.session_type.id())
    }

    pub fn is_open(&self) -> bool {
        self.status == CashSessionStatus::Open
    }
}

impl Identified for CashSession {
    fn id(&self) -> &str {
        &self.id
    }
}

/// `POST /cashbox/sessions` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashSessionOpen {
    pub session_type: String,
    pub date: NaiveDate,
    pub opening_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// `POST /cashbox/sessions/{id}/close` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashSessionClose {
    pub closing_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// `GET /cashbox/sessions` filter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashSessionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CashSessionStatus>,
}
