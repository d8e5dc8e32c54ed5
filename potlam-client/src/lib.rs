//! Potlam Client - storefront and back-office client for the Potlam API
//!
//! Provides the HTTP client, the auth and cart holders, and the screen
//! controllers (admin CRUD, day planner, cash box, checkout) that drive the
//! REST backend. Holders are constructed once per application root and
//! shared by `Arc`.

pub mod api;
pub mod auth;
pub mod cart;
pub mod cashbox;
pub mod checkout;
pub mod config;
pub mod cookie;
pub mod crud;
pub mod error;
pub mod forms;
pub mod gate;
pub mod http;
pub mod navigation;
pub mod notify;
pub mod planner;
pub mod resource;
pub mod route_guard;
pub mod validation;

pub use auth::{AuthSession, AuthState, RegisterForm};
pub use cart::CartStore;
pub use cashbox::CashBox;
pub use checkout::{Checkout, ShippingForm};
pub use config::{ClientConfig, Environment};
pub use cookie::CookieJar;
pub use crud::{CrudScreen, ListState};
pub use error::{ClientError, ClientResult};
pub use forms::ResourceForm;
pub use gate::{Gate, GateDecision};
pub use http::{HttpClient, NetworkHttpClient};
pub use navigation::{MemoryNavigator, Navigator};
pub use notify::{AutoConfirm, Confirm, Notice, NoticeLevel, NoticeLog, Notifier, TracingNotifier};
pub use planner::DayPlanner;
pub use resource::Resource;
pub use route_guard::{RouteDecision, RouteGuard};

// Re-export shared types for convenience
pub use shared::models;
