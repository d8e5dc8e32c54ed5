//! Shared types for the Potlam storefront and back-office client
//!
//! Wire models exchanged with the REST backend, auth DTOs, error-body
//! shapes and the money helpers used for display arithmetic.

pub mod client;
pub mod error;
pub mod models;
pub mod money;
pub mod response;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{ApiErrorBody, ErrorCategory};
pub use models::{Identified, Ref};
pub use response::Empty;
