//! Strongbox API: request validation, secret and CA handlers, and the
//! audited request boundary.

pub mod audit;
pub mod config;
pub mod error;
pub mod password;
pub mod route;
pub mod schema;
pub mod service;
pub mod translator;
pub mod views;

pub use audit::{AuditContext, AuditCorrelator};
pub use config::ServiceConfig;
pub use error::ApiError;
pub use route::{Route, Verb};
pub use service::{CredentialService, InboundRequest};
pub use views::ResponseBody;
