pub mod app;
pub mod auth;
pub mod config;
pub mod generated;
pub mod telemetry;

pub use auth::{Auth, AuthenticationPort};
pub use crate::config::Settings;
