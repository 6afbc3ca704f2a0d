//! Page painting. Pure functions of explicit state over the `Dom` boundary.

pub mod auth;
pub mod theme;
pub mod time_format;

pub use auth::{render_session, update_auth_ui};
