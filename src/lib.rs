//! Front-end layer of the quiz portal.
//!
//! Session cookie handling, token-claim inspection and the remote admin
//! check, protected-link gating, login/registration submission, the
//! light/dark theme toggle and the admin-panel page helpers.
//!
//! Token claims are decoded without signature verification. They only
//! decide what the page shows; the server enforces access on every request.

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod model;
pub mod platform;
pub mod services;
pub mod state;
pub mod ui;

pub use app::{App, CapabilityRequest};
pub use config::{ClientConfig, TokenPropagation};
pub use error::{ClientError, ClientResult, DecodeError};
pub use handlers::ClickOutcome;
pub use platform::{Browser, HeadlessBrowser, KeyPress};
pub use services::{decode_payload, AuthApi, CapabilityResolver, HttpAuthApi, SessionStore};
pub use state::{AuthView, SessionPhase, SessionState, Theme, ThemeState};
