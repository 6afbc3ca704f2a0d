pub mod admin;
pub mod auth;
pub mod navigation;
pub mod theme;

use crate::app::App;
use crate::platform::{Browser, KeyPress};
use crate::services::AuthApi;

/// What the host should do with the click that triggered a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Let the default navigation happen.
    Proceed,
    /// Suppress the default action and stay on the page.
    Cancel,
    /// Suppress the default action and go to this URL instead.
    Redirect(String),
}

impl ClickOutcome {
    pub fn suppresses_default(&self) -> bool {
        !matches!(self, ClickOutcome::Proceed)
    }
}

/// Main key handler dispatcher. Returns true when the key was consumed and
/// the browser's default action must be suppressed.
pub fn handle_key_event<B: Browser, A: AuthApi>(key: &KeyPress, app: &mut App<B, A>) -> bool {
    theme::handle_theme_shortcut(key, app)
}
