// src/app.rs

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::handlers::{self, ClickOutcome};
use crate::model::LoginResponse;
use crate::platform::{Browser, KeyPress};
use crate::services::{AuthApi, CapabilityResolver, SessionStore};
use crate::state::{SessionPhase, SessionState, Theme, ThemeState};
use crate::ui;
use std::time::Duration;

/// A capability check the host still has to run for the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityRequest {
    pub token: String,
}

/// One page view: the browser it runs in, the server it talks to, and the
/// state derived from both.
///
/// Browser stores are read in [`App::begin_load`] and written only by the
/// explicit actions (login, logout, theme toggle); everything in between
/// works on `session` and `theme`.
pub struct App<B: Browser, A: AuthApi> {
    pub browser: B,
    pub api: A,
    pub config: ClientConfig,
    pub store: SessionStore,
    pub session: SessionState,
    pub theme: ThemeState,
    pub theme_toggle: Option<B::Node>,
}

impl<B: Browser, A: AuthApi> App<B, A> {
    pub fn new(browser: B, api: A, config: ClientConfig) -> Self {
        let store = SessionStore::new(config.cookie_name.clone());
        let theme = ThemeState::new(None, browser.prefers_dark());
        App {
            browser,
            api,
            config,
            store,
            session: SessionState::default(),
            theme,
            theme_toggle: None,
        }
    }

    /// Synchronous part of page load.
    ///
    /// Reads the session cookie, decodes its claims (failure only hides the
    /// identity), paints the page and wires the admin-panel niceties. Returns
    /// the capability check to run when a token is present; until it
    /// settles the page shows the signed-in regions without admin ones.
    pub fn begin_load(&mut self) -> Option<CapabilityRequest> {
        let token = self.store.get(&self.browser);
        let claims = token.as_deref().and_then(CapabilityResolver::claims);
        self.session.resolve(token.clone(), claims);
        self.render();

        handlers::theme::install_theme_toggle(self);

        let pathname = self.browser.pathname();
        handlers::navigation::highlight_nav_links(&mut self.browser, &pathname);
        let search = self.browser.search();
        handlers::navigation::propagate_admin_token(&mut self.browser, &search, &self.config);
        handlers::admin::format_date_cells(&mut self.browser, &self.config);

        token.map(|token| CapabilityRequest { token })
    }

    /// Applies a finished capability check. Results for a token that is no
    /// longer current are dropped.
    pub fn settle_capability(&mut self, request: &CapabilityRequest, is_admin: bool) {
        if self.session.settle(&request.token, is_admin) {
            self.render();
        }
    }

    /// Full page load for hosts that can simply await the check.
    pub async fn load(&mut self) -> SessionPhase {
        if let Some(request) = self.begin_load() {
            let is_admin =
                CapabilityResolver::check_admin_capability(&self.api, &request.token).await;
            self.settle_capability(&request, is_admin);
        }
        self.session.phase.clone()
    }

    pub fn render(&mut self) {
        let view = self.session.view();
        ui::render_session(&mut self.browser, &self.config.regions, &view);
    }

    /// Performs the navigation part of an outcome.
    pub fn follow(&mut self, outcome: &ClickOutcome) {
        if let ClickOutcome::Redirect(url) = outcome {
            tracing::debug!(url, "navigating");
            self.browser.assign(url);
        }
    }

    // --- Event entry points ---

    pub fn protected_link_click(&mut self, href: &str) -> ClickOutcome {
        let outcome = handlers::navigation::handle_protected_link_click(self, href);
        self.follow(&outcome);
        outcome
    }

    pub fn logout_click(&mut self) -> ClickOutcome {
        let outcome = handlers::navigation::handle_logout_click(self);
        self.follow(&outcome);
        outcome
    }

    pub fn delete_click(&mut self) -> ClickOutcome {
        handlers::admin::handle_delete_click(self)
    }

    pub fn key_down(&mut self, key: &KeyPress) -> bool {
        handlers::handle_key_event(key, self)
    }

    pub fn toggle_theme(&mut self) -> Theme {
        handlers::theme::handle_theme_toggle(self)
    }

    pub fn color_scheme_changed(&mut self, prefers_dark: bool) -> Option<Theme> {
        handlers::theme::handle_color_scheme_change(self, prefers_dark)
    }

    pub fn begin_alert_dismiss(&mut self, alert: &B::Node) -> Duration {
        handlers::admin::begin_alert_dismiss(&mut self.browser, alert)
    }

    pub fn finish_alert_dismiss(&mut self, alert: &B::Node) {
        handlers::admin::finish_alert_dismiss(&mut self.browser, alert)
    }

    pub async fn submit_login(&mut self, username: &str, password: &str) -> bool {
        handlers::auth::handle_login_submit(self, username, password).await
    }

    pub fn finish_login(&mut self, result: ClientResult<LoginResponse>) -> bool {
        handlers::auth::apply_login_result(self, result)
    }

    pub async fn submit_register(&mut self, email: &str, password: &str) -> bool {
        handlers::auth::handle_register_submit(self, email, password).await
    }

    pub fn finish_register(&mut self, result: ClientResult<()>) -> bool {
        handlers::auth::apply_register_result(self, result)
    }
}
