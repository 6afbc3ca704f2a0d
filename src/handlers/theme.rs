use crate::app::App;
use crate::platform::{Browser, KeyPress, Selector};
use crate::services::AuthApi;
use crate::state::{Theme, ThemeState};
use crate::ui::theme::{install_toggle, paint, TOGGLE_CLASS};

/// Reads the stored choice and the OS preference, adds the toggle button
/// unless the page already has one, and paints the page.
pub fn install_theme_toggle<B: Browser, A: AuthApi>(app: &mut App<B, A>) -> Theme {
    let stored = app.browser.get_item(&app.config.theme_storage_key);
    app.theme = ThemeState::new(stored.as_deref(), app.browser.prefers_dark());
    let theme = app.theme.effective();
    let existing = app
        .browser
        .query_all(&Selector::Class(TOGGLE_CLASS))
        .into_iter()
        .next();
    app.theme_toggle = existing.or_else(|| install_toggle(&mut app.browser, theme));
    paint(&mut app.browser, theme, app.theme_toggle.as_ref());
    tracing::debug!(%theme, explicit = app.theme.explicit.is_some(), "theme applied");
    theme
}

pub fn handle_theme_toggle<B: Browser, A: AuthApi>(app: &mut App<B, A>) -> Theme {
    let theme = app.theme.toggle();
    app.browser
        .set_item(&app.config.theme_storage_key, theme.as_str());
    paint(&mut app.browser, theme, app.theme_toggle.as_ref());
    tracing::debug!(%theme, "theme toggled");
    theme
}

/// OS light/dark switch. Only followed while the visitor has not picked a
/// theme; the stored choice is re-read since another tab may have set it.
pub fn handle_color_scheme_change<B: Browser, A: AuthApi>(
    app: &mut App<B, A>,
    prefers_dark: bool,
) -> Option<Theme> {
    let stored = app.browser.get_item(&app.config.theme_storage_key);
    app.theme.explicit = stored.as_deref().and_then(|s| s.parse().ok());
    let theme = app.theme.os_changed(prefers_dark)?;
    paint(&mut app.browser, theme, app.theme_toggle.as_ref());
    tracing::debug!(%theme, "following OS colour scheme");
    Some(theme)
}

/// Ctrl+D (Cmd+D on macOS) toggles the theme. Returns true when consumed.
pub fn handle_theme_shortcut<B: Browser, A: AuthApi>(key: &KeyPress, app: &mut App<B, A>) -> bool {
    if (key.ctrl || key.meta) && key.key == "d" {
        handle_theme_toggle(app);
        return true;
    }
    false
}
