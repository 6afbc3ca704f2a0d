//! Light/dark repaint of the page.

use crate::platform::{Dom, Selector};
use crate::state::Theme;

pub const TOGGLE_CLASS: &str = "theme-toggle";
pub const TOGGLE_LABEL: &str = "Переключить тему";
const DARK_BODY: &str = "dark-mode";
const BG_LIGHT: &str = "bg-light";
const BG_DARK: &str = "bg-dark";
// keeps its dark background in both themes
const NAVBAR: &str = "navbar";

pub fn icon_html(theme: Theme) -> &'static str {
    match theme {
        Theme::Dark => r#"<i class="fas fa-moon"></i>"#,
        Theme::Light => r#"<i class="fas fa-sun"></i>"#,
    }
}

/// Adds the toggle button to the page, showing the icon for `theme`.
pub fn install_toggle<D: Dom + ?Sized>(dom: &mut D, theme: Theme) -> Option<D::Node> {
    dom.append_button(TOGGLE_CLASS, TOGGLE_LABEL, icon_html(theme))
}

/// Repaints the body and every element carrying the light/dark background
/// class pair to match `theme`.
pub fn paint<D: Dom + ?Sized>(dom: &mut D, theme: Theme, toggle: Option<&D::Node>) {
    if let Some(body) = dom.body() {
        match theme {
            Theme::Dark => dom.add_class(&body, DARK_BODY),
            Theme::Light => dom.remove_class(&body, DARK_BODY),
        }
    }

    match theme {
        Theme::Dark => {
            for node in dom.query_all(&Selector::Class(BG_LIGHT)) {
                dom.swap_class(&node, BG_LIGHT, BG_DARK);
            }
        }
        Theme::Light => {
            for node in dom.query_all(&Selector::Class(BG_DARK)) {
                if !dom.has_class(&node, NAVBAR) {
                    dom.swap_class(&node, BG_DARK, BG_LIGHT);
                }
            }
        }
    }

    if let Some(toggle) = toggle {
        dom.set_inner_html(toggle, icon_html(theme));
    }
}
