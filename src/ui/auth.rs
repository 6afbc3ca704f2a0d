//! Session-dependent regions of the page.

use crate::config::RegionClasses;
use crate::platform::{Dom, Selector};
use crate::state::AuthView;

fn set_region<D: Dom + ?Sized>(dom: &mut D, class: &str, visible: bool) {
    let display = if visible { None } else { Some("none") };
    for node in dom.query_all(&Selector::Class(class)) {
        dom.set_display(&node, display);
    }
}

/// Shows exactly one of the authenticated / anonymous region sets.
/// Idempotent: the outcome depends only on `is_authenticated`.
pub fn update_auth_ui<D: Dom + ?Sized>(dom: &mut D, regions: &RegionClasses, is_authenticated: bool) {
    set_region(dom, &regions.authenticated, is_authenticated);
    set_region(dom, &regions.anonymous, !is_authenticated);
}

/// Applies a full session view: region sets, admin affordances, identity.
pub fn render_session<D: Dom + ?Sized>(dom: &mut D, regions: &RegionClasses, view: &AuthView) {
    update_auth_ui(dom, regions, view.authenticated);
    set_region(dom, &regions.admin, view.admin);

    if let Some(label) = dom.by_id(&regions.identity_label_id) {
        dom.set_text(&label, view.identity.as_deref().unwrap_or(""));
    }
}
