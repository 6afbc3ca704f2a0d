use crate::app::App;
use crate::config::{ClientConfig, TokenPropagation};
use crate::handlers::ClickOutcome;
use crate::platform::{Browser, Dom, Selector};
use crate::services::AuthApi;

const ACTIVE: &str = "active";
const NAV_LINK: &str = "nav-link";
const NAVBAR_NAV: &str = "navbar-nav";

/// Click on a link whose destination needs a session.
///
/// Without a token the visitor goes to the login page. With one, the
/// configured propagation strategy decides whether the link is followed as
/// is or rewritten to carry the token.
pub fn handle_protected_link_click<B: Browser, A: AuthApi>(
    app: &mut App<B, A>,
    href: &str,
) -> ClickOutcome {
    let Some(token) = app.store.get(&app.browser) else {
        tracing::debug!(href, "no session, sending to login");
        return ClickOutcome::Redirect(app.config.login_path.clone());
    };
    match app.config.token_propagation {
        TokenPropagation::Cookie => ClickOutcome::Proceed,
        TokenPropagation::QueryParam => {
            ClickOutcome::Redirect(append_token(href, &app.config.token_query_param, &token))
        }
    }
}

pub fn handle_logout_click<B: Browser, A: AuthApi>(app: &mut App<B, A>) -> ClickOutcome {
    app.store.clear(&mut app.browser);
    app.session.logout();
    app.render();
    tracing::info!("logged out");
    ClickOutcome::Redirect(app.config.home_path.clone())
}

/// Appends `param=<token>` to `href`, keeping any fragment last. Links that
/// already carry the parameter are returned untouched.
pub fn append_token(href: &str, param: &str, token: &str) -> String {
    let (base, fragment) = match href.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (href, None),
    };
    if has_param(base, param) {
        return href.to_string();
    }
    let separator = if base.contains('?') { '&' } else { '?' };
    let mut out = format!("{}{}{}={}", base, separator, param, urlencoding::encode(token));
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

fn has_param(url: &str, param: &str) -> bool {
    url.split_once('?').is_some_and(|(_, query)| {
        query
            .split('&')
            .any(|pair| pair.split('=').next() == Some(param))
    })
}

/// Value of `param` in a `?a=b&c=d` query string, percent-decoded.
pub fn query_value(search: &str, param: &str) -> Option<String> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == param)
        .and_then(|(_, value)| {
            urlencoding::decode(&value.replace('+', " "))
                .ok()
                .map(|v| v.into_owned())
        })
        .filter(|v| !v.is_empty())
}

/// Marks the navbar links that point at the current page (or a parent
/// section of it, except the home link) as active. Tabs and sidebars using
/// `nav-link` outside a `navbar-nav` are left alone.
pub fn highlight_nav_links<D: Dom + ?Sized>(dom: &mut D, pathname: &str) {
    let links: Vec<D::Node> = dom
        .query_all(&Selector::Class(NAVBAR_NAV))
        .iter()
        .flat_map(|nav| dom.query_all_within(nav, &Selector::Class(NAV_LINK)))
        .collect();
    for link in links {
        let Some(href) = dom.attribute(&link, "href") else {
            continue;
        };
        if href == pathname || (href != "/" && pathname.starts_with(&href)) {
            dom.add_class(&link, ACTIVE);
        }
    }
}

/// Carries a token that arrived in the page URL over to every admin link,
/// so admin pages reached by query-parameter keep it while navigating.
pub fn propagate_admin_token<D: Dom + ?Sized>(dom: &mut D, search: &str, config: &ClientConfig) -> usize {
    let Some(token) = query_value(search, &config.token_query_param) else {
        return 0;
    };
    let mut rewritten = 0;
    for link in dom.query_all(&Selector::HrefPrefix(&config.admin_prefix)) {
        let Some(href) = dom.attribute(&link, "href") else {
            continue;
        };
        let updated = append_token(&href, &config.token_query_param, &token);
        if updated != href {
            dom.set_attribute(&link, "href", &updated);
            rewritten += 1;
        }
    }
    tracing::debug!(rewritten, "admin links carry token");
    rewritten
}
