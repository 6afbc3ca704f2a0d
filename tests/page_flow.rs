//! Page-level behaviour against the in-memory browser and a scripted server.

mod support;

use chrono::Duration;
use portal_client::platform::{CookieJar, Dom, KeyValueStorage, NodeId, Selector};
use portal_client::{
    App, ClickOutcome, ClientConfig, HeadlessBrowser, KeyPress, SessionPhase, Theme,
    TokenPropagation,
};
use support::{Call, MockApi, ADMIN_TOKEN, STUDENT_TOKEN};

struct Page {
    user_nav: NodeId,
    guest_nav: NodeId,
    admin_nav: NodeId,
    identity: NodeId,
}

/// A home page with the usual navbar regions.
fn home_page(browser: &mut HeadlessBrowser) -> Page {
    let user_nav = browser.element("li", &["auth-only"]);
    let guest_nav = browser.element("li", &["guest-only"]);
    let admin_nav = browser.element("li", &["admin-only"]);
    let identity = browser.element("span", &[]);
    browser.with_id(identity, "user-email");
    Page {
        user_nav,
        guest_nav,
        admin_nav,
        identity,
    }
}

fn signed_in(token: &str) -> HeadlessBrowser {
    let mut browser = HeadlessBrowser::new();
    browser.write_cookie(&format!("access_token={}; path=/", token));
    browser
}

#[tokio::test]
async fn valid_login_stores_token_and_next_load_checks_admin() {
    let mut app = App::new(
        HeadlessBrowser::new().at("/login"),
        MockApi::accepting("a.b.c"),
        ClientConfig::default(),
    );

    assert!(app.submit_login("student@example.com", "pw").await);
    assert_eq!(app.store.get(&app.browser).as_deref(), Some("a.b.c"));
    assert_eq!(app.browser.last_navigation(), Some("/"));
    assert!(app.browser.alerts.is_empty());

    // cookie lives for one day
    app.browser.advance(Duration::hours(23));
    assert_eq!(app.store.get(&app.browser).as_deref(), Some("a.b.c"));

    app.browser.open("/");
    app.load().await;
    assert_eq!(
        app.api.calls(),
        vec![
            Call::Login("student@example.com".into(), "pw".into()),
            Call::CheckAdmin("a.b.c".into()),
        ]
    );

    app.browser.advance(Duration::hours(1));
    assert_eq!(app.store.get(&app.browser), None);
}

#[tokio::test]
async fn oversized_cookie_lifetime_still_signs_in_for_a_day() {
    let config: ClientConfig =
        serde_json::from_str(r#"{"cookie_days": 9223372036854775807}"#).unwrap();
    let mut app = App::new(
        HeadlessBrowser::new().at("/login"),
        MockApi::accepting("a.b.c"),
        config,
    );

    assert!(app.submit_login("student@example.com", "pw").await);
    assert_eq!(app.store.get(&app.browser).as_deref(), Some("a.b.c"));
    assert_eq!(app.browser.last_navigation(), Some("/"));

    app.browser.advance(Duration::days(1));
    assert_eq!(app.store.get(&app.browser), None);
}

#[tokio::test]
async fn rejected_login_alerts_without_cookie_or_navigation() {
    let mut app = App::new(
        HeadlessBrowser::new().at("/login"),
        MockApi::default(),
        ClientConfig::default(),
    );

    assert!(!app.submit_login("student@example.com", "wrong").await);
    assert_eq!(app.browser.alerts, vec!["Ошибка авторизации".to_string()]);
    assert_eq!(app.browser.cookie_string(), "");
    assert!(app.browser.navigations.is_empty());
}

#[tokio::test]
async fn registration_goes_to_login_or_alerts() {
    let mut app = App::new(HeadlessBrowser::new(), MockApi::default(), ClientConfig::default());
    assert!(app.submit_register("new@example.com", "pw").await);
    assert_eq!(app.browser.last_navigation(), Some("/login"));

    let api = MockApi {
        register_status: Some(400),
        ..MockApi::default()
    };
    let mut app = App::new(HeadlessBrowser::new(), api, ClientConfig::default());
    assert!(!app.submit_register("taken@example.com", "pw").await);
    assert_eq!(app.browser.alerts, vec!["Ошибка регистрации".to_string()]);
    assert!(app.browser.navigations.is_empty());
}

#[tokio::test]
async fn anonymous_visitor_sees_guest_regions_only() {
    let mut browser = HeadlessBrowser::new();
    let page = home_page(&mut browser);
    let mut app = App::new(browser, MockApi::default(), ClientConfig::default());

    assert_eq!(app.load().await, SessionPhase::Anonymous);
    assert!(app.browser.is_hidden(page.user_nav));
    assert!(!app.browser.is_hidden(page.guest_nav));
    assert!(app.browser.is_hidden(page.admin_nav));
    assert!(app.api.calls().is_empty());
}

#[tokio::test]
async fn admin_regions_wait_for_the_capability_check() {
    let mut browser = signed_in(ADMIN_TOKEN);
    let page = home_page(&mut browser);
    let mut app = App::new(browser, MockApi::default(), ClientConfig::default());

    let request = app.begin_load().expect("token present");
    assert_eq!(
        app.session.phase,
        SessionPhase::AuthenticatedPendingCapability
    );
    assert!(!app.browser.is_hidden(page.user_nav));
    assert!(app.browser.is_hidden(page.guest_nav));
    assert!(app.browser.is_hidden(page.admin_nav));
    assert_eq!(app.browser.text(&page.identity), "admin@example.com");

    app.settle_capability(&request, true);
    assert_eq!(app.session.phase, SessionPhase::AuthenticatedAdmin);
    assert!(!app.browser.is_hidden(page.admin_nav));
}

#[tokio::test]
async fn non_admin_token_settles_as_user() {
    let mut browser = signed_in(STUDENT_TOKEN);
    let page = home_page(&mut browser);
    let mut app = App::new(browser, MockApi::default(), ClientConfig::default());

    assert_eq!(app.load().await, SessionPhase::AuthenticatedUser);
    assert!(app.browser.is_hidden(page.admin_nav));
    assert_eq!(app.browser.text(&page.identity), "student@example.com");
}

#[tokio::test]
async fn undecodable_token_still_counts_as_signed_in() {
    let mut browser = signed_in("not-a-jwt");
    let page = home_page(&mut browser);
    let mut app = App::new(browser, MockApi::default(), ClientConfig::default());

    assert_eq!(app.load().await, SessionPhase::AuthenticatedUser);
    assert!(!app.browser.is_hidden(page.user_nav));
    assert_eq!(app.browser.text(&page.identity), "");
    assert_eq!(app.api.calls(), vec![Call::CheckAdmin("not-a-jwt".into())]);
}

#[tokio::test]
async fn capability_result_after_logout_is_ignored() {
    let mut browser = signed_in(ADMIN_TOKEN);
    let page = home_page(&mut browser);
    let mut app = App::new(browser, MockApi::default(), ClientConfig::default());

    let request = app.begin_load().expect("token present");
    app.logout_click();
    app.settle_capability(&request, true);

    assert_eq!(app.session.phase, SessionPhase::Anonymous);
    assert!(app.browser.is_hidden(page.admin_nav));
    assert!(app.browser.is_hidden(page.user_nav));
}

#[test]
fn protected_link_without_session_goes_to_login() {
    let mut app = App::new(HeadlessBrowser::new(), MockApi::default(), ClientConfig::default());
    let outcome = app.protected_link_click("/questions/test/7");
    assert_eq!(outcome, ClickOutcome::Redirect("/login".into()));
    assert!(outcome.suppresses_default());
    assert_eq!(app.browser.last_navigation(), Some("/login"));
}

#[test]
fn protected_link_with_query_param_strategy_carries_token() {
    let mut app = App::new(signed_in("a.b.c"), MockApi::default(), ClientConfig::default());
    let outcome = app.protected_link_click("/questions/test/7");
    assert_eq!(
        outcome,
        ClickOutcome::Redirect("/questions/test/7?token=a.b.c".into())
    );
    assert_eq!(
        app.browser.last_navigation(),
        Some("/questions/test/7?token=a.b.c")
    );
}

#[test]
fn protected_link_with_cookie_strategy_proceeds_untouched() {
    let config = ClientConfig {
        token_propagation: TokenPropagation::Cookie,
        ..ClientConfig::default()
    };
    let mut app = App::new(signed_in("a.b.c"), MockApi::default(), config);
    assert_eq!(app.protected_link_click("/questions/test/7"), ClickOutcome::Proceed);
    assert!(app.browser.navigations.is_empty());
}

#[tokio::test]
async fn logout_clears_cookie_and_goes_home() {
    let mut browser = signed_in(STUDENT_TOKEN).at("/theory");
    let page = home_page(&mut browser);
    let mut app = App::new(browser, MockApi::default(), ClientConfig::default());
    app.load().await;

    assert_eq!(app.logout_click(), ClickOutcome::Redirect("/".into()));
    assert_eq!(app.store.get(&app.browser), None);
    assert_eq!(app.browser.last_navigation(), Some("/"));
    assert!(!app.browser.is_hidden(page.guest_nav));
    assert!(app.browser.is_hidden(page.user_nav));
}

#[tokio::test]
async fn os_dark_without_choice_starts_dark_and_toggle_persists_light() {
    let mut browser = HeadlessBrowser::new().with_os_dark(true);
    let card = browser.element("div", &["card", "bg-light"]);
    let mut app = App::new(browser, MockApi::default(), ClientConfig::default());
    app.load().await;

    let body = app.browser.body_node();
    assert_eq!(app.theme.effective(), Theme::Dark);
    assert!(app.browser.has_class(&body, "dark-mode"));
    assert!(app.browser.has_class(&card, "bg-dark"));

    assert_eq!(app.toggle_theme(), Theme::Light);
    assert_eq!(app.browser.storage_item("theme"), Some("light"));
    assert!(!app.browser.has_class(&body, "dark-mode"));
    assert!(app.browser.has_class(&card, "bg-light"));
    let toggle = app.theme_toggle.expect("toggle installed");
    assert!(app.browser.inner_html(toggle).contains("fa-sun"));
}

#[tokio::test]
async fn reloading_keeps_a_single_theme_toggle() {
    let mut app = App::new(HeadlessBrowser::new(), MockApi::default(), ClientConfig::default());
    app.load().await;
    let first = app.theme_toggle.expect("toggle installed");

    app.toggle_theme();
    app.load().await;
    assert_eq!(app.browser.query_all(&Selector::Class("theme-toggle")), vec![first]);
    assert_eq!(app.theme_toggle, Some(first));
    assert_eq!(app.theme.effective(), Theme::Dark);
    assert!(app.browser.inner_html(first).contains("fa-moon"));
}

#[tokio::test]
async fn stored_choice_beats_os_and_masks_os_changes() {
    let mut browser = HeadlessBrowser::new().with_os_dark(true);
    browser.set_item("theme", "light");
    let mut app = App::new(browser, MockApi::default(), ClientConfig::default());
    app.load().await;

    assert_eq!(app.theme.effective(), Theme::Light);
    assert_eq!(app.color_scheme_changed(false), None);
    assert_eq!(app.color_scheme_changed(true), None);
    assert_eq!(app.theme.effective(), Theme::Light);
}

#[tokio::test]
async fn os_change_is_followed_without_a_choice() {
    let mut app = App::new(HeadlessBrowser::new(), MockApi::default(), ClientConfig::default());
    app.load().await;
    let body = app.browser.body_node();

    assert_eq!(app.color_scheme_changed(true), Some(Theme::Dark));
    assert!(app.browser.has_class(&body, "dark-mode"));
    assert_eq!(app.browser.storage_item("theme"), None);
}

#[tokio::test]
async fn ctrl_or_cmd_d_toggles_theme() {
    let mut app = App::new(HeadlessBrowser::new(), MockApi::default(), ClientConfig::default());
    app.load().await;

    assert!(!app.key_down(&KeyPress::plain("d")));
    assert_eq!(app.theme.effective(), Theme::Light);

    assert!(app.key_down(&KeyPress::ctrl("d")));
    assert_eq!(app.theme.effective(), Theme::Dark);

    assert!(app.key_down(&KeyPress::meta("d")));
    assert_eq!(app.theme.effective(), Theme::Light);
    assert_eq!(app.browser.storage_item("theme"), Some("light"));
}

#[test]
fn delete_needs_confirmation() {
    let mut app = App::new(HeadlessBrowser::new(), MockApi::default(), ClientConfig::default());
    app.browser.queue_confirm(false);
    assert_eq!(app.delete_click(), ClickOutcome::Cancel);
    app.browser.queue_confirm(true);
    assert_eq!(app.delete_click(), ClickOutcome::Proceed);
    assert_eq!(app.browser.confirms.len(), 2);
}

#[tokio::test]
async fn admin_page_load_wires_panel_helpers() {
    let mut browser = HeadlessBrowser::new().at("/admin/questions?token=t%2E1");
    let navbar = browser.element("ul", &["navbar-nav"]);
    let nav_admin = browser.link_in(navbar, "/admin", &["nav-link"]);
    let nav_home = browser.link_in(navbar, "/", &["nav-link"]);
    let users = browser.link("/admin/users", &[]);
    let created = browser.element("td", &["format-date"]);
    browser.with_text(created, "2024-03-15 14:30:00");
    let config = ClientConfig {
        date_locale: "en_US".to_string(),
        date_format: "%-d %B %Y, %H:%M".to_string(),
        ..ClientConfig::default()
    };
    let mut app = App::new(browser, MockApi::default(), config);
    app.load().await;

    assert!(app.browser.has_class(&nav_admin, "active"));
    assert!(!app.browser.has_class(&nav_home, "active"));
    assert_eq!(
        app.browser.attribute(&users, "href").as_deref(),
        Some("/admin/users?token=t.1")
    );
    assert_eq!(app.browser.text(&created), "15 March 2024, 14:30");
}

#[test]
fn dismissed_alert_is_removed_after_fade() {
    let mut browser = HeadlessBrowser::new();
    let alert = browser.element("div", &["alert", "alert-dismissible"]);
    browser.child(alert, "button", &["btn-close"]);
    let mut app = App::new(browser, MockApi::default(), ClientConfig::default());

    let delay = app.begin_alert_dismiss(&alert);
    assert_eq!(delay, std::time::Duration::from_millis(150));
    assert!(app.browser.has_class(&alert, "fade"));
    app.finish_alert_dismiss(&alert);
    assert!(app.browser.is_removed(alert));
}
