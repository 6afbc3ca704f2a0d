//! Admin panel niceties.

use crate::app::App;
use crate::config::ClientConfig;
use crate::handlers::ClickOutcome;
use crate::platform::{Browser, Dom, Selector};
use crate::services::AuthApi;
use crate::ui::time_format::reformat_cell;
use std::time::Duration;

const DISMISSIBLE: &str = "alert-dismissible";
const CLOSE_BUTTON: &str = "btn-close";
const FADE: &str = "fade";
const DATE_CELL: &str = "format-date";
pub const DELETE_BUTTON: &str = "delete-confirm";

/// Time between starting the fade and removing the alert.
pub const ALERT_FADE: Duration = Duration::from_millis(150);

/// Each dismissible alert paired with its close button. Alerts without one
/// are skipped.
pub fn dismissible_alerts<D: Dom + ?Sized>(dom: &D) -> Vec<(D::Node, D::Node)> {
    dom.query_all(&Selector::Class(DISMISSIBLE))
        .into_iter()
        .filter_map(|alert| {
            dom.query_within(&alert, &Selector::Class(CLOSE_BUTTON))
                .map(|close| (alert, close))
        })
        .collect()
}

/// Starts fading `alert` out; the host calls [`finish_alert_dismiss`] after
/// the returned delay.
pub fn begin_alert_dismiss<D: Dom + ?Sized>(dom: &mut D, alert: &D::Node) -> Duration {
    dom.add_class(alert, FADE);
    ALERT_FADE
}

pub fn finish_alert_dismiss<D: Dom + ?Sized>(dom: &mut D, alert: &D::Node) {
    dom.remove(alert);
}

/// Rewrites every date cell into the configured long format. Cells that
/// do not hold a timestamp are logged and left alone. Returns how many
/// cells changed.
pub fn format_date_cells<D: Dom + ?Sized>(dom: &mut D, config: &ClientConfig) -> usize {
    let mut formatted = 0;
    for cell in dom.query_all(&Selector::Class(DATE_CELL)) {
        let original = dom.text(&cell);
        let original = original.trim();
        if original.is_empty() {
            continue;
        }
        match reformat_cell(original, &config.date_locale, &config.date_format) {
            Some(text) => {
                dom.set_text(&cell, &text);
                formatted += 1;
            }
            None => tracing::warn!(cell = original, "date cell not reformatted"),
        }
    }
    formatted
}

/// Click on a delete control: cancelled unless the user confirms.
pub fn handle_delete_click<B: Browser, A: AuthApi>(app: &mut App<B, A>) -> ClickOutcome {
    let message = app.config.messages.confirm_delete.clone();
    if app.browser.confirm(&message) {
        ClickOutcome::Proceed
    } else {
        tracing::debug!("delete cancelled");
        ClickOutcome::Cancel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HeadlessBrowser;

    #[test]
    fn alert_fades_then_goes() {
        let mut browser = HeadlessBrowser::new();
        let alert = browser.element("div", &["alert", DISMISSIBLE]);
        let close = browser.child(alert, "button", &[CLOSE_BUTTON]);
        let plain = browser.element("div", &["alert", DISMISSIBLE]);

        let pairs = dismissible_alerts(&browser);
        assert_eq!(pairs, vec![(alert, close)]);
        assert!(!browser.is_removed(plain));

        assert_eq!(begin_alert_dismiss(&mut browser, &alert), ALERT_FADE);
        assert!(browser.has_class(&alert, FADE));
        finish_alert_dismiss(&mut browser, &alert);
        assert!(browser.is_removed(alert));
    }

    #[test]
    fn date_cells_are_reformatted() {
        let mut browser = HeadlessBrowser::new();
        let good = browser.element("td", &[DATE_CELL]);
        browser.with_text(good, " 2024-03-15 14:30:00.123456 ");
        let empty = browser.element("td", &[DATE_CELL]);
        let bad = browser.element("td", &[DATE_CELL]);
        browser.with_text(bad, "n/a");

        let config = ClientConfig {
            date_locale: "en_US".to_string(),
            date_format: "%-d %B %Y, %H:%M".to_string(),
            ..ClientConfig::default()
        };
        assert_eq!(format_date_cells(&mut browser, &config), 1);
        assert_eq!(browser.text(&good), "15 March 2024, 14:30");
        assert_eq!(browser.text(&empty), "");
        assert_eq!(browser.text(&bad), "n/a");
    }
}
