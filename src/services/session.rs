use crate::platform::{Clock, CookieJar};
use chrono::{DateTime, Duration, Utc};

const EXPIRED: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// Cookie-backed storage for the session token.
///
/// Touches nothing but the cookie jar; no network, no other state.
#[derive(Debug, Clone)]
pub struct SessionStore {
    cookie_name: String,
}

impl SessionStore {
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Writes the token with an expiry `days` from now, replacing any
    /// previous value. A non-positive `days` writes a session cookie; a
    /// lifetime past chrono's range falls back to one day.
    pub fn set<J>(&self, jar: &mut J, token: &str, days: i64)
    where
        J: CookieJar + Clock + ?Sized,
    {
        let expires = if days > 0 {
            let now = jar.now();
            Duration::try_days(days)
                .and_then(|lifetime| now.checked_add_signed(lifetime))
                .or_else(|| {
                    tracing::warn!(days, "cookie lifetime out of range, using one day");
                    now.checked_add_signed(Duration::days(1))
                })
                .map(|at| format!("; expires={}", http_date(at)))
                .unwrap_or_default()
        } else {
            String::new()
        };
        jar.write_cookie(&format!("{}={}{}; path=/", self.cookie_name, token, expires));
        tracing::debug!(cookie = %self.cookie_name, days, "session token stored");
    }

    /// The token, if a cookie with exactly this name is present.
    pub fn get<J>(&self, jar: &J) -> Option<String>
    where
        J: CookieJar + ?Sized,
    {
        let prefix = format!("{}=", self.cookie_name);
        jar.cookie_string()
            .split(';')
            .map(|segment| segment.trim_start_matches(' '))
            .find_map(|segment| segment.strip_prefix(prefix.as_str()))
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    pub fn clear<J>(&self, jar: &mut J)
    where
        J: CookieJar + ?Sized,
    {
        jar.write_cookie(&format!("{}=; expires={}; path=/", self.cookie_name, EXPIRED));
        tracing::debug!(cookie = %self.cookie_name, "session token cleared");
    }
}

/// Cookie `expires` format, e.g. `Fri, 15 Mar 2024 12:00:00 GMT`.
fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
