use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

// --- Wire types ---

/// Body of a successful `POST /auth/login`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// JSON body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

// --- Token payload ---

/// Claims decoded from the middle segment of the session token.
///
/// Never verified; only used to decide what the page shows.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct TokenPayload {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TokenPayload {
    /// Identifier shown to the user (the account email in this deployment).
    pub fn display_name(&self) -> Option<&str> {
        self.sub.as_deref().filter(|s| !s.is_empty())
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|ts| Utc.timestamp_opt(ts, 0).single())
    }

    pub fn claim(&self, name: &str) -> Option<&serde_json::Value> {
        self.extra.get(name)
    }
}
