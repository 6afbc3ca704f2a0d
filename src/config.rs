// Client configuration (deployment-specific, not user-specific)
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// How a token reaches pages that require a session.
///
/// Exactly one strategy is active per deployment so the token never travels
/// twice (cookie and query string) on the same navigation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenPropagation {
    /// Let the navigation proceed; the destination reads the cookie.
    Cookie,
    /// Rewrite the destination URL to carry the token as a query parameter.
    QueryParam,
}

/// Class names and ids of the page regions driven by the session state.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct RegionClasses {
    pub authenticated: String,
    pub anonymous: String,
    pub admin: String,
    pub identity_label_id: String,
}

impl Default for RegionClasses {
    fn default() -> Self {
        Self {
            authenticated: "auth-only".to_string(),
            anonymous: "guest-only".to_string(),
            admin: "admin-only".to_string(),
            identity_label_id: "user-email".to_string(),
        }
    }
}

/// Texts shown in blocking dialogs.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Messages {
    pub login_failed: String,
    pub register_failed: String,
    pub confirm_delete: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            login_failed: "Ошибка авторизации".to_string(),
            register_failed: "Ошибка регистрации".to_string(),
            confirm_delete: "Вы уверены, что хотите удалить этот элемент?".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub login_endpoint: String,
    pub register_endpoint: String,
    pub check_admin_endpoint: String,

    pub cookie_name: String,
    pub cookie_days: i64,
    pub theme_storage_key: String,
    pub token_query_param: String,

    pub login_path: String,
    pub home_path: String,
    pub protected_prefix: String,
    pub admin_prefix: String,
    pub logout_link_id: String,

    pub token_propagation: TokenPropagation,
    pub regions: RegionClasses,
    pub messages: Messages,

    pub date_locale: String,
    pub date_format: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            login_endpoint: "/auth/login".to_string(),
            register_endpoint: "/auth/register".to_string(),
            check_admin_endpoint: "/auth/check-admin".to_string(),
            cookie_name: "access_token".to_string(),
            cookie_days: 1,
            theme_storage_key: "theme".to_string(),
            token_query_param: "token".to_string(),
            login_path: "/login".to_string(),
            home_path: "/".to_string(),
            protected_prefix: "/questions/test".to_string(),
            admin_prefix: "/admin".to_string(),
            logout_link_id: "logoutLink".to_string(),
            token_propagation: TokenPropagation::QueryParam,
            regions: RegionClasses::default(),
            messages: Messages::default(),
            date_locale: "ru_RU".to_string(),
            date_format: "%-d %B %Y г., %H:%M".to_string(),
        }
    }
}

impl ClientConfig {
    pub const PATH_ENV: &'static str = "PORTAL_CLIENT_CONFIG";
    pub const BASE_URL_ENV: &'static str = "PORTAL_BASE_URL";

    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".portal_client.json")
    }

    /// Read a JSON config file, falling back to defaults when it is missing
    /// or unreadable. Absent keys take their default values.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config");
                    Self::default()
                }
            },
            Err(_) => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Self::default()
            }
        }
    }

    /// Config from `PORTAL_CLIENT_CONFIG` (or the default path), with
    /// `PORTAL_BASE_URL` overriding the server address.
    pub fn from_env() -> Self {
        let path = std::env::var(Self::PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_path());
        let mut config = Self::load(&path);
        if let Ok(base_url) = std::env::var(Self::BASE_URL_ENV) {
            config.base_url = base_url;
        }
        config
    }

    /// Absolute URL of a server path.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"token_propagation":"cookie","cookie_name":"sid"}"#).unwrap();
        assert_eq!(config.token_propagation, TokenPropagation::Cookie);
        assert_eq!(config.cookie_name, "sid");
        assert_eq!(config.login_path, "/login");
        assert_eq!(config.regions.admin, "admin-only");
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = ClientConfig {
            base_url: "http://localhost:8000/".to_string(),
            ..ClientConfig::default()
        };
        assert_eq!(
            config.endpoint("/auth/login"),
            "http://localhost:8000/auth/login"
        );
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = ClientConfig::load(Path::new("/nonexistent/portal.json"));
        assert_eq!(config.cookie_days, 1);
        assert_eq!(config.token_propagation, TokenPropagation::QueryParam);
    }
}
