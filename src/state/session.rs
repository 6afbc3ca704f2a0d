use crate::model::TokenPayload;

/// Where the page is in working out who the visitor is.
///
/// `Unknown` until the session cookie has been read; the two authenticated
/// terminal states only follow a settled capability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    Unknown,
    Anonymous,
    AuthenticatedPendingCapability,
    AuthenticatedUser,
    AuthenticatedAdmin,
}

/// What the auth-dependent parts of the page should show.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthView {
    pub authenticated: bool,
    pub admin: bool,
    pub identity: Option<String>,
}

/// State management for the session of the current page view
#[derive(Debug, Clone)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub token: Option<String>,
    pub claims: Option<TokenPayload>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Unknown,
            token: None,
            claims: None,
        }
    }
}

impl SessionState {
    /// Applies the session-store read made at page load.
    pub fn resolve(&mut self, token: Option<String>, claims: Option<TokenPayload>) {
        match token {
            Some(token) => {
                self.phase = SessionPhase::AuthenticatedPendingCapability;
                self.token = Some(token);
                self.claims = claims;
            }
            None => self.logout(),
        }
        tracing::debug!(phase = ?self.phase, "session resolved");
    }

    /// Applies a capability check result. Returns false, changing nothing,
    /// when the result belongs to a token that is no longer current or the
    /// check already settled.
    pub fn settle(&mut self, token: &str, is_admin: bool) -> bool {
        if self.phase != SessionPhase::AuthenticatedPendingCapability
            || self.token.as_deref() != Some(token)
        {
            tracing::debug!(phase = ?self.phase, "discarding stale capability result");
            return false;
        }
        self.phase = if is_admin {
            SessionPhase::AuthenticatedAdmin
        } else {
            SessionPhase::AuthenticatedUser
        };
        tracing::debug!(phase = ?self.phase, "capability settled");
        true
    }

    pub fn logout(&mut self) {
        self.phase = SessionPhase::Anonymous;
        self.token = None;
        self.claims = None;
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::AuthenticatedPendingCapability
                | SessionPhase::AuthenticatedUser
                | SessionPhase::AuthenticatedAdmin
        )
    }

    pub fn view(&self) -> AuthView {
        let authenticated = self.is_authenticated() && self.token.is_some();
        AuthView {
            authenticated,
            admin: authenticated && self.phase == SessionPhase::AuthenticatedAdmin,
            identity: if authenticated {
                self.claims
                    .as_ref()
                    .and_then(|c| c.display_name())
                    .map(str::to_string)
            } else {
                None
            },
        }
    }
}
