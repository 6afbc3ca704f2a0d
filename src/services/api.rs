use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::model::{LoginResponse, RegisterRequest};
use async_trait::async_trait;

/// The three server endpoints the front end talks to.
///
/// `?Send` because everything runs on the browser's single thread.
#[async_trait(?Send)]
pub trait AuthApi {
    /// Exchanges credentials for a session token.
    async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse>;

    async fn register(&self, email: &str, password: &str) -> ClientResult<()>;

    /// True only when the server explicitly confirms admin rights for the
    /// token; rejections and transport failures both read as false.
    async fn check_admin(&self, token: &str) -> bool;
}

/// `AuthApi` over HTTP.
///
/// One request per call, no retries, no timeout beyond the transport's own.
#[derive(Clone)]
pub struct HttpAuthApi {
    client: reqwest::Client,
    login_url: String,
    register_url: String,
    check_admin_url: String,
}

impl HttpAuthApi {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            login_url: config.endpoint(&config.login_endpoint),
            register_url: config.endpoint(&config.register_endpoint),
            check_admin_url: config.endpoint(&config.check_admin_endpoint),
        }
    }
}

#[async_trait(?Send)]
impl AuthApi for HttpAuthApi {
    async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let resp = self
            .client
            .post(&self.login_url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }
        resp.json::<LoginResponse>()
            .await
            .map_err(|e| ClientError::Body(e.to_string()))
    }

    async fn register(&self, email: &str, password: &str) -> ClientResult<()> {
        let resp = self
            .client
            .post(&self.register_url)
            .json(&RegisterRequest { email, password })
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }
        Ok(())
    }

    async fn check_admin(&self, token: &str) -> bool {
        match self
            .client
            .get(&self.check_admin_url)
            .bearer_auth(token)
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                tracing::debug!(status = resp.status().as_u16(), "admin check rejected");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "admin check failed");
                false
            }
        }
    }
}
