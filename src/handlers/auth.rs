use crate::app::App;
use crate::error::{ClientError, ClientResult};
use crate::model::LoginResponse;
use crate::platform::Browser;
use crate::services::AuthApi;

/// Handle the login form: one request, then [`apply_login_result`].
pub async fn handle_login_submit<B: Browser, A: AuthApi>(
    app: &mut App<B, A>,
    username: &str,
    password: &str,
) -> bool {
    let result = app.api.login(username, password).await;
    apply_login_result(app, result)
}

/// Stores the token and goes home on success. A rejection is reported with
/// an alert; a transport failure is only logged. Neither writes a cookie or
/// navigates. Returns true when the visitor is now logged in.
pub fn apply_login_result<B: Browser, A: AuthApi>(
    app: &mut App<B, A>,
    result: ClientResult<LoginResponse>,
) -> bool {
    let result = result.and_then(|resp| {
        if resp.access_token.is_empty() {
            Err(ClientError::Body("empty access_token".to_string()))
        } else {
            Ok(resp)
        }
    });
    match result {
        Ok(resp) => {
            app.store
                .set(&mut app.browser, &resp.access_token, app.config.cookie_days);
            tracing::info!("login succeeded");
            let home = app.config.home_path.clone();
            app.browser.assign(&home);
            true
        }
        Err(e) if e.is_rejection() => {
            tracing::warn!(error = %e, "login rejected");
            let message = app.config.messages.login_failed.clone();
            app.browser.alert(&message);
            false
        }
        Err(e) => {
            tracing::error!(error = %e, "login request failed");
            false
        }
    }
}

/// Handle the registration form.
pub async fn handle_register_submit<B: Browser, A: AuthApi>(
    app: &mut App<B, A>,
    email: &str,
    password: &str,
) -> bool {
    let result = app.api.register(email, password).await;
    apply_register_result(app, result)
}

/// Sends the new user to the login page on success; same failure split as
/// login.
pub fn apply_register_result<B: Browser, A: AuthApi>(
    app: &mut App<B, A>,
    result: ClientResult<()>,
) -> bool {
    match result {
        Ok(()) => {
            tracing::info!("registration succeeded");
            let login = app.config.login_path.clone();
            app.browser.assign(&login);
            true
        }
        Err(e) if e.is_rejection() => {
            tracing::warn!(error = %e, "registration rejected");
            let message = app.config.messages.register_failed.clone();
            app.browser.alert(&message);
            false
        }
        Err(e) => {
            tracing::error!(error = %e, "registration request failed");
            false
        }
    }
}
