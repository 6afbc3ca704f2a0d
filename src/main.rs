//! Headless smoke run: signs in against a running portal server with an
//! in-memory browser and reports what the home page would show.

#[cfg(not(target_arch = "wasm32"))]
use anyhow::{bail, Result};
#[cfg(not(target_arch = "wasm32"))]
use portal_client::{App, ClientConfig, HeadlessBrowser, HttpAuthApi};
#[cfg(not(target_arch = "wasm32"))]
use std::env;
#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::EnvFilter;

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config = ClientConfig::from_env();
    let args: Vec<String> = env::args().skip(1).collect();
    let (email, password) = match args.as_slice() {
        // Server address from the command line overrides the config
        [base_url, email, password] => {
            config.base_url = base_url.clone();
            (email.clone(), password.clone())
        }
        [email, password] => (email.clone(), password.clone()),
        _ => bail!("usage: portal-client [BASE_URL] EMAIL PASSWORD"),
    };

    let api = HttpAuthApi::new(&config);
    let browser = HeadlessBrowser::new().at(&config.login_path);
    let mut app = App::new(browser, api, config);

    if !app.submit_login(&email, &password).await {
        if let Some(message) = app.browser.alerts.last() {
            bail!("login failed: {}", message);
        }
        bail!("login failed: server unreachable at {}", app.config.base_url);
    }

    let home = app.config.home_path.clone();
    app.browser.open(&home);
    let phase = app.load().await;

    let view = app.session.view();
    println!("phase:    {:?}", phase);
    println!("identity: {}", view.identity.as_deref().unwrap_or("-"));
    println!("admin:    {}", view.admin);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
