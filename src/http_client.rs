use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

const REQUEST_TIMEOUT_SECS: u64 = 10;

static CLIENT: OnceCell<Client> = OnceCell::new();

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

/// FRC Events API credentials from the environment; a `.env` file in the
/// working directory is honored.
pub fn api_credentials() -> Result<(String, String)> {
    dotenvy::dotenv().ok();
    let username = env::var("FRC_AUTH_USERNAME").context("FRC_AUTH_USERNAME is not set")?;
    let token = env::var("FRC_AUTH_TOKEN").context("FRC_AUTH_TOKEN is not set")?;
    Ok((username, token))
}
