// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::ApiConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_client(config: &ApiConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// GET a URL and decode the body as JSON.
///
/// A status outside the success range is an error, as is a body that does
/// not decode into `T`.
pub async fn get_json<T: DeserializeOwned>(client: &reqwest::Client, url: &Url) -> Result<T> {
    let response = client.get(url.clone()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}
