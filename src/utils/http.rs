// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};

use crate::error::{AppError, Result};
use crate::models::HttpConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_client(config: &HttpConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Send a request, treating non-2xx statuses as a failure of the given source.
async fn send_checked(source_key: &str, request: RequestBuilder) -> Result<Response> {
    let response = request.send().await?;
    let status = response.status();
    check_status(source_key, status, response.url().as_str())?;
    log::debug!("{} received ({})", response.url(), status);
    Ok(response)
}

/// Reject any status outside 2xx as an adapter error naming the URL.
fn check_status(source_key: &str, status: StatusCode, url: &str) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }
    Err(AppError::adapter(
        source_key,
        format!("HTTP {} from {}", status.as_u16(), url),
    ))
}

/// Fetch a response body as text.
pub async fn fetch_text(source_key: &str, request: RequestBuilder) -> Result<String> {
    Ok(send_checked(source_key, request).await?.text().await?)
}

/// Fetch a response body as raw bytes.
pub async fn fetch_bytes(source_key: &str, request: RequestBuilder) -> Result<Vec<u8>> {
    Ok(send_checked(source_key, request).await?.bytes().await?.to_vec())
}
