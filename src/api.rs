//! HTTP helpers for JSON APIs with consistent timeouts and error handling,
//! plus the environment-aware resolver for the serverless functions base
//! URL. The helpers do not store secrets or tokens; they only attach
//! headers provided by callers.

use crate::errors::ApiError;
use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{Instrument, debug, info_span};

/// Default request timeout applied to all HTTP helpers.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Maximum number of error body characters surfaced to the UI.
const MAX_ERROR_CHARS: usize = 200;
/// Deployed functions base used when developing against a local host.
const REMOTE_FUNCTIONS_BASE: &str = "https://solmar.rentals";

/// Resolves the base URL serverless function calls should target.
///
/// Local development hosts (`localhost`, `127.0.0.1`, private `192.168.*`
/// addresses) are redirected to the deployed functions so they can be
/// exercised without running a functions emulator. Every other host gets an
/// empty base, meaning "use the page's own origin", which covers production
/// and preview deployments alike. Pure function of its inputs; callers must
/// re-evaluate it per call rather than caching the result.
#[must_use]
pub fn resolve(current_host: &str, is_production: bool) -> String {
    if is_production {
        return String::new();
    }
    let hostname = current_host.split(':').next().unwrap_or(current_host).trim();
    if hostname == "localhost" || hostname == "127.0.0.1" || hostname.starts_with("192.168.") {
        REMOTE_FUNCTIONS_BASE.to_string()
    } else {
        String::new()
    }
}

/// Builds a URL from a base URL and the provided path. An empty base yields
/// an origin-relative path.
#[must_use]
pub fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Posts JSON with custom headers and expects an empty response body.
///
/// # Errors
/// Returns an error when the request cannot be built or sent, times out, or
/// the server responds with a non-success status.
pub async fn post_json<B: Serialize>(
    base_url: &str,
    path: &str,
    body: &B,
    headers: &[(String, String)],
) -> Result<(), ApiError> {
    let response = send_post(base_url, path, body, headers).await?;
    handle_empty_response(response).await
}

/// Posts JSON with custom headers and parses a JSON response.
///
/// # Errors
/// Returns an error when the request fails, the server responds with a
/// non-success status, or the response body cannot be decoded as `T`.
pub async fn post_json_response<B: Serialize, T: DeserializeOwned>(
    base_url: &str,
    path: &str,
    body: &B,
    headers: &[(String, String)],
) -> Result<T, ApiError> {
    let response = send_post(base_url, path, body, headers).await?;
    handle_json_response(response).await
}

/// Fetches JSON with custom headers.
///
/// # Errors
/// Returns an error when the request fails, the server responds with a
/// non-success status, or the response body cannot be decoded as `T`.
pub async fn get_json<T: DeserializeOwned>(
    base_url: &str,
    path: &str,
    headers: &[(String, String)],
) -> Result<T, ApiError> {
    let url = build_url_with_base(base_url, path);
    let span = info_span!("http.request", http.method = "GET", url = %url);
    let mut builder = client()?.get(&url);
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    let response = builder.send().instrument(span).await.map_err(map_request_error)?;
    handle_json_response(response).await
}

async fn send_post<B: Serialize>(
    base_url: &str,
    path: &str,
    body: &B,
    headers: &[(String, String)],
) -> Result<reqwest::Response, ApiError> {
    let url = build_url_with_base(base_url, path);
    debug!("endpoint URL: {}", url);

    let span = info_span!("http.request", http.method = "POST", url = %url);
    let mut builder = client()?.post(&url).json(body);
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder.send().instrument(span).await.map_err(map_request_error)
}

fn client() -> Result<Client, ApiError> {
    Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|err| ApiError::Config(format!("Failed to build HTTP client: {err}")))
}

/// Maps transport errors into user-facing `ApiError` variants with timeout
/// detection.
fn map_request_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout("Request timed out. Please try again.".to_string())
    } else {
        ApiError::Network(format!("Unable to reach the server: {err}"))
    }
}

/// Parses JSON responses and surfaces HTTP errors with sanitized bodies.
async fn handle_json_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    if response.status().is_success() {
        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")))
    } else {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Http {
            status,
            message: sanitize_body(body),
        })
    }
}

/// Handles empty responses and returns sanitized HTTP errors when needed.
async fn handle_empty_response(response: reqwest::Response) -> Result<(), ApiError> {
    if response.status().is_success() {
        Ok(())
    } else {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Http {
            status,
            message: sanitize_body(body),
        })
    }
}

/// Sanitizes HTTP error bodies for user-facing messages by trimming and
/// truncating.
fn sanitize_body(body: String) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
