//! Account endpoints of the platform auth service: signup, password login,
//! and logout. Passwords stay wrapped in `SecretString` until the request is
//! serialized; payloads must never be logged.

use crate::{errors::ApiError, platform::PlatformClient};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

/// Profile fields stored alongside the account at creation time.
#[derive(Clone, Debug, Serialize)]
pub struct SignUpMetadata {
    pub name: String,
    pub phone: String,
}

/// Session summary returned by the auth endpoints. Contains the bearer
/// token for follow-up requests plus a minimal user record; the rest of the
/// provider payload is opaque and deliberately not modeled.
#[derive(Clone, Debug)]
pub struct AuthSession {
    pub access_token: Option<String>,
    pub user_id: Option<String>,
    pub email: Option<String>,
}

impl AuthSession {
    fn from_body(body: &Value) -> Self {
        let user = body.get("user").filter(|user| !user.is_null());
        Self {
            access_token: body
                .get("access_token")
                .and_then(Value::as_str)
                .map(str::to_string),
            user_id: user
                .and_then(|user| user.get("id"))
                .and_then(Value::as_str)
                .map(str::to_string),
            email: user
                .and_then(|user| user.get("email"))
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }
}

impl PlatformClient {
    /// Creates an account with the given credentials and profile metadata.
    ///
    /// # Errors
    /// Returns an error when the request fails or the platform rejects the
    /// signup; the provider message is preserved for display.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
        metadata: &SignUpMetadata,
    ) -> Result<AuthSession, ApiError> {
        let payload = json!({
            "email": email,
            "password": password.expose_secret(),
            "data": metadata,
        });

        let response = self
            .send_json(Method::POST, "/auth/v1/signup", &[], Some(&payload), None, &[])
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")))?;
        debug!("signup accepted for {}", email);
        Ok(AuthSession::from_body(&body))
    }

    /// Signs in with email and password, returning the session on success.
    ///
    /// # Errors
    /// Returns an error when the request fails or credentials are rejected.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthSession, ApiError> {
        let payload = json!({
            "email": email,
            "password": password.expose_secret(),
        });
        let query = [("grant_type".to_string(), "password".to_string())];

        let response = self
            .send_json(Method::POST, "/auth/v1/token", &query, Some(&payload), None, &[])
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")))?;
        Ok(AuthSession::from_body(&body))
    }

    /// Revokes the given access token on the platform.
    ///
    /// # Errors
    /// Returns an error when the request fails or the token is already gone.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), ApiError> {
        let response = self
            .send_json(
                Method::POST,
                "/auth/v1/logout",
                &[],
                None,
                Some(access_token),
                &[],
            )
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(())
    }
}
