//! Registration workflow: validate locally, create the account, then make a
//! best-effort newsletter subscription. The subscription step is isolated on
//! purpose; once the account exists the workflow reports success no matter
//! what the mailing-list function does.

use crate::{
    errors::ApiError,
    newsletter::NewsletterClient,
    platform::{PlatformClient, auth::SignUpMetadata},
};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error};

/// Minimum password length enforced before any network call.
const MIN_PASSWORD_LENGTH: usize = 6;
/// Shown when the identity provider fails without a usable message.
const PRIMARY_FALLBACK_MESSAGE: &str = "Failed to register. Please try again.";
/// `source` value sent with subscriptions made during registration.
const NEWSLETTER_SOURCE: &str = "registration";

/// Form input for one registration attempt. Discarded once the workflow
/// completes; nothing here is persisted by this crate.
#[derive(Clone, Debug)]
pub struct RegistrationRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub subscribe_to_newsletter: bool,
}

/// Consolidated result of one registration attempt. Produced once per
/// invocation and consumed immediately by the caller to pick a message and
/// end the loading state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorkflowOutcome {
    ValidationFailed(String),
    PrimaryFailed(String),
    Succeeded { newsletter_subscribed: bool },
}

impl WorkflowOutcome {
    /// User-facing message for this outcome.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            WorkflowOutcome::ValidationFailed(reason) => reason.clone(),
            WorkflowOutcome::PrimaryFailed(message) => message.clone(),
            WorkflowOutcome::Succeeded {
                newsletter_subscribed: true,
            } => "Registration successful! You are subscribed to our newsletter.".to_string(),
            WorkflowOutcome::Succeeded {
                newsletter_subscribed: false,
            } => "Registration successful!".to_string(),
        }
    }
}

/// Record of the side-effect step, kept explicit so callers and tests can
/// assert on it instead of relying on swallowed errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NewsletterAttempt {
    pub attempted: bool,
    pub succeeded: bool,
}

impl NewsletterAttempt {
    const SKIPPED: Self = Self {
        attempted: false,
        succeeded: false,
    };
}

/// Account-creation capability of the identity provider. A seam so the
/// workflow can be exercised against a counting mock.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Creates an account; only the error side is inspected by the workflow.
    async fn create_account(
        &self,
        email: &str,
        password: &SecretString,
        metadata: &SignUpMetadata,
    ) -> Result<(), ApiError>;
}

#[async_trait]
impl IdentityProvider for PlatformClient {
    async fn create_account(
        &self,
        email: &str,
        password: &SecretString,
        metadata: &SignUpMetadata,
    ) -> Result<(), ApiError> {
        self.sign_up(email, password, metadata).await.map(|_| ())
    }
}

/// Normalize an email for account creation.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Runs the registration workflow: validation, primary account creation,
/// then the optional best-effort subscription. Each external call is made at
/// most once and the two are never concurrent; the subscription only starts
/// after the primary call succeeded.
pub async fn register(
    provider: &dyn IdentityProvider,
    newsletter: &NewsletterClient,
    request: &RegistrationRequest,
) -> WorkflowOutcome {
    if let Err(reason) = validate(request) {
        return WorkflowOutcome::ValidationFailed(reason);
    }

    let email = normalize_email(&request.email);
    let metadata = SignUpMetadata {
        name: request.name.trim().to_string(),
        phone: request.phone.trim().to_string(),
    };

    if let Err(err) = provider
        .create_account(&email, &request.password, &metadata)
        .await
    {
        return WorkflowOutcome::PrimaryFailed(primary_error_message(&err));
    }

    let attempt = if request.subscribe_to_newsletter {
        newsletter_step(newsletter, request).await
    } else {
        NewsletterAttempt::SKIPPED
    };
    debug!(
        attempted = attempt.attempted,
        succeeded = attempt.succeeded,
        "newsletter step finished"
    );

    WorkflowOutcome::Succeeded {
        newsletter_subscribed: attempt.succeeded,
    }
}

/// Runs the subscription side effect. Failures are logged and folded into
/// the attempt record; they never propagate to the workflow outcome.
pub async fn newsletter_step(
    newsletter: &NewsletterClient,
    request: &RegistrationRequest,
) -> NewsletterAttempt {
    match newsletter
        .subscribe(request.email.trim(), request.name.trim(), NEWSLETTER_SOURCE)
        .await
    {
        Ok(succeeded) => NewsletterAttempt {
            attempted: true,
            succeeded,
        },
        Err(err) => {
            error!("newsletter subscription failed: {err}");
            NewsletterAttempt {
                attempted: true,
                succeeded: false,
            }
        }
    }
}

/// Local validation, short-circuiting on the first violation. No network
/// calls happen before this passes.
fn validate(request: &RegistrationRequest) -> Result<(), String> {
    if request.name.trim().is_empty()
        || request.email.trim().is_empty()
        || request.phone.trim().is_empty()
        || request.password.expose_secret().is_empty()
    {
        return Err("All fields are required.".to_string());
    }
    if request.password.expose_secret() != request.confirm_password.expose_secret() {
        return Err("Passwords do not match".to_string());
    }
    if request.password.expose_secret().len() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters."
        ));
    }
    Ok(())
}

fn primary_error_message(err: &ApiError) -> String {
    match err {
        ApiError::Http { message, .. } if !message.trim().is_empty() => message.clone(),
        ApiError::Http { .. } => PRIMARY_FALLBACK_MESSAGE.to_string(),
        other => other.to_string(),
    }
}
