//! Client core for the Solmar booking site.
//!
//! The site itself is static; everything stateful lives behind two external
//! surfaces. The backend-as-a-service platform handles accounts, sessions,
//! and row storage, wrapped here by [`platform::PlatformClient`]. Serverless
//! functions handle email concerns, reached through the environment-aware
//! base URL in [`api::resolve`]. The one orchestrated flow is
//! [`registration::register`]: validate, create the account, then make a
//! best-effort newsletter subscription that can never fail the signup.

pub mod api;
pub mod config;
pub mod errors;
pub mod forms;
pub mod newsletter;
pub mod notify;
pub mod platform;
pub mod registration;
pub mod telemetry;

pub use api::resolve;
pub use config::SiteConfig;
pub use errors::ApiError;
pub use forms::{LoginForm, RegisterForm};
pub use newsletter::NewsletterClient;
pub use notify::{EmailSender, EmailTemplate, FunctionEmailSender, LogEmailSender};
pub use platform::PlatformClient;
pub use registration::{
    IdentityProvider, NewsletterAttempt, RegistrationRequest, WorkflowOutcome, register,
};
