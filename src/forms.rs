//! Form state for the login and registration screens: field values, a
//! loading flag, and the current error message. Rendering is out of scope;
//! the UI layer binds inputs to these fields and calls `validate` on submit.

use crate::registration::{RegistrationRequest, normalize_email};
use regex::Regex;
use secrecy::SecretString;

/// Basic email format check on already-normalized input.
fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}

/// Credentials produced by a valid login form.
#[derive(Clone, Debug)]
pub struct LoginCredentials {
    pub email: String,
    pub password: SecretString,
}

#[derive(Clone, Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub loading: bool,
    pub error: Option<String>,
}

impl LoginForm {
    /// Validates the form and produces credentials for the sign-in call.
    /// On failure the message is stored on the form and returned.
    ///
    /// # Errors
    /// Returns the user-facing validation message.
    pub fn validate(&mut self) -> Result<LoginCredentials, String> {
        let email = normalize_email(&self.email);

        if email.is_empty() || self.password.trim().is_empty() {
            return self.fail("Email and password are required.");
        }
        if !valid_email(&email) {
            return self.fail("Email address looks invalid.");
        }

        self.error = None;
        Ok(LoginCredentials {
            email,
            password: SecretString::from(self.password.clone()),
        })
    }

    /// Marks the form as submitting and clears any previous error.
    pub fn begin_submit(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Ends the loading state, recording an error message when present.
    pub fn finish_submit(&mut self, error: Option<String>) {
        self.loading = false;
        self.error = error;
    }

    fn fail(&mut self, message: &str) -> Result<LoginCredentials, String> {
        self.error = Some(message.to_string());
        Err(message.to_string())
    }
}

#[derive(Clone, Debug, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub subscribe_to_newsletter: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl RegisterForm {
    /// Validates the form and produces the workflow request. The checks
    /// mirror the workflow's own validation plus an email format check for
    /// earlier feedback; the workflow re-validates regardless.
    ///
    /// # Errors
    /// Returns the user-facing validation message.
    pub fn validate(&mut self) -> Result<RegistrationRequest, String> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.phone.trim().is_empty()
            || self.password.trim().is_empty()
        {
            return self.fail("All fields are required.");
        }
        if !valid_email(&normalize_email(&self.email)) {
            return self.fail("Email address looks invalid.");
        }
        if self.password != self.confirm_password {
            return self.fail("Passwords do not match");
        }
        if self.password.len() < 6 {
            return self.fail("Password must be at least 6 characters.");
        }

        self.error = None;
        Ok(RegistrationRequest {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            password: SecretString::from(self.password.clone()),
            confirm_password: SecretString::from(self.confirm_password.clone()),
            subscribe_to_newsletter: self.subscribe_to_newsletter,
        })
    }

    /// Marks the form as submitting and clears any previous error.
    pub fn begin_submit(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Ends the loading state, recording an error message when present.
    pub fn finish_submit(&mut self, error: Option<String>) {
        self.loading = false;
        self.error = error;
    }

    fn fail(&mut self, message: &str) -> Result<RegistrationRequest, String> {
        self.error = Some(message.to_string());
        Err(message.to_string())
    }
}
