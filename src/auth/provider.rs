//! Capabilities the auth form depends on.
//!
//! The form never talks to a backend directly. It is handed a [`SignIn`] and a
//! [`Registrar`] and only observes whether each call succeeded.

use async_trait::async_trait;
use thiserror::Error;

use super::model::{Credentials, RegistrationData};

/// Provider identifier used by the login form.
pub const CREDENTIALS_PROVIDER: &str = "credentials";

/// Errors reported by sign-in and registration calls.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The backend answered but refused the credentials.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The backend answered with a non-success status.
    #[error("request rejected with status {status}")]
    Rejected {
        /// HTTP status code.
        status: u16,
    },

    /// The request never got an answer.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The answer could not be understood.
    #[error("malformed response: {0}")]
    Decode(String),

    /// Endpoint URL could not be built.
    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Options passed along with a sign-in call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignInOptions {
    /// Whether the provider may redirect on its own.
    pub redirect: bool,
}

impl Default for SignInOptions {
    fn default() -> Self {
        Self { redirect: true }
    }
}

/// Proof of a successful sign-in, as handed back by the provider.
///
/// The form passes it through untouched; the web layer forwards the cookies to
/// the browser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// `Set-Cookie` values to forward.
    pub cookies: Vec<String>,
    /// Redirect URL suggested by the provider, if any.
    pub url: Option<String>,
}

/// Credential sign-in.
#[async_trait]
pub trait SignIn: Send + Sync {
    async fn sign_in(
        &self,
        provider: &str,
        credentials: &Credentials,
        options: SignInOptions,
    ) -> Result<Session, AuthError>;
}

/// Account registration.
#[async_trait]
pub trait Registrar: Send + Sync {
    async fn register(&self, data: &RegistrationData) -> Result<(), AuthError>;
}
