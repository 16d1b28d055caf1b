//! Form modes, field names, and the payloads sent to the auth backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::navigation::Route;

/// Which flavour of the auth form is rendered and submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMode {
    /// Existing account, email + password.
    Login,
    /// New account, username + email + password.
    Register,
}

impl FormMode {
    /// Fields rendered and validated in this mode, in display order.
    #[must_use]
    pub fn fields(self) -> &'static [Field] {
        match self {
            Self::Login => &[Field::Email, Field::Password],
            Self::Register => &[Field::Username, Field::Email, Field::Password],
        }
    }

    /// Label of the submit button.
    #[must_use]
    pub fn submit_label(self) -> &'static str {
        match self {
            Self::Login => "Let's Chat",
            Self::Register => "Join Free",
        }
    }

    /// Path the form posts to.
    #[must_use]
    pub fn action(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
        }
    }

    /// Prompt shown in front of the link to the other mode.
    #[must_use]
    pub fn switch_prompt(self) -> &'static str {
        match self {
            Self::Login => "Don't have an account?",
            Self::Register => "Already have an account?",
        }
    }

    /// Label of the link to the other mode.
    #[must_use]
    pub fn switch_label(self) -> &'static str {
        match self {
            Self::Login => "Register Here",
            Self::Register => "Sign In",
        }
    }

    /// Where the link to the other mode points.
    #[must_use]
    pub fn switch_route(self) -> Route {
        match self {
            Self::Login => Route::Register,
            Self::Register => Route::Root,
        }
    }

    /// Where a successful submission navigates to.
    #[must_use]
    pub fn success_route(self) -> Route {
        match self {
            Self::Login => Route::Chats,
            Self::Register => Route::Root,
        }
    }

    /// Notification text for a failed submission.
    #[must_use]
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Login => "Invalid email or password",
            Self::Register => "Something went wrong",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
        }
    }
}

impl fmt::Display for FormMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown form mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown form mode: {0}")]
pub struct UnknownMode(pub String);

impl FromStr for FormMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "login" => Ok(Self::Login),
            "register" => Ok(Self::Register),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

/// A form input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Username,
    Email,
    Password,
}

impl Field {
    /// The `name` attribute of the input.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
            Self::Password => "password",
        }
    }

    /// The `type` attribute of the input.
    #[must_use]
    pub fn input_type(self) -> &'static str {
        match self {
            Self::Username => "text",
            Self::Email => "email",
            Self::Password => "password",
        }
    }

    #[must_use]
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Username => "Username",
            Self::Email => "Email",
            Self::Password => "Password",
        }
    }

    /// The `autocomplete` hint; passwords differ between signing in and signing up.
    #[must_use]
    pub fn autocomplete(self, mode: FormMode) -> &'static str {
        match (self, mode) {
            (Self::Username, _) => "username",
            (Self::Email, _) => "email",
            (Self::Password, FormMode::Login) => "current-password",
            (Self::Password, FormMode::Register) => "new-password",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw values as submitted by the browser.
///
/// Missing inputs deserialize to empty strings so validation can report them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormValues {
    pub username: Option<String>,
    pub email: String,
    pub password: String,
}

impl FormValues {
    /// Value of `field`, empty when absent.
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Username => self.username.as_deref().unwrap_or_default(),
            Field::Email => &self.email,
            Field::Password => &self.password,
        }
    }

    /// Copy of these values safe to echo back into a re-rendered form.
    #[must_use]
    pub fn without_password(&self) -> Self {
        Self {
            username: self.username.clone(),
            email: self.email.clone(),
            password: String::new(),
        }
    }

    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }

    #[must_use]
    pub fn registration(&self) -> RegistrationData {
        RegistrationData {
            username: self.username.clone().unwrap_or_default(),
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

/// Email/password pair used for sign-in.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Username/email/password triple used to create an account.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationData {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for RegistrationData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationData")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
