//! Login and registration.
//!
//! # Structure
//!
//! - [`model`]: form modes, fields, and backend payloads
//! - [`validation`]: per-field rules run on submit
//! - [`provider`]: the [`SignIn`] and [`Registrar`] capabilities
//! - [`http`]: reqwest-backed implementations of those capabilities
//! - [`form`]: the [`AuthForm`] submission flow
//!
//! # Example
//!
//! ```rust
//! use getsend_web::auth::{Field, FormMode, FormValues, validate};
//!
//! let values = FormValues {
//!     username: Some("al".to_string()),
//!     email: "al@example.com".to_string(),
//!     password: "secret!".to_string(),
//! };
//! let errors = validate(FormMode::Register, &values);
//! assert_eq!(
//!     errors.get(Field::Username),
//!     Some("Username must be at least 3 characters")
//! );
//! ```

pub mod form;
pub mod http;
pub mod model;
pub mod provider;
pub mod validation;

pub use form::{AuthForm, SubmitOutcome};
pub use http::{HttpRegistrar, HttpSignIn};
pub use model::{Credentials, Field, FormMode, FormValues, RegistrationData};
pub use provider::{AuthError, Registrar, Session, SignIn, SignInOptions};
pub use validation::{ValidationErrors, validate};
