//! GetSend Chat web front-end.
//!
//! Server-rendered pages for a chat application: the shared page shell and the
//! login / registration forms. Account storage and credential checks live in
//! an external auth backend that this crate talks to over HTTP.
//!
//! # Architecture
//!
//! - **Server**: Axum router serving pages, form posts and static assets
//! - **Auth**: validation and the submission flow, with sign-in and
//!   registration injected as capabilities
//! - **UI**: Leptos SSR components, HTMX for in-page form updates
//!
//! # Modules
//!
//! - [`auth`]: form model, validation, backend clients, submission flow
//! - [`config`]: layered configuration
//! - [`navigation`]: routes and the navigation capability
//! - [`notify`]: transient notifications
//! - [`server`]: router and handlers
//! - [`ui`]: layout, form markup, pages

#![allow(clippy::missing_fields_in_debug)]

pub mod auth;
pub mod config;
pub mod error;
pub mod navigation;
pub mod notify;
pub mod server;
pub mod ui;

use std::sync::Arc;

use crate::auth::{Registrar, SignIn};
use crate::config::AppConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Global configuration.
    pub config: Arc<AppConfig>,
    /// Credential sign-in.
    pub sign_in: Arc<dyn SignIn>,
    /// Account registration.
    pub registrar: Arc<dyn Registrar>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
