//! UI components and pages.
//!
//! Leptos components rendered on the server; HTMX attributes on the markup
//! drive in-page updates.
//!
//! # Structure
//!
//! - [`layout`]: root layout (provider, top bar, bottom bar, toaster)
//! - [`auth_form`]: login / register form markup
//! - [`pages`]: full documents and HTMX fragments
//! - [`components`]: reusable primitives and icons

pub mod auth_form;
pub mod components;
pub mod layout;
pub mod pages;
