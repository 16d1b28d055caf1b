//! SVG icon components.
//!
//! Icons are rendered inline as SVG elements.

use leptos::prelude::*;

/// Muted grey used by the form field icons.
const ICON_COLOR: &str = "#737373";

/// Person outline, shown next to the username input.
#[component]
pub fn UserIcon(
    /// Additional CSS classes.
    #[prop(default = "")]
    class: &'static str,
) -> impl IntoView {
    let classes = format!("icon {class}");

    view! {
        <svg
            xmlns="http://www.w3.org/2000/svg"
            viewBox="0 0 24 24"
            fill="none"
            stroke=ICON_COLOR
            stroke-width="2"
            stroke-linecap="round"
            stroke-linejoin="round"
            class=classes
        >
            <circle cx="12" cy="8" r="4" />
            <path d="M4 21v-1a6 6 0 0 1 6-6h4a6 6 0 0 1 6 6v1" />
        </svg>
    }
}

/// Envelope outline, shown next to the email input.
#[component]
pub fn MailIcon(
    /// Additional CSS classes.
    #[prop(default = "")]
    class: &'static str,
) -> impl IntoView {
    let classes = format!("icon {class}");

    view! {
        <svg
            xmlns="http://www.w3.org/2000/svg"
            viewBox="0 0 24 24"
            fill="none"
            stroke=ICON_COLOR
            stroke-width="2"
            stroke-linecap="round"
            stroke-linejoin="round"
            class=classes
        >
            <rect x="2" y="4" width="20" height="16" rx="2" />
            <path d="m22 7-10 6L2 7" />
        </svg>
    }
}

/// Padlock outline, shown next to the password input.
#[component]
pub fn LockIcon(
    /// Additional CSS classes.
    #[prop(default = "")]
    class: &'static str,
) -> impl IntoView {
    let classes = format!("icon {class}");

    view! {
        <svg
            xmlns="http://www.w3.org/2000/svg"
            viewBox="0 0 24 24"
            fill="none"
            stroke=ICON_COLOR
            stroke-width="2"
            stroke-linecap="round"
            stroke-linejoin="round"
            class=classes
        >
            <rect x="3" y="11" width="18" height="11" rx="2" ry="2" />
            <path d="M7 11V7a5 5 0 0 1 10 0v4" />
        </svg>
    }
}

/// Speech bubble, used in the navigation bars.
#[component]
pub fn ChatIcon(
    /// Additional CSS classes.
    #[prop(default = "")]
    class: &'static str,
) -> impl IntoView {
    let classes = format!("icon {class}");

    view! {
        <svg
            xmlns="http://www.w3.org/2000/svg"
            viewBox="0 0 24 24"
            fill="none"
            stroke="currentColor"
            stroke-width="2"
            stroke-linecap="round"
            stroke-linejoin="round"
            class=classes
        >
            <path d="M21 15a2 2 0 0 1-2 2H7l-4 4V5a2 2 0 0 1 2-2h14a2 2 0 0 1 2 2z" />
        </svg>
    }
}
