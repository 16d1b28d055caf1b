//! Card container.

use leptos::prelude::*;

/// Card container component.
#[component]
pub fn Card(
    /// Additional CSS classes.
    #[prop(default = "")]
    class: &'static str,
    /// Card content.
    children: Children,
) -> impl IntoView {
    let classes = format!("card {class}");

    view! {
        <div class=classes>
            {children()}
        </div>
    }
}

/// Card content section.
#[component]
pub fn CardContent(
    /// Additional CSS classes.
    #[prop(default = "")]
    class: &'static str,
    /// Content.
    children: Children,
) -> impl IntoView {
    let classes = format!("card-content {class}");

    view! {
        <div class=classes>
            {children()}
        </div>
    }
}
