//! Button component.

use leptos::prelude::*;

/// Primary action button.
///
/// # Example
///
/// ```rust,ignore
/// view! {
///     <Button button_type="submit">
///         "Join Free"
///     </Button>
/// }
/// ```
#[component]
pub fn Button(
    /// Button type attribute.
    #[prop(default = "button")]
    button_type: &'static str,
    /// Additional CSS classes.
    #[prop(default = "")]
    class: &'static str,
    /// Button content.
    children: Children,
) -> impl IntoView {
    let classes = format!("button button-primary {class}");

    view! {
        <button type=button_type class=classes>
            {children()}
        </button>
    }
}
