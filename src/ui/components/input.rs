//! Input component for form fields.

use leptos::prelude::*;

/// Text input component.
///
/// # Example
///
/// ```rust,ignore
/// view! {
///     <Input
///         input_type="email"
///         placeholder="Email"
///         name="email"
///         value=previous_email
///         autocomplete="email"
///     />
/// }
/// ```
#[component]
pub fn Input(
    /// Input type (text, email, password, etc.).
    #[prop(default = "text")]
    input_type: &'static str,
    /// Placeholder text.
    #[prop(default = "")]
    placeholder: &'static str,
    /// Input name attribute.
    #[prop(default = "")]
    name: &'static str,
    /// Current value.
    #[prop(into, default = String::new())]
    value: String,
    /// Autocomplete hint.
    #[prop(default = "off")]
    autocomplete: &'static str,
) -> impl IntoView {
    view! {
        <input
            type=input_type
            class="input-field"
            placeholder=placeholder
            name=name
            id=name
            value=value
            autocomplete=autocomplete
        />
    }
}
