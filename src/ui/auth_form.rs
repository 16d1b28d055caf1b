//! Login / register form markup.
//!
//! The form posts with HTMX and swaps itself with the server's answer. Without
//! JavaScript it falls back to a plain `POST` to the same path.

use leptos::prelude::*;

use crate::auth::{Field, FormMode, FormValues, ValidationErrors};
use crate::ui::components::{Button, Input, LockIcon, MailIcon, UserIcon};

/// Logo shown above the form.
pub const LOGO_PATH: &str = "/static/assets/logo.svg";

/// Logo, form, and the link to the other mode.
#[component]
pub fn AuthPanel(
    mode: FormMode,
    #[prop(optional)] values: FormValues,
    #[prop(optional)] errors: ValidationErrors,
) -> impl IntoView {
    view! {
        <div class="auth">
            <div class="content">
                <img src=LOGO_PATH alt="logo" class="logo"/>
                <AuthFormView mode=mode values=values errors=errors/>
                <p class="text-center text-base-medium">
                    {mode.switch_prompt()}
                    " "
                    <a href={mode.switch_route().path()} class="link">
                        {mode.switch_label()}
                    </a>
                </p>
            </div>
        </div>
    }
}

/// The `<form>` element itself; also the HTMX swap target.
#[component]
pub fn AuthFormView(
    mode: FormMode,
    #[prop(optional)] values: FormValues,
    #[prop(optional)] errors: ValidationErrors,
) -> impl IntoView {
    let action = mode.action();
    let fields = mode
        .fields()
        .iter()
        .map(|&field| {
            // Passwords are never echoed back.
            let value = match field {
                Field::Password => String::new(),
                _ => values.get(field).to_string(),
            };
            let error = errors.get(field).map(str::to_string);
            view! { <FormField mode=mode field=field value=value error=error/> }
        })
        .collect_view();

    view! {
        <form
            id="auth-form"
            class="form"
            data-mode={mode.as_str()}
            method="post"
            action=action
            hx-post=action
            hx-target="this"
            hx-swap="outerHTML"
            hx-sync="this:drop"
            hx-disabled-elt="find button[type='submit']"
        >
            {fields}
            <Button button_type="submit">
                {mode.submit_label()}
            </Button>
        </form>
    }
}

/// One input with its icon and inline error.
#[component]
fn FormField(mode: FormMode, field: Field, value: String, error: Option<String>) -> impl IntoView {
    view! {
        <div class="field" data-field={field.name()}>
            <div class="input">
                <Input
                    input_type={field.input_type()}
                    placeholder={field.placeholder()}
                    name={field.name()}
                    value=value
                    autocomplete={field.autocomplete(mode)}
                />
                <FieldIcon field=field/>
            </div>
            {error.map(|message| view! { <p class="field-error">{message}</p> })}
        </div>
    }
}

#[component]
fn FieldIcon(field: Field) -> impl IntoView {
    match field {
        Field::Username => view! { <UserIcon/> }.into_any(),
        Field::Email => view! { <MailIcon/> }.into_any(),
        Field::Password => view! { <LockIcon/> }.into_any(),
    }
}
