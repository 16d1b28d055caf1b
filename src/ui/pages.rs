//! Full pages and HTMX fragments rendered to HTML strings.

use leptos::prelude::*;
use leptos::reactive::owner::Owner;

use crate::auth::{FormMode, FormValues, ValidationErrors};
use crate::config::UiConfig;
use crate::notify::Notification;
use crate::ui::auth_form::{AuthFormView, AuthPanel};
use crate::ui::components::{Card, CardContent, ChatIcon};
use crate::ui::layout::{AppContext, RootLayout, Toast};

/// Render `view` inside a fresh reactive owner so context lookups resolve.
fn render<V, F>(build: F) -> String
where
    F: FnOnce() -> V,
    V: RenderHtml,
{
    let owner = Owner::new();
    owner.with(|| build().to_html())
}

/// Wrap `body` in the HTML document and root layout.
fn document(
    ui: &UiConfig,
    page_title: &str,
    notifications: Vec<Notification>,
    body: impl FnOnce() -> AnyView + Send + 'static,
) -> String {
    let context = AppContext::from(ui);
    let title = format!("{page_title} - {}", ui.title);
    let description = ui.description.clone();

    let html = render(move || {
        view! {
            <html lang="en">
                <head>
                    <meta charset="utf-8"/>
                    <meta name="viewport" content="width=device-width, initial-scale=1"/>
                    <meta name="description" content=description/>
                    <title>{title}</title>

                    // Local scripts only (no CDN)
                    <script src="/static/vendor/htmx-2.0.8.min.js"></script>
                    <link rel="stylesheet" href="/static/app.css"/>
                </head>
                <body>
                    <RootLayout context=context notifications=notifications>
                        {body()}
                    </RootLayout>
                </body>
            </html>
        }
    });
    format!("<!DOCTYPE html>{html}")
}

/// Login or register page.
pub fn auth_page(
    ui: &UiConfig,
    mode: FormMode,
    values: FormValues,
    errors: ValidationErrors,
    notifications: Vec<Notification>,
) -> String {
    let page_title = match mode {
        FormMode::Login => "Sign In",
        FormMode::Register => "Register",
    };
    document(ui, page_title, notifications, move || {
        view! { <AuthPanel mode=mode values=values errors=errors/> }.into_any()
    })
}

/// Just the `<form>`, plus out-of-band toasts for the `#toaster` region.
pub fn auth_form_fragment(
    mode: FormMode,
    values: FormValues,
    errors: ValidationErrors,
    notifications: Vec<Notification>,
) -> String {
    render(move || {
        let toasts = (!notifications.is_empty()).then(|| {
            view! {
                <div hx-swap-oob="beforeend:#toaster">
                    {notifications
                        .into_iter()
                        .map(|notification| view! { <Toast notification=notification/> })
                        .collect_view()}
                </div>
            }
        });
        view! {
            <AuthFormView mode=mode values=values errors=errors/>
            {toasts}
        }
    })
}

/// Chat listing, the landing page after sign-in.
pub fn chats_page(ui: &UiConfig) -> String {
    document(ui, "Chats", Vec::new(), || {
        view! {
            <section class="chat-list">
                <Card>
                    <CardContent class="empty-state">
                        <ChatIcon class="empty-state-icon" />
                        <p>"No chats yet"</p>
                    </CardContent>
                </Card>
            </section>
        }
        .into_any()
    })
}

/// 404 page.
pub fn not_found_page(ui: &UiConfig) -> String {
    document(ui, "Not Found", Vec::new(), || {
        view! {
            <section class="not-found">
                <h1>"404"</h1>
                <p>"Page not found"</p>
                <a href="/" class="link">"Go Home"</a>
            </section>
        }
        .into_any()
    })
}
