//! Root layout shared by every page.
//!
//! The shell is, in order: [`AppProvider`] (shared context + toaster),
//! [`TopBar`], the page content, [`BottomBar`].

use leptos::prelude::*;

use crate::config::UiConfig;
use crate::navigation::Route;
use crate::notify::Notification;
use crate::ui::components::ChatIcon;

/// Values every component below the provider can read with `use_context`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppContext {
    pub title: String,
    pub description: String,
}

impl From<&UiConfig> for AppContext {
    fn from(ui: &UiConfig) -> Self {
        Self {
            title: ui.title.clone(),
            description: ui.description.clone(),
        }
    }
}

/// Notifications to show on this render.
#[derive(Debug, Clone, Default)]
pub struct Toasts(pub Vec<Notification>);

/// Establishes shared context for descendants and hosts the toaster.
#[component]
pub fn AppProvider(
    /// Application-wide values.
    context: AppContext,
    /// Pending notifications.
    #[prop(optional)]
    notifications: Vec<Notification>,
    /// Provider content.
    children: Children,
) -> impl IntoView {
    provide_context(context);
    provide_context(Toasts(notifications));

    view! {
        <div id="app-shell" class="app-shell">
            {children()}
            <Toaster/>
        </div>
    }
}

/// Page shell: provider, top bar, content, bottom bar.
#[component]
pub fn RootLayout(
    /// Application-wide values.
    context: AppContext,
    /// Pending notifications.
    #[prop(optional)]
    notifications: Vec<Notification>,
    /// Page content.
    children: Children,
) -> impl IntoView {
    view! {
        <AppProvider context=context notifications=notifications>
            <TopBar/>
            <main id="app" class="main">
                {children()}
            </main>
            <BottomBar/>
        </AppProvider>
    }
}

/// Top navigation bar.
#[component]
pub fn TopBar() -> impl IntoView {
    let context = use_context::<AppContext>().unwrap_or_default();

    view! {
        <header class="topbar">
            <a href={Route::Chats.path()} class="brand">
                <ChatIcon class="brand-icon" />
                <span>{context.title}</span>
            </a>
            <nav class="topbar-nav" hx-boost="true">
                <a href={Route::Chats.path()} class="nav-link">"Chats"</a>
            </nav>
        </header>
    }
}

/// Bottom navigation bar.
#[component]
pub fn BottomBar() -> impl IntoView {
    let context = use_context::<AppContext>().unwrap_or_default();

    view! {
        <footer class="bottombar">
            <nav class="bottombar-nav" hx-boost="true">
                <a href={Route::Chats.path()} class="nav-link">
                    <ChatIcon />
                    <span>"Chats"</span>
                </a>
            </nav>
            <p class="bottombar-note">{context.description}</p>
        </footer>
    }
}

/// Region notifications are rendered into.
#[component]
pub fn Toaster() -> impl IntoView {
    let Toasts(notifications) = use_context::<Toasts>().unwrap_or_default();

    view! {
        <div id="toaster" class="toaster" aria-live="polite">
            {notifications
                .into_iter()
                .map(|notification| view! { <Toast notification=notification/> })
                .collect_view()}
        </div>
    }
}

/// A single notification.
#[component]
pub fn Toast(notification: Notification) -> impl IntoView {
    let id = format!("toast-{}", notification.id);
    let classes = format!("toast toast-{}", notification.level.as_str());

    view! {
        <div id=id class=classes role="alert">
            {notification.message}
        </div>
    }
}
