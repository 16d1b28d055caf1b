//! HTTP server: pages, form submissions, static assets.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Form, Router,
    extract::{Request, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;
use crate::auth::http::USER_AGENT;
use crate::auth::{
    AuthForm, FormMode, FormValues, HttpRegistrar, HttpSignIn, SubmitOutcome, ValidationErrors,
};
use crate::config::AppConfig;
use crate::error::Result;
use crate::navigation::{RecordingNavigator, Route};
use crate::notify::{Notification, NotificationQueue};
use crate::ui::pages;

/// Set by HTMX on every request it issues.
pub const HX_REQUEST: HeaderName = HeaderName::from_static("hx-request");
/// Tells HTMX to perform a full client-side redirect.
pub const HX_REDIRECT: HeaderName = HeaderName::from_static("hx-redirect");

/// Build the auth backend clients and serve until shutdown.
pub async fn start_server(config: Arc<AppConfig>) -> Result<()> {
    let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
    let registrar = HttpRegistrar::from_config(client, &config.auth)?;
    let sign_in = HttpSignIn::from_config(&config.auth)?;

    info!(
        name: "auth.backend.configured",
        base_url = %config.auth.base_url,
        register_endpoint = %registrar.endpoint(),
        "Auth backend configured"
    );

    let state = AppState {
        config: Arc::clone(&config),
        sign_in: Arc::new(sign_in),
        registrar: Arc::new(registrar),
    };
    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Routes and middleware, without binding a socket.
pub fn build_router(state: AppState) -> Router {
    // A year stands in for "no timeout" so the layer stack keeps one type.
    let timeout = if state.config.server.timeout_disabled {
        Duration::from_secs(365 * 24 * 60 * 60)
    } else {
        Duration::from_secs(state.config.server.request_timeout_secs)
    };
    let static_dir = state.config.ui.static_dir.clone();

    Router::new()
        .route(Route::Root.path(), get(login_page))
        .route("/login", get(login_page).post(submit_login))
        .route(Route::Register.path(), get(register_page).post(submit_register))
        .route(Route::Chats.path(), get(chats_page))
        .route("/health", get(|| async { "ok" }))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .layer(axum::middleware::from_fn(
            move |req: Request, next: Next| async move {
                match tokio::time::timeout(timeout, next.run(req)).await {
                    Ok(res) => res,
                    Err(_) => (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response(),
                }
            },
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Page Handlers
// ─────────────────────────────────────────────────────────────────────────────

async fn login_page(State(state): State<AppState>) -> Html<String> {
    Html(pages::auth_page(
        &state.config.ui,
        FormMode::Login,
        FormValues::default(),
        ValidationErrors::default(),
        Vec::new(),
    ))
}

async fn register_page(State(state): State<AppState>) -> Html<String> {
    Html(pages::auth_page(
        &state.config.ui,
        FormMode::Register,
        FormValues::default(),
        ValidationErrors::default(),
        Vec::new(),
    ))
}

async fn chats_page(State(state): State<AppState>) -> Html<String> {
    Html(pages::chats_page(&state.config.ui))
}

async fn not_found(State(state): State<AppState>) -> (StatusCode, Html<String>) {
    (
        StatusCode::NOT_FOUND,
        Html(pages::not_found_page(&state.config.ui)),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Form Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// POST /login
async fn submit_login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(values): Form<FormValues>,
) -> Response {
    submit(&state, FormMode::Login, &headers, values).await
}

/// POST /register
async fn submit_register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(values): Form<FormValues>,
) -> Response {
    submit(&state, FormMode::Register, &headers, values).await
}

async fn submit(state: &AppState, mode: FormMode, headers: &HeaderMap, values: FormValues) -> Response {
    let htmx = is_htmx(headers);
    let form = AuthForm::new(
        mode,
        Arc::clone(&state.sign_in),
        Arc::clone(&state.registrar),
    );
    let navigator = RecordingNavigator::new();
    let notifier = NotificationQueue::new();

    match form.submit(&values, &navigator, &notifier).await {
        SubmitOutcome::Navigated { route, session } => {
            let target = navigator.last().unwrap_or(route);
            let cookies = session.map(|s| s.cookies).unwrap_or_default();
            navigate(target, htmx, &cookies)
        }
        SubmitOutcome::Invalid(errors) => form_response(
            state,
            mode,
            values.without_password(),
            errors,
            Vec::new(),
            htmx,
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        SubmitOutcome::Failed(_) => form_response(
            state,
            mode,
            values.without_password(),
            ValidationErrors::default(),
            notifier.drain(),
            htmx,
            StatusCode::OK,
        ),
        // Unreachable with per-request forms.
        SubmitOutcome::Busy => StatusCode::CONFLICT.into_response(),
    }
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get(HX_REQUEST)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Redirect to `route`, forwarding session cookies.
fn navigate(route: Route, htmx: bool, cookies: &[String]) -> Response {
    let mut response = if htmx {
        (StatusCode::OK, [(HX_REDIRECT, route.path())]).into_response()
    } else {
        Redirect::to(route.path()).into_response()
    };
    for cookie in cookies {
        if let Ok(value) = HeaderValue::from_str(cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

/// Re-render the form. HTMX gets the fragment with a 200 so it swaps; plain
/// requests get the whole page with `plain_status`.
fn form_response(
    state: &AppState,
    mode: FormMode,
    values: FormValues,
    errors: ValidationErrors,
    notifications: Vec<Notification>,
    htmx: bool,
    plain_status: StatusCode,
) -> Response {
    if htmx {
        Html(pages::auth_form_fragment(mode, values, errors, notifications)).into_response()
    } else {
        (
            plain_status,
            Html(pages::auth_page(
                &state.config.ui,
                mode,
                values,
                errors,
                notifications,
            )),
        )
            .into_response()
    }
}
