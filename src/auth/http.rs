//! HTTP implementations of the auth capabilities.
//!
//! Both clients talk to the external auth backend configured under `auth`.
//! Calls are made once: no retries and no per-call timeout.

use async_trait::async_trait;
use reqwest::header::{LOCATION, SET_COOKIE};
use reqwest::redirect::Policy;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::model::{Credentials, RegistrationData};
use super::provider::{AuthError, Registrar, Session, SignIn, SignInOptions};
use crate::config::AuthConfig;

/// `User-Agent` sent with every backend call.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Posts registration data as JSON to the registration endpoint.
#[derive(Debug, Clone)]
pub struct HttpRegistrar {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpRegistrar {
    pub fn new(client: reqwest::Client, base_url: &str, path: &str) -> Result<Self, AuthError> {
        let endpoint = Url::parse(base_url)?.join(path)?;
        Ok(Self { client, endpoint })
    }

    pub fn from_config(client: reqwest::Client, config: &AuthConfig) -> Result<Self, AuthError> {
        Self::new(client, &config.base_url, &config.register_path)
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Registrar for HttpRegistrar {
    async fn register(&self, data: &RegistrationData) -> Result<(), AuthError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(data)
            .send()
            .await?;

        let status = response.status();
        debug!(
            name: "auth.register.response",
            status = status.as_u16(),
            "Registration endpoint responded"
        );

        if status.is_success() {
            Ok(())
        } else {
            Err(AuthError::Rejected {
                status: status.as_u16(),
            })
        }
    }
}

/// Body sent to the credential callback.
#[derive(Debug, Serialize)]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    redirect: bool,
}

/// JSON reply of the credential callback. Every field is optional.
#[derive(Debug, Default, Deserialize)]
struct SignInResponse {
    #[serde(default)]
    ok: Option<bool>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Signs in against `{base_url}{sign_in_path}/{provider}`.
///
/// Owns a client that never follows redirects: a 3xx reply from the callback
/// is the answer itself, and its cookies must reach the browser.
#[derive(Debug, Clone)]
pub struct HttpSignIn {
    client: reqwest::Client,
    base_url: Url,
    sign_in_path: String,
}

impl HttpSignIn {
    pub fn new(base_url: &str, sign_in_path: &str) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
            sign_in_path: sign_in_path.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        Self::new(&config.base_url, &config.sign_in_path)
    }

    /// Endpoint for `provider`.
    pub fn endpoint(&self, provider: &str) -> Result<Url, AuthError> {
        Ok(self
            .base_url
            .join(&format!("{}/{provider}", self.sign_in_path))?)
    }

    /// `error` query parameter of a redirect target, if any.
    fn redirect_error(&self, location: &str) -> Option<String> {
        self.base_url
            .join(location)
            .ok()?
            .query_pairs()
            .find(|(key, _)| key == "error")
            .map(|(_, value)| value.into_owned())
    }
}

#[async_trait]
impl SignIn for HttpSignIn {
    async fn sign_in(
        &self,
        provider: &str,
        credentials: &Credentials,
        options: SignInOptions,
    ) -> Result<Session, AuthError> {
        let request = SignInRequest {
            email: &credentials.email,
            password: &credentials.password,
            redirect: options.redirect,
        };

        let response = self
            .client
            .post(self.endpoint(provider)?)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let cookies: Vec<String> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect();

        if status.is_redirection() {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            debug!(
                name: "auth.sign_in.redirected",
                provider = %provider,
                status = status.as_u16(),
                location = ?location,
                "Sign-in provider redirected"
            );
            if let Some(error) = location.as_deref().and_then(|l| self.redirect_error(l)) {
                return Err(AuthError::InvalidCredentials(error));
            }
            return Ok(Session {
                cookies,
                url: location,
            });
        }

        let bytes = response.bytes().await?;
        let body: SignInResponse = if bytes.iter().all(u8::is_ascii_whitespace) {
            SignInResponse::default()
        } else {
            match serde_json::from_slice(&bytes) {
                Ok(body) => body,
                // Error pages are rarely JSON; the status decides below.
                Err(_) if !status.is_success() => SignInResponse::default(),
                Err(e) => return Err(AuthError::Decode(e.to_string())),
            }
        };

        debug!(
            name: "auth.sign_in.response",
            provider = %provider,
            status = status.as_u16(),
            has_error = body.error.is_some(),
            "Sign-in provider responded"
        );

        if let Some(error) = body.error {
            return Err(AuthError::InvalidCredentials(error));
        }
        if !status.is_success() {
            return Err(AuthError::Rejected {
                status: status.as_u16(),
            });
        }
        if body.ok == Some(false) {
            return Err(AuthError::InvalidCredentials(
                "provider reported failure".to_string(),
            ));
        }

        Ok(Session {
            cookies,
            url: body.url,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json, Router,
        http::{HeaderMap, StatusCode, header},
        response::{Html, IntoResponse},
        routing::{get, post},
    };
    use serde_json::{Value, json};

    use super::*;

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn registration() -> RegistrationData {
        RegistrationData {
            username: "carol".into(),
            email: "carol@example.com".into(),
            password: "pa$$word".into(),
        }
    }

    fn credentials() -> Credentials {
        Credentials {
            email: "carol@example.com".into(),
            password: "pa$$word".into(),
        }
    }

    #[tokio::test]
    async fn test_register_posts_json_body() {
        let seen: Arc<Mutex<Vec<(Option<String>, Value)>>> = Arc::default();
        let captured = Arc::clone(&seen);
        let router = Router::new().route(
            "/api/auth/register",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let captured = Arc::clone(&captured);
                async move {
                    let content_type = headers
                        .get(header::CONTENT_TYPE)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    captured.lock().unwrap().push((content_type, body));
                    StatusCode::CREATED
                }
            }),
        );
        let base = spawn_stub(router).await;

        let registrar =
            HttpRegistrar::new(reqwest::Client::new(), &base, "/api/auth/register").unwrap();
        registrar.register(&registration()).await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0.as_deref(), Some("application/json"));
        assert_eq!(
            seen[0].1,
            json!({"username": "carol", "email": "carol@example.com", "password": "pa$$word"})
        );
    }

    #[tokio::test]
    async fn test_register_maps_error_status() {
        let router = Router::new().route(
            "/api/auth/register",
            post(|| async { (StatusCode::BAD_REQUEST, "User already exists") }),
        );
        let base = spawn_stub(router).await;

        let registrar =
            HttpRegistrar::new(reqwest::Client::new(), &base, "/api/auth/register").unwrap();
        let err = registrar.register(&registration()).await.unwrap_err();
        assert!(matches!(err, AuthError::Rejected { status: 400 }));
    }

    #[tokio::test]
    async fn test_register_unreachable_backend_is_transport_error() {
        // Bind then drop to get a port nobody listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let registrar = HttpRegistrar::new(
            reqwest::Client::new(),
            &format!("http://{addr}"),
            "/api/auth/register",
        )
        .unwrap();
        let err = registrar.register(&registration()).await.unwrap_err();
        assert!(matches!(err, AuthError::Transport(_)));
    }

    #[tokio::test]
    async fn test_sign_in_success_captures_cookies() {
        let seen: Arc<Mutex<Option<Value>>> = Arc::default();
        let captured = Arc::clone(&seen);
        let router = Router::new().route(
            "/api/auth/callback/credentials",
            post(move |Json(body): Json<Value>| {
                let captured = Arc::clone(&captured);
                async move {
                    *captured.lock().unwrap() = Some(body);
                    (
                        [(header::SET_COOKIE, "session-token=abc; Path=/; HttpOnly")],
                        Json(json!({"ok": true, "error": null, "status": 200, "url": "/chats"})),
                    )
                        .into_response()
                }
            }),
        );
        let base = spawn_stub(router).await;

        let sign_in = HttpSignIn::new(&base, "/api/auth/callback/").unwrap();
        let session = sign_in
            .sign_in(
                "credentials",
                &credentials(),
                SignInOptions { redirect: false },
            )
            .await
            .unwrap();

        assert_eq!(session.cookies, vec!["session-token=abc; Path=/; HttpOnly"]);
        assert_eq!(session.url.as_deref(), Some("/chats"));
        assert_eq!(
            seen.lock().unwrap().clone().unwrap(),
            json!({"email": "carol@example.com", "password": "pa$$word", "redirect": false})
        );
    }

    #[tokio::test]
    async fn test_sign_in_error_field_means_invalid_credentials() {
        let router = Router::new().route(
            "/api/auth/callback/credentials",
            post(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"ok": false, "error": "CredentialsSignin", "status": 401})),
                )
            }),
        );
        let base = spawn_stub(router).await;

        let sign_in = HttpSignIn::new(&base, "/api/auth/callback").unwrap();
        let err = sign_in
            .sign_in("credentials", &credentials(), SignInOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials(ref e) if e == "CredentialsSignin"));
    }

    #[tokio::test]
    async fn test_sign_in_empty_error_status_is_rejected() {
        let router = Router::new().route(
            "/api/auth/callback/credentials",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let base = spawn_stub(router).await;

        let sign_in = HttpSignIn::new(&base, "/api/auth/callback").unwrap();
        let err = sign_in
            .sign_in("credentials", &credentials(), SignInOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Rejected { status: 500 }));
    }

    #[tokio::test]
    async fn test_sign_in_redirect_is_not_followed() {
        let router = Router::new()
            .route(
                "/api/auth/callback/credentials",
                post(|| async {
                    (
                        StatusCode::FOUND,
                        [
                            (header::LOCATION, "/chats"),
                            (header::SET_COOKIE, "session-token=abc; Path=/; HttpOnly"),
                        ],
                    )
                }),
            )
            .route("/chats", get(|| async { Html("<html>chats</html>") }));
        let base = spawn_stub(router).await;

        let sign_in = HttpSignIn::new(&base, "/api/auth/callback").unwrap();
        let session = sign_in
            .sign_in(
                "credentials",
                &credentials(),
                SignInOptions { redirect: false },
            )
            .await
            .unwrap();

        assert_eq!(session.cookies, vec!["session-token=abc; Path=/; HttpOnly"]);
        assert_eq!(session.url.as_deref(), Some("/chats"));
    }

    #[tokio::test]
    async fn test_sign_in_redirect_to_error_page_is_invalid_credentials() {
        let router = Router::new().route(
            "/api/auth/callback/credentials",
            post(|| async {
                (
                    StatusCode::FOUND,
                    [(header::LOCATION, "/api/auth/error?error=CredentialsSignin")],
                )
            }),
        );
        let base = spawn_stub(router).await;

        let sign_in = HttpSignIn::new(&base, "/api/auth/callback").unwrap();
        let err = sign_in
            .sign_in("credentials", &credentials(), SignInOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials(ref e) if e == "CredentialsSignin"));
    }

    #[tokio::test]
    async fn test_sign_in_ok_false_without_error_is_refused() {
        let router = Router::new().route(
            "/api/auth/callback/credentials",
            post(|| async { Json(json!({"ok": false, "status": 200})) }),
        );
        let base = spawn_stub(router).await;

        let sign_in = HttpSignIn::new(&base, "/api/auth/callback").unwrap();
        let err = sign_in
            .sign_in("credentials", &credentials(), SignInOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials(_)));
    }

    #[tokio::test]
    async fn test_sign_in_blank_success_body_is_a_session() {
        let router = Router::new().route(
            "/api/auth/callback/credentials",
            post(|| async {
                (
                    [(header::SET_COOKIE, "session-token=def; Path=/")],
                    " \n",
                )
            }),
        );
        let base = spawn_stub(router).await;

        let sign_in = HttpSignIn::new(&base, "/api/auth/callback").unwrap();
        let session = sign_in
            .sign_in("credentials", &credentials(), SignInOptions::default())
            .await
            .unwrap();
        assert_eq!(session.cookies, vec!["session-token=def; Path=/"]);
        assert_eq!(session.url, None);
    }

    #[test]
    fn test_endpoint_joins_provider() {
        let sign_in = HttpSignIn::new("http://auth.local:4000", "/api/auth/callback").unwrap();
        assert_eq!(
            sign_in.endpoint("credentials").unwrap().as_str(),
            "http://auth.local:4000/api/auth/callback/credentials"
        );
    }
}
