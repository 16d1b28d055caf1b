//! Submission flow of the dual-mode auth form.
//!
//! ```text
//! submit ─▶ validate ─┬─ errors ─▶ Invalid
//!                     └─ ok ─▶ mode ─┬─ register ─▶ registrar ─┬─ ok  ─▶ navigate("/")
//!                                    │                         └─ err ─▶ notify
//!                                    └─ login ────▶ sign in ───┬─ ok  ─▶ navigate("/chats")
//!                                                              └─ err ─▶ notify
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use super::model::{FormMode, FormValues};
use super::provider::{CREDENTIALS_PROVIDER, Registrar, Session, SignIn, SignInOptions};
use super::validation::{ValidationErrors, validate};
use crate::navigation::{Navigator, Route};
use crate::notify::{Notification, Notifier};

/// Result of one submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Invalid(ValidationErrors),
    /// The backend accepted the submission and the user was navigated away.
    Navigated {
        route: Route,
        /// Present for sign-ins.
        session: Option<Session>,
    },
    /// The backend refused or could not be reached; a notification was shown.
    Failed(Notification),
    /// Another submission on this form is still running.
    Busy,
}

/// The auth form controller.
///
/// One instance corresponds to one rendered form. The sign-in and registration
/// capabilities are injected; navigation and notification sinks are passed per
/// submission.
pub struct AuthForm {
    mode: FormMode,
    sign_in: Arc<dyn SignIn>,
    registrar: Arc<dyn Registrar>,
    in_flight: AtomicBool,
}

impl std::fmt::Debug for AuthForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthForm")
            .field("mode", &self.mode)
            .field("in_flight", &self.in_flight.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Clears the in-flight flag when the submission ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl AuthForm {
    pub fn new(mode: FormMode, sign_in: Arc<dyn SignIn>, registrar: Arc<dyn Registrar>) -> Self {
        Self {
            mode,
            sign_in,
            registrar,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether a submission is currently running.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run validation only.
    #[must_use]
    pub fn validate(&self, values: &FormValues) -> ValidationErrors {
        validate(self.mode, values)
    }

    /// Validate `values` and, if they pass, send them to the backend.
    ///
    /// On success `navigator` is called exactly once; on failure `notifier` is
    /// called exactly once. Neither is called when validation fails.
    pub async fn submit(
        &self,
        values: &FormValues,
        navigator: &dyn Navigator,
        notifier: &dyn Notifier,
    ) -> SubmitOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(name: "auth.submit.busy", mode = %self.mode, "Submission already in flight");
            return SubmitOutcome::Busy;
        }
        let _guard = InFlightGuard(&self.in_flight);

        let errors = self.validate(values);
        if !errors.is_empty() {
            debug!(
                name: "auth.submit.invalid",
                mode = %self.mode,
                fields = errors.len(),
                "Form validation failed"
            );
            return SubmitOutcome::Invalid(errors);
        }

        let result = match self.mode {
            FormMode::Register => self
                .registrar
                .register(&values.registration())
                .await
                .map(|()| None),
            FormMode::Login => self
                .sign_in
                .sign_in(
                    CREDENTIALS_PROVIDER,
                    &values.credentials(),
                    SignInOptions { redirect: false },
                )
                .await
                .map(Some),
        };

        match result {
            Ok(session) => {
                let route = self.mode.success_route();
                info!(
                    name: "auth.submit.succeeded",
                    mode = %self.mode,
                    route = %route,
                    provider_url = ?session.as_ref().and_then(|s| s.url.as_deref()),
                    "Auth submission succeeded"
                );
                navigator.navigate(route);
                SubmitOutcome::Navigated { route, session }
            }
            Err(e) => {
                warn!(
                    name: "auth.submit.failed",
                    mode = %self.mode,
                    error = %e,
                    "Auth submission failed"
                );
                let notification = Notification::error(self.mode.failure_message());
                notifier.notify(notification.clone());
                SubmitOutcome::Failed(notification)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::auth::model::{Credentials, Field, RegistrationData};
    use crate::auth::provider::AuthError;
    use crate::auth::validation::USERNAME_TOO_SHORT;
    use crate::navigation::RecordingNavigator;
    use crate::notify::NotificationQueue;

    #[derive(Default)]
    struct StubSignIn {
        fail: bool,
        calls: Mutex<Vec<(String, Credentials, SignInOptions)>>,
    }

    #[async_trait]
    impl SignIn for StubSignIn {
        async fn sign_in(
            &self,
            provider: &str,
            credentials: &Credentials,
            options: SignInOptions,
        ) -> Result<Session, AuthError> {
            self.calls
                .lock()
                .unwrap()
                .push((provider.to_string(), credentials.clone(), options));
            if self.fail {
                Err(AuthError::InvalidCredentials("CredentialsSignin".into()))
            } else {
                Ok(Session {
                    cookies: vec!["token=1".into()],
                    url: None,
                })
            }
        }
    }

    #[derive(Default)]
    struct StubRegistrar {
        fail: bool,
        calls: Mutex<Vec<RegistrationData>>,
    }

    #[async_trait]
    impl Registrar for StubRegistrar {
        async fn register(&self, data: &RegistrationData) -> Result<(), AuthError> {
            self.calls.lock().unwrap().push(data.clone());
            if self.fail {
                Err(AuthError::Rejected { status: 400 })
            } else {
                Ok(())
            }
        }
    }

    /// Registrar that blocks until released.
    struct GatedRegistrar {
        release: Arc<Notify>,
        started: Arc<Notify>,
    }

    #[async_trait]
    impl Registrar for GatedRegistrar {
        async fn register(&self, _data: &RegistrationData) -> Result<(), AuthError> {
            self.started.notify_one();
            self.release.notified().await;
            Ok(())
        }
    }

    fn register_values() -> FormValues {
        FormValues {
            username: Some("dave".into()),
            email: "dave@example.com".into(),
            password: "hello!".into(),
        }
    }

    fn login_values() -> FormValues {
        FormValues {
            username: None,
            email: "dave@example.com".into(),
            password: "hello!".into(),
        }
    }

    fn form(
        mode: FormMode,
        sign_in: &Arc<StubSignIn>,
        registrar: &Arc<StubRegistrar>,
    ) -> AuthForm {
        AuthForm::new(
            mode,
            Arc::clone(sign_in) as Arc<dyn SignIn>,
            Arc::clone(registrar) as Arc<dyn Registrar>,
        )
    }

    #[tokio::test]
    async fn test_register_success_navigates_home_once() {
        let sign_in = Arc::new(StubSignIn::default());
        let registrar = Arc::new(StubRegistrar::default());
        let form = form(FormMode::Register, &sign_in, &registrar);
        let nav = RecordingNavigator::new();
        let toasts = NotificationQueue::new();

        let outcome = form.submit(&register_values(), &nav, &toasts).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Navigated {
                route: Route::Root,
                session: None
            }
        );
        assert_eq!(nav.routes(), vec![Route::Root]);
        assert!(toasts.is_empty());
        assert_eq!(registrar.calls.lock().unwrap().len(), 1);
        assert_eq!(
            registrar.calls.lock().unwrap()[0],
            register_values().registration()
        );
        assert!(sign_in.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_failure_notifies_without_navigation() {
        let sign_in = Arc::new(StubSignIn::default());
        let registrar = Arc::new(StubRegistrar {
            fail: true,
            ..Default::default()
        });
        let form = form(FormMode::Register, &sign_in, &registrar);
        let nav = RecordingNavigator::new();
        let toasts = NotificationQueue::new();

        let outcome = form.submit(&register_values(), &nav, &toasts).await;

        assert!(matches!(outcome, SubmitOutcome::Failed(ref n) if n.message == "Something went wrong"));
        assert!(nav.routes().is_empty());
        let shown = toasts.drain();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].message, "Something went wrong");
    }

    #[tokio::test]
    async fn test_login_success_navigates_to_chats_without_redirect() {
        let sign_in = Arc::new(StubSignIn::default());
        let registrar = Arc::new(StubRegistrar::default());
        let form = form(FormMode::Login, &sign_in, &registrar);
        let nav = RecordingNavigator::new();
        let toasts = NotificationQueue::new();

        let outcome = form.submit(&login_values(), &nav, &toasts).await;

        match outcome {
            SubmitOutcome::Navigated { route, session } => {
                assert_eq!(route, Route::Chats);
                assert_eq!(session.unwrap().cookies, vec!["token=1".to_string()]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(nav.routes(), vec![Route::Chats]);
        assert!(toasts.is_empty());

        let calls = sign_in.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "credentials");
        assert_eq!(calls[0].1, login_values().credentials());
        assert!(!calls[0].2.redirect);
        assert!(registrar.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_login_failure_notifies_invalid_credentials() {
        let sign_in = Arc::new(StubSignIn {
            fail: true,
            ..Default::default()
        });
        let registrar = Arc::new(StubRegistrar::default());
        let form = form(FormMode::Login, &sign_in, &registrar);
        let nav = RecordingNavigator::new();
        let toasts = NotificationQueue::new();

        form.submit(&login_values(), &nav, &toasts).await;

        assert!(nav.routes().is_empty());
        let shown = toasts.drain();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].message, "Invalid email or password");
    }

    #[tokio::test]
    async fn test_invalid_values_make_no_calls() {
        let sign_in = Arc::new(StubSignIn::default());
        let registrar = Arc::new(StubRegistrar::default());
        let form = form(FormMode::Register, &sign_in, &registrar);
        let nav = RecordingNavigator::new();
        let toasts = NotificationQueue::new();

        let mut values = register_values();
        values.username = Some("ab".into());
        let outcome = form.submit(&values, &nav, &toasts).await;

        match outcome {
            SubmitOutcome::Invalid(errors) => {
                assert_eq!(errors.get(Field::Username), Some(USERNAME_TOO_SHORT));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(registrar.calls.lock().unwrap().is_empty());
        assert!(nav.routes().is_empty());
        assert!(toasts.is_empty());
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn test_login_mode_accepts_short_username() {
        let sign_in = Arc::new(StubSignIn::default());
        let registrar = Arc::new(StubRegistrar::default());
        let form = form(FormMode::Login, &sign_in, &registrar);

        let mut values = login_values();
        values.username = Some("x".into());
        assert!(form.validate(&values).is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_submission_is_refused() {
        let release = Arc::new(Notify::new());
        let started = Arc::new(Notify::new());
        let registrar = Arc::new(GatedRegistrar {
            release: Arc::clone(&release),
            started: Arc::clone(&started),
        });
        let form = Arc::new(AuthForm::new(
            FormMode::Register,
            Arc::new(StubSignIn::default()),
            registrar,
        ));

        let first = {
            let form = Arc::clone(&form);
            tokio::spawn(async move {
                let nav = RecordingNavigator::new();
                let toasts = NotificationQueue::new();
                form.submit(&register_values(), &nav, &toasts).await
            })
        };
        started.notified().await;
        assert!(form.is_submitting());

        let nav = RecordingNavigator::new();
        let toasts = NotificationQueue::new();
        let second = form.submit(&register_values(), &nav, &toasts).await;
        assert_eq!(second, SubmitOutcome::Busy);
        assert!(nav.routes().is_empty());

        release.notify_one();
        let first = first.await.unwrap();
        assert!(matches!(first, SubmitOutcome::Navigated { route: Route::Root, .. }));
        assert!(!form.is_submitting());
    }
}
