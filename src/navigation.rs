//! Client-side navigation targets and the capability used to reach them.

use std::fmt;
use std::sync::Mutex;

/// Routes the auth flow links or navigates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Login page.
    Root,
    /// Registration page.
    Register,
    /// Chat listing.
    Chats,
}

impl Route {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Root => "/",
            Self::Register => "/register",
            Self::Chats => "/chats",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Something that can move the user to another route.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that remembers the requested routes.
///
/// Request handlers turn the recorded route into a redirect response once the
/// submission has finished.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All routes navigated to, oldest first.
    #[must_use]
    pub fn routes(&self) -> Vec<Route> {
        self.routes
            .lock()
            .map(|routes| routes.clone())
            .unwrap_or_default()
    }

    /// The most recent route, if any.
    #[must_use]
    pub fn last(&self) -> Option<Route> {
        self.routes().last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        if let Ok(mut routes) = self.routes.lock() {
            routes.push(route);
        }
    }
}
