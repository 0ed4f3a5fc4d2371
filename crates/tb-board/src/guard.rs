//! Navigation guard in front of the board.

use std::fmt;

use tb_core::identity::UserIdentity;

/// Screens of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
}

impl Route {
    /// Match a path. Unknown paths have no route.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "/login" => Some(Self::Login),
            "/dashboard" => Some(Self::Dashboard),
            _ => None,
        }
    }

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
        }
    }

    /// Whether the route requires a signed-in user.
    #[must_use]
    pub const fn is_protected(self) -> bool {
        matches!(self, Self::Dashboard)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Decision for a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
}

/// Decide whether `route` may render for `current_user`.
///
/// Stateless: consult it on every entry to a protected route.
#[must_use]
pub fn guard(route: Route, current_user: Option<&UserIdentity>) -> Navigation {
    if route.is_protected() && current_user.is_none() {
        tracing::debug!(%route, "redirecting unauthenticated request to login");
        return Navigation::Redirect(Route::Login);
    }
    Navigation::Render(route)
}

/// Resolve a raw path. Unknown paths redirect to login.
#[must_use]
pub fn navigate(path: &str, current_user: Option<&UserIdentity>) -> Navigation {
    Route::from_path(path).map_or(Navigation::Redirect(Route::Login), |route| {
        guard(route, current_user)
    })
}
