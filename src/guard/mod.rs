//! Navigation route table and auth guard.
//!
//! The guard is evaluated per navigation attempt and keeps no state of
//! its own. It always re-syncs the session from storage first, so an
//! expiry or a logout in another tab is picked up before the checks
//! run. The auth check precedes the admin check: an unauthenticated
//! request for an admin route redirects to login (carrying the intended
//! path), never to home.

use crate::auth::Session;

/// A route definition with its guard metadata.
#[derive(Debug, Clone)]
pub struct Route {
    pub name: &'static str,
    /// Path pattern; `:segment` matches any single path segment.
    pub pattern: &'static str,
    pub requires_auth: bool,
    pub requires_admin: bool,
}

impl Route {
    const fn public(name: &'static str, pattern: &'static str) -> Self {
        Self {
            name,
            pattern,
            requires_auth: false,
            requires_admin: false,
        }
    }

    const fn authed(name: &'static str, pattern: &'static str) -> Self {
        Self {
            name,
            pattern,
            requires_auth: true,
            requires_admin: false,
        }
    }

    const fn admin(name: &'static str, pattern: &'static str) -> Self {
        Self {
            name,
            pattern,
            requires_auth: true,
            requires_admin: true,
        }
    }

    /// Match a concrete path (no query string) against the pattern.
    fn matches(&self, path: &str) -> bool {
        let mut pattern_segments = self.pattern.trim_matches('/').split('/');
        let mut path_segments = path.trim_matches('/').split('/');
        loop {
            match (pattern_segments.next(), path_segments.next()) {
                (None, None) => return true,
                (Some(pattern), Some(segment)) => {
                    if !pattern.starts_with(':') && pattern != segment {
                        return false;
                    }
                    if pattern.starts_with(':') && segment.is_empty() {
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }
}

/// The application's route table.
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// The rental app's routes: public catalog and auth pages, authed
    /// user-center and order pages, admin management pages.
    pub fn default_table() -> Self {
        Self::new(vec![
            Route::public("home", "/"),
            Route::public("vehicles", "/vehicles"),
            Route::public("vehicle-detail", "/vehicles/:id"),
            Route::public("login", "/login"),
            Route::public("register", "/register"),
            Route::authed("user-center", "/user"),
            Route::authed("orders", "/orders"),
            Route::authed("order-detail", "/order/:id"),
            Route::admin("admin-dashboard", "/admin"),
            Route::admin("admin-vehicles", "/admin/vehicles"),
            Route::admin("admin-orders", "/admin/orders"),
        ])
    }

    /// Resolve a path (without query string) to its route.
    pub fn resolve(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.matches(path))
    }
}

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Navigation may proceed to the target.
    Proceed,
    /// Not logged in on a protected route; `redirect` is the intended
    /// full path, to be carried as a query parameter.
    RedirectToLogin { redirect: String },
    /// Logged in but not privileged for an admin route.
    RedirectToHome,
}

/// Navigation interceptor enforcing auth/admin requirements.
pub struct RouteGuard {
    login_path: String,
    home_path: String,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            home_path: "/".to_string(),
        }
    }
}

impl RouteGuard {
    pub fn new(login_path: impl Into<String>, home_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
            home_path: home_path.into(),
        }
    }

    /// Evaluate a navigation attempt.
    ///
    /// `full_path` is the requested path including any query string;
    /// it is preserved verbatim in a login redirect. Paths not in the
    /// table proceed — unknown routes are the router's 404 problem,
    /// not an auth concern.
    pub fn check(&self, session: &Session, table: &RouteTable, full_path: &str) -> GuardDecision {
        session.sync_from_storage();

        let path = full_path.split('?').next().unwrap_or(full_path);
        let Some(route) = table.resolve(path) else {
            return GuardDecision::Proceed;
        };

        if route.requires_auth && !session.is_logged_in() {
            tracing::debug!(route = route.name, "Unauthenticated, redirecting to login");
            return GuardDecision::RedirectToLogin {
                redirect: full_path.to_string(),
            };
        }

        if route.requires_admin && !session.is_admin() {
            tracing::debug!(route = route.name, "Not an admin, redirecting home");
            return GuardDecision::RedirectToHome;
        }

        GuardDecision::Proceed
    }

    /// The concrete location a decision redirects to, if any. Login
    /// redirects carry the intended path urlencoded in the `redirect`
    /// query parameter.
    pub fn location_for(&self, decision: &GuardDecision) -> Option<String> {
        match decision {
            GuardDecision::Proceed => None,
            GuardDecision::RedirectToLogin { redirect } => Some(format!(
                "{}?redirect={}",
                self.login_path,
                urlencoding::encode(redirect)
            )),
            GuardDecision::RedirectToHome => Some(self.home_path.clone()),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
