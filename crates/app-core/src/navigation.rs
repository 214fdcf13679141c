//! Routes and the navigation handle

use serde::{Deserialize, Serialize};
use std::fmt;

/// Screens the reconciler can send the user to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    /// Authenticated landing screen
    Home,
    /// First-run introduction
    Intro,
    /// Backend unreachable
    NoInternet,
}

impl Route {
    /// Path pushed onto the history stack
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Intro => "/intro",
            Route::NoInternet => "/nointernet",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// History handle provided by the host platform
pub trait Navigator: Send + Sync {
    /// Push a route onto the history stack
    fn push(&self, route: Route);

    /// Terminate the application
    fn exit_app(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(Route::Home.path(), "/");
        assert_eq!(Route::Intro.path(), "/intro");
        assert_eq!(Route::NoInternet.path(), "/nointernet");
    }

    #[test]
    fn test_display() {
        assert_eq!(Route::NoInternet.to_string(), "/nointernet");
        assert_eq!(Route::Home.to_string(), "/");
    }
}
