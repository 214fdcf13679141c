//! Application state for Brain Mobile
//!
//! This crate holds the client-side state the session reconciler drives:
//! the in-memory session, the course selection, the main menu, and cached
//! backend query results. Everything here is plain data with synchronous
//! transitions; the async orchestration lives in `app-core`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod course;
pub mod menu;
pub mod mutation;
pub mod query;
pub mod session;

pub use course::{CourseSelection, SelectAttempt};
pub use menu::{BackAction, MenuState};
pub use mutation::{MutationKind, MutationState};
pub use query::{QueryCache, QueryEntry, QueryKey, QueryState};
pub use session::Session;

use serde::{Deserialize, Serialize};

/// Complete client state, owned by a single controller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// Current identity
    pub session: Session,
    /// Selected course
    pub course: CourseSelection,
    /// Main menu visibility
    pub menu: MenuState,
    /// Cached backend reads
    pub queries: QueryCache,
}

impl AppState {
    /// Reset everything tied to the signed-in user, keeping the course list
    pub fn sign_out(&mut self) {
        self.session.clear();
        self.course.clear();
        self.menu.close();
        self.queries.current_user.reset();
        self.queries.user_details.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brain_api::{Course, UserRecord};

    #[test]
    fn test_sign_out_keeps_courses() {
        let mut state = AppState::default();
        state.session.replace(UserRecord {
            id: "u1".to_string(),
            current_access_token: Some("tok".to_string()),
            ..Default::default()
        });
        state.course.try_select(&Course::new("c1"));
        state.menu.open();
        state.queries.courses.resolve(vec![Course::new("c1")]);

        state.sign_out();

        assert!(!state.session.has_user());
        assert!(!state.course.is_selected());
        assert!(state.course.selector_enabled());
        assert!(!state.menu.is_open());
        assert!(state.queries.course("c1").is_some());
    }

    #[test]
    fn test_state_serializes() {
        let state = AppState::default();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["menu"], "Closed");
    }
}
