//! Course selection
//!
//! At most one course is selected at a time. The check-and-set in
//! [`CourseSelection::try_select`] is what keeps a second selection from being
//! committed while the first is still in flight.

use brain_api::Course;
use serde::{Deserialize, Serialize};

use crate::mutation::MutationState;

/// Result of asking to select a course
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAttempt {
    /// The course is now optimistically selected
    Accepted,
    /// Another (or the same) course is already selected
    AlreadySelected,
    /// The course or the selector is disabled
    Disabled,
}

/// The user's active course
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSelection {
    /// Id of the selected course
    pub selected_course_id: Option<String>,
    /// Theme color of the selected course
    pub color: Option<String>,
    /// Status of the backend commit for the current selection
    pub commit: MutationState,
    selector_disabled: bool,
}

impl CourseSelection {
    /// Whether a course is selected
    pub fn is_selected(&self) -> bool {
        self.selected_course_id.is_some()
    }

    /// Whether the course selector accepts input
    pub fn selector_enabled(&self) -> bool {
        !self.selector_disabled
    }

    /// Optimistically select `course` unless something is already selected
    pub fn try_select(&mut self, course: &Course) -> SelectAttempt {
        if self.is_selected() {
            return SelectAttempt::AlreadySelected;
        }
        if course.is_disabled || self.selector_disabled {
            return SelectAttempt::Disabled;
        }

        self.selected_course_id = Some(course.id.clone());
        self.color = course.color.clone();
        self.commit = MutationState::Pending;
        self.selector_disabled = true;
        tracing::debug!(course_id = %course.id, "course selected optimistically");

        SelectAttempt::Accepted
    }

    /// Mark the selection of `course_id` as committed by the backend
    ///
    /// Returns `false` when the selection was cleared or replaced while the
    /// commit was in flight; the current selection is left untouched.
    pub fn confirm(&mut self, course_id: &str) -> bool {
        if self.selected_course_id.as_deref() != Some(course_id) {
            tracing::debug!(course_id, "selection changed before commit landed");
            return false;
        }
        self.commit = MutationState::Success;
        true
    }

    /// Undo an optimistic selection of `course_id` after the backend refused it
    pub fn roll_back(&mut self, course_id: &str) {
        if self.selected_course_id.as_deref() == Some(course_id) {
            self.selected_course_id = None;
            self.color = None;
            self.selector_disabled = false;
        }
        self.commit = MutationState::Error;
        tracing::debug!(course_id, "course selection rolled back");
    }

    /// Clear the selection and re-enable the selector
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_is_exclusive() {
        let mut selection = CourseSelection::default();
        let spanish = Course::new("c1").with_color("#62c46c");

        assert_eq!(selection.try_select(&spanish), SelectAttempt::Accepted);
        assert_eq!(selection.selected_course_id.as_deref(), Some("c1"));
        assert_eq!(selection.color.as_deref(), Some("#62c46c"));
        assert!(selection.commit.is_pending());
        assert!(!selection.selector_enabled());

        let attempt = selection.try_select(&spanish);
        assert_eq!(attempt, SelectAttempt::AlreadySelected);
        let attempt = selection.try_select(&Course::new("c2"));
        assert_eq!(attempt, SelectAttempt::AlreadySelected);
        assert_eq!(selection.selected_course_id.as_deref(), Some("c1"));
    }

    #[test]
    fn test_disabled_course_rejected() {
        let mut selection = CourseSelection::default();
        let attempt = selection.try_select(&Course::new("c1").disabled());
        assert_eq!(attempt, SelectAttempt::Disabled);
        assert!(!selection.is_selected());
        assert!(selection.selector_enabled());
    }

    #[test]
    fn test_roll_back_restores_unselected() {
        let mut selection = CourseSelection::default();
        selection.try_select(&Course::new("c1"));

        selection.roll_back("c1");

        assert!(!selection.is_selected());
        assert!(selection.color.is_none());
        assert!(selection.selector_enabled());
        assert_eq!(selection.commit, MutationState::Error);
    }

    #[test]
    fn test_roll_back_ignores_other_course() {
        let mut selection = CourseSelection::default();
        selection.try_select(&Course::new("c1"));

        selection.roll_back("c2");
        assert_eq!(selection.selected_course_id.as_deref(), Some("c1"));
    }

    #[test]
    fn test_confirm_after_clear_is_refused() {
        let mut selection = CourseSelection::default();
        selection.try_select(&Course::new("c1"));
        selection.clear();

        assert!(!selection.confirm("c1"));
        assert!(!selection.is_selected());
        assert_eq!(selection.commit, MutationState::Idle);
    }

    #[test]
    fn test_confirm_and_clear() {
        let mut selection = CourseSelection::default();
        selection.try_select(&Course::new("c1"));
        assert!(selection.confirm("c1"));
        assert_eq!(selection.commit, MutationState::Success);

        selection.clear();
        assert_eq!(selection, CourseSelection::default());
        assert!(selection.selector_enabled());
    }
}
