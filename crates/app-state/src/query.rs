//! Query cache
//!
//! Holds the last result of each backend read query together with its fetch
//! metadata. Mutations invalidate entries; invalidated entries are refetched on
//! the next read.

use brain_api::{Course, UserDetails, UserRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::SystemTime;

/// Identifies a cached backend query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryKey {
    /// `CurrentUser`
    CurrentUser,
    /// `UserDetails`
    UserDetails,
    /// `Courses`
    Courses,
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryKey::CurrentUser => "CurrentUser",
            QueryKey::UserDetails => "UserDetails",
            QueryKey::Courses => "Courses",
        };
        f.write_str(name)
    }
}

/// Query state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryState {
    /// Query is idle (never fetched)
    Idle,

    /// Query is fetching data
    Fetching,

    /// Query fetch succeeded
    Success,

    /// Query fetch failed
    Error,
}

/// One cached query result with its metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryEntry<T> {
    data: Option<T>,
    state: QueryState,
    fetched_at: Option<SystemTime>,
    fetch_count: u32,
    invalidated: bool,
    last_error: Option<String>,
}

impl<T> Default for QueryEntry<T> {
    fn default() -> Self {
        Self {
            data: None,
            state: QueryState::Idle,
            fetched_at: None,
            fetch_count: 0,
            invalidated: false,
            last_error: None,
        }
    }
}

impl<T> QueryEntry<T> {
    /// Cached data, if any fetch has succeeded
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Current state
    pub fn state(&self) -> QueryState {
        self.state
    }

    /// When the data was last fetched
    pub fn fetched_at(&self) -> Option<SystemTime> {
        self.fetched_at
    }

    /// Number of fetch attempts
    pub fn fetch_count(&self) -> u32 {
        self.fetch_count
    }

    /// Message of the last failed fetch
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether the next read must go to the backend
    pub fn needs_fetch(&self) -> bool {
        self.data.is_none() || self.invalidated
    }

    /// Mark the entry as fetching
    pub fn begin_fetch(&mut self) {
        self.state = QueryState::Fetching;
        self.fetch_count += 1;
    }

    /// Store a fetched (or mutation-provided) value
    pub fn resolve(&mut self, data: T) {
        self.data = Some(data);
        self.state = QueryState::Success;
        self.fetched_at = Some(SystemTime::now());
        self.invalidated = false;
        self.last_error = None;
    }

    /// Record a failed fetch; previous data is kept
    pub fn fail(&mut self, error: impl Into<String>) {
        self.state = QueryState::Error;
        self.last_error = Some(error.into());
    }

    /// Force a refetch on the next read
    pub fn invalidate(&mut self) {
        self.invalidated = true;
    }

    /// Drop cached data entirely
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Cached results of the backend read queries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryCache {
    /// `CurrentUser`; `Some(None)` means the backend knows no user
    pub current_user: QueryEntry<Option<UserRecord>>,
    /// `UserDetails`
    pub user_details: QueryEntry<UserDetails>,
    /// `Courses`
    pub courses: QueryEntry<Vec<Course>>,
}

impl QueryCache {
    /// Invalidate a single query
    pub fn invalidate(&mut self, key: QueryKey) {
        tracing::debug!(query = %key, "invalidating query");
        match key {
            QueryKey::CurrentUser => self.current_user.invalidate(),
            QueryKey::UserDetails => self.user_details.invalidate(),
            QueryKey::Courses => self.courses.invalidate(),
        }
    }

    /// Invalidate several queries
    pub fn invalidate_many(&mut self, keys: &[QueryKey]) {
        for key in keys {
            self.invalidate(*key);
        }
    }

    /// Whether a query must be fetched before it can be read
    pub fn needs_fetch(&self, key: QueryKey) -> bool {
        match key {
            QueryKey::CurrentUser => self.current_user.needs_fetch(),
            QueryKey::UserDetails => self.user_details.needs_fetch(),
            QueryKey::Courses => self.courses.needs_fetch(),
        }
    }

    /// Mark a query as fetching
    pub fn begin_fetch(&mut self, key: QueryKey) {
        match key {
            QueryKey::CurrentUser => self.current_user.begin_fetch(),
            QueryKey::UserDetails => self.user_details.begin_fetch(),
            QueryKey::Courses => self.courses.begin_fetch(),
        }
    }

    /// Record a failed fetch
    pub fn fail(&mut self, key: QueryKey, error: impl Into<String>) {
        match key {
            QueryKey::CurrentUser => self.current_user.fail(error),
            QueryKey::UserDetails => self.user_details.fail(error),
            QueryKey::Courses => self.courses.fail(error),
        }
    }

    /// Look up a cached course by id
    pub fn course(&self, course_id: &str) -> Option<&Course> {
        self.courses.data()?.iter().find(|c| c.id == course_id)
    }
}
