//! Recent-activity log shown on the admin dashboard.

use chrono::{DateTime, Utc};

use super::Database;

/// What an activity entry is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    User,
    Store,
    Rating,
}

impl ActivityKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Store => "store",
            Self::Rating => "rating",
        }
    }
}

/// One logged change.
#[derive(Debug, Clone)]
pub struct Activity {
    pub kind: ActivityKind,
    pub action: String,
    pub at: DateTime<Utc>,
}

/// Read access to the activity log. Writes happen inside the other
/// repositories as part of each change.
pub struct ActivityRepository<'a> {
    db: &'a Database,
}

impl<'a> ActivityRepository<'a> {
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// The `limit` most recent entries, newest first.
    pub async fn recent(&self, limit: usize) -> Vec<Activity> {
        self.db
            .read()
            .await
            .activity
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }
}
