//! Session status and request URL construction.

use tracing::error;

/// Server endpoint that answers survey AJAX requests.
pub const SURVEY_AJAX: &str = "SurveyAjax";

/// `what=` selector of the forum participation query.
pub const WHAT_FORUM_PARTICIPATION: &str = "forum_participation";

/// Source of the current session identifier.
pub trait SessionStatus: Send + Sync {
    /// Current session id, or `None` when there is no session.
    fn session_id(&self) -> Option<String>;
}

/// Session id fixed at construction time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FixedSession {
    id: Option<String>,
}

impl FixedSession {
    pub fn new(id: Option<String>) -> Self {
        Self { id }
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

impl SessionStatus for FixedSession {
    fn session_id(&self) -> Option<String> {
        self.id.clone()
    }
}

/// Relative URL of the forum participation query for the current session.
///
/// Without a session id (absent or empty) this logs an error and returns an
/// empty string; the caller still issues the request.
pub fn forum_participation_url(session: &dyn SessionStatus) -> String {
    match session.session_id().filter(|id| !id.is_empty()) {
        Some(id) => format!("{SURVEY_AJAX}?what={WHAT_FORUM_PARTICIPATION}&s={id}"),
        None => {
            error!("sessionId missing in forum_participation_url");
            String::new()
        }
    }
}
