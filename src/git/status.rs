use std::fmt;
use std::path::PathBuf;

/// Reasons a working copy cannot report sync facts.
///
/// These are "structural": they keep a repository out of sync/push
/// eligibility until a later refresh succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusError {
    PathMissing,
    CannotAccess,
    NotADirectory,
    NotARepository,
    NoCommits,
    AheadBehind(String),
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusError::PathMissing => write!(f, "path does not exist"),
            StatusError::CannotAccess => write!(f, "cannot access path"),
            StatusError::NotADirectory => write!(f, "not a directory"),
            StatusError::NotARepository => write!(f, "not a git repo"),
            StatusError::NoCommits => write!(f, "no commits yet"),
            StatusError::AheadBehind(msg) => write!(f, "failed to get ahead/behind: {}", msg),
        }
    }
}

impl std::error::Error for StatusError {}

/// One monitored repository as seen by the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoStatus {
    pub path: PathBuf,
    pub name: String,

    pub branch: String,
    /// Short name of the tracking ref, e.g. `origin/main`
    pub upstream: String,
    pub ahead: u32,
    pub behind: u32,
    pub has_upstream: bool,
    pub dirty: bool,

    pub error: Option<StatusError>,

    pub fetching: bool,
    pub rebasing: bool,
    pub pushing: bool,

    pub last_message: Option<String>,

    pub commit_subject: String,
    pub commit_age: String,
    /// Unix timestamp of the last commit
    pub commit_time: i64,
}

impl RepoStatus {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Upstream is configured and the last probe succeeded.
    pub fn is_trackable(&self) -> bool {
        self.has_upstream && self.error.is_none()
    }

    /// The record needs the upstream resolution flow before any remote operation.
    pub fn needs_upstream(&self) -> bool {
        !self.has_upstream && self.error.is_none()
    }

    pub fn is_busy(&self) -> bool {
        self.fetching || self.rebasing || self.pushing
    }

    pub fn ahead(&self) -> u32 {
        if self.is_trackable() {
            self.ahead
        } else {
            0
        }
    }

    pub fn behind(&self) -> u32 {
        if self.is_trackable() {
            self.behind
        } else {
            0
        }
    }

    pub fn is_synced(&self) -> bool {
        self.is_trackable() && self.ahead == 0 && self.behind == 0
    }

    pub fn needs_push(&self) -> bool {
        self.ahead() > 0
    }

    pub fn needs_pull(&self) -> bool {
        self.behind() > 0
    }

    /// Begin an operation: clear the previous result message.
    pub fn start_operation(&mut self) {
        self.last_message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracked(ahead: u32, behind: u32) -> RepoStatus {
        RepoStatus {
            has_upstream: true,
            ahead,
            behind,
            ..RepoStatus::new("/tmp/x", "x")
        }
    }

    #[test]
    fn test_counts_hidden_without_upstream() {
        let mut status = tracked(3, 2);
        status.has_upstream = false;
        assert_eq!(status.ahead(), 0);
        assert_eq!(status.behind(), 0);
        assert!(!status.needs_push());
        assert!(status.needs_upstream());
    }

    #[test]
    fn test_counts_hidden_with_error() {
        let mut status = tracked(3, 2);
        status.error = Some(StatusError::NotARepository);
        assert_eq!(status.ahead(), 0);
        assert!(!status.needs_pull());
        assert!(!status.needs_upstream());
        assert!(!status.is_synced());
    }

    #[test]
    fn test_synced() {
        assert!(tracked(0, 0).is_synced());
        assert!(!tracked(1, 0).is_synced());
        assert!(tracked(1, 0).needs_push());
        assert!(tracked(0, 4).needs_pull());
    }

    #[test]
    fn test_busy() {
        let mut status = tracked(0, 0);
        assert!(!status.is_busy());
        status.rebasing = true;
        assert!(status.is_busy());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(StatusError::NoCommits.to_string(), "no commits yet");
        assert_eq!(
            StatusError::AheadBehind("bad ref".into()).to_string(),
            "failed to get ahead/behind: bad ref"
        );
    }
}
