pub mod remote;
pub mod status;
pub mod sync;

use std::path::Path;

use anyhow::Result;

pub use remote::{Remote, RemoteBranch, DEFAULT_REMOTE};
pub use status::{RepoStatus, StatusError};
pub use sync::GitSync;

/// The version-control primitives the dashboard drives.
///
/// Every method is synchronous and may block for as long as the underlying
/// operation takes; callers run them on blocking workers.
pub trait GitBackend: Send + Sync {
    /// Probe a working copy. Never fails: problems land in `RepoStatus::error`.
    fn get_status(&self, path: &Path, name: &str) -> RepoStatus;

    fn fetch(&self, path: &Path) -> Result<()>;

    /// Pull with rebase onto the tracking branch.
    fn pull(&self, path: &Path) -> Result<()>;

    fn push(&self, path: &Path) -> Result<()>;

    /// Configured remotes, "origin" first then by name.
    fn list_remotes(&self, path: &Path) -> Result<Vec<Remote>>;

    /// Remote-tracking branches named exactly `branch_name` (all of them when empty).
    fn list_remote_branches(&self, path: &Path, branch_name: &str) -> Result<Vec<RemoteBranch>>;

    fn set_upstream(&self, path: &Path, remote: &str, branch: &str) -> Result<()>;

    fn push_with_upstream(&self, path: &Path, remote: &str, branch: &str) -> Result<()>;

    fn add_remote(&self, path: &Path, name: &str, url: &str) -> Result<()>;
}
