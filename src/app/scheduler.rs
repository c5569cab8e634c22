use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::app::modal::UpstreamTrigger;
use crate::app::Action;
use crate::git::{GitBackend, RepoStatus};
use crate::util::format_error;

/// Launches git operations on blocking workers.
///
/// Each builder copies what it needs out of the record at dispatch time and
/// reports back only by posting an [`Action`] on the loop's channel.
#[derive(Clone)]
pub struct Scheduler {
    backend: Arc<dyn GitBackend>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl Scheduler {
    pub fn new(backend: Arc<dyn GitBackend>, action_tx: mpsc::UnboundedSender<Action>) -> Self {
        Self { backend, action_tx }
    }

    fn spawn<F>(&self, job: F)
    where
        F: FnOnce(&dyn GitBackend, &mpsc::UnboundedSender<Action>) -> Action + Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        let tx = self.action_tx.clone();
        tokio::task::spawn_blocking(move || {
            let action = job(backend.as_ref(), &tx);
            if tx.send(action).is_err() {
                tracing::debug!("Event loop gone, dropping task result");
            }
        });
    }

    pub fn refresh(&self, index: usize, record: &RepoStatus) {
        let path = record.path.clone();
        let name = record.name.clone();
        self.spawn(move |git, _| Action::StatusUpdated {
            index,
            status: git.get_status(&path, &name),
        });
    }

    pub fn fetch(&self, index: usize, record: &RepoStatus) {
        let path = record.path.clone();
        tracing::debug!("Fetching {}", record.name);
        self.spawn(move |git, _| Action::FetchComplete {
            index,
            error: failure(git.fetch(&path)),
        });
    }

    /// Fetch, then pull with rebase. A failed fetch ends the sync before
    /// pull is attempted.
    pub fn sync(&self, index: usize, record: &RepoStatus) {
        let path = record.path.clone();
        tracing::debug!("Syncing {}", record.name);
        self.spawn(move |git, tx| {
            if let Err(e) = git.fetch(&path) {
                return Action::SyncComplete {
                    index,
                    fetched: false,
                    error: Some(format_error(&e)),
                };
            }
            let _ = tx.send(Action::SyncFetched { index });
            Action::SyncComplete {
                index,
                fetched: true,
                error: failure(git.pull(&path)),
            }
        });
    }

    pub fn push(&self, index: usize, record: &RepoStatus) {
        let path = record.path.clone();
        tracing::debug!("Pushing {}", record.name);
        self.spawn(move |git, _| Action::PushComplete {
            index,
            error: failure(git.push(&path)),
        });
    }

    pub fn push_with_upstream(
        &self,
        index: usize,
        record: &RepoStatus,
        remote: &str,
        branch: &str,
    ) {
        let path = record.path.clone();
        let (remote, branch) = (remote.to_string(), branch.to_string());
        tracing::debug!("Pushing {} to {}/{}", record.name, remote, branch);
        self.spawn(move |git, _| Action::PushComplete {
            index,
            error: failure(git.push_with_upstream(&path, &remote, &branch)),
        });
    }

    /// List remotes and the remote branches named like the current branch.
    /// Listing failures read as "nothing found".
    pub fn discover(&self, index: usize, record: &RepoStatus) {
        let path = record.path.clone();
        let branch = record.branch.clone();
        self.spawn(move |git, _| discovery(git, index, &path, branch, false));
    }

    /// Fetch a freshly added remote, then discover. A failed fetch reports
    /// empty lists.
    pub fn fetch_then_discover(&self, index: usize, record: &RepoStatus) {
        let path = record.path.clone();
        let branch = record.branch.clone();
        self.spawn(move |git, _| {
            if let Err(e) = git.fetch(&path) {
                tracing::warn!("Fetch after adding remote failed: {}", format_error(&e));
                return Action::RemotesLoaded {
                    index,
                    branch,
                    remotes: Vec::new(),
                    branches: Vec::new(),
                    after_fetch: true,
                };
            }
            discovery(git, index, &path, branch, true)
        });
    }

    pub fn add_remote(
        &self,
        index: usize,
        record: &RepoStatus,
        name: &str,
        url: &str,
        trigger: UpstreamTrigger,
    ) {
        let path = record.path.clone();
        let (name, url) = (name.to_string(), url.to_string());
        tracing::debug!("Adding remote {} ({}) to {}", name, url, record.name);
        self.spawn(move |git, _| Action::RemoteAdded {
            index,
            trigger,
            error: failure(git.add_remote(&path, &name, &url)),
        });
    }

    pub fn set_upstream(
        &self,
        index: usize,
        record: &RepoStatus,
        remote: &str,
        branch: &str,
        trigger: UpstreamTrigger,
    ) {
        let path = record.path.clone();
        let (remote, branch) = (remote.to_string(), branch.to_string());
        tracing::debug!("Tracking {}/{} in {}", remote, branch, record.name);
        self.spawn(move |git, _| Action::UpstreamSet {
            index,
            trigger,
            error: failure(git.set_upstream(&path, &remote, &branch)),
        });
    }
}

fn failure(result: Result<()>) -> Option<String> {
    result.err().map(|e| format_error(&e))
}

fn discovery(
    git: &dyn GitBackend,
    index: usize,
    path: &Path,
    branch: String,
    after_fetch: bool,
) -> Action {
    let remotes = git.list_remotes(path).unwrap_or_else(|e| {
        tracing::warn!("Listing remotes failed: {}", format_error(&e));
        Vec::new()
    });
    let branches = git.list_remote_branches(path, &branch).unwrap_or_else(|e| {
        tracing::warn!("Listing remote branches failed: {}", format_error(&e));
        Vec::new()
    });
    Action::RemotesLoaded {
        index,
        branch,
        remotes,
        branches,
        after_fetch,
    }
}
