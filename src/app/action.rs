use crate::app::modal::UpstreamTrigger;
use crate::git::{Remote, RemoteBranch, RepoStatus};

#[derive(Debug, Clone)]
pub enum Action {
    // Navigation
    SelectNext,
    SelectPrevious,
    SelectFirst,
    SelectLast,

    // Operator requests against the selected repository
    Fetch,
    Sync,
    Push,
    SetUpstream,

    // Fan-out requests
    FetchAll,
    SyncAll,
    PushAll,
    RefreshAll,

    ToggleGrouping,
    ToggleHelp,
    ToggleLogs,

    // Modal input
    ModalUp,
    ModalDown,
    ModalConfirm,
    ModalCancel,
    ModalInputChar(char),
    ModalInputBackspace,
    ModalPaste(String),

    // Task completions
    StatusUpdated {
        index: usize,
        status: RepoStatus,
    },
    FetchComplete {
        index: usize,
        error: Option<String>,
    },
    /// Fetch half of a sync succeeded; pull is starting.
    SyncFetched {
        index: usize,
    },
    SyncComplete {
        index: usize,
        /// False when the fetch half failed and pull never ran
        fetched: bool,
        error: Option<String>,
    },
    PushComplete {
        index: usize,
        error: Option<String>,
    },
    /// `branch` is the branch the lookup was filtered by. `after_fetch` is
    /// set when the task ran a fetch and owns the record's `fetching` flag.
    RemotesLoaded {
        index: usize,
        branch: String,
        remotes: Vec<Remote>,
        branches: Vec<RemoteBranch>,
        after_fetch: bool,
    },
    RemoteAdded {
        index: usize,
        trigger: UpstreamTrigger,
        error: Option<String>,
    },
    UpstreamSet {
        index: usize,
        trigger: UpstreamTrigger,
        error: Option<String>,
    },

    Tick,
    Quit,
}

impl Action {
    /// Index of the repository a task completion refers to.
    pub fn completion_index(&self) -> Option<usize> {
        match self {
            Action::StatusUpdated { index, .. }
            | Action::FetchComplete { index, .. }
            | Action::SyncFetched { index }
            | Action::SyncComplete { index, .. }
            | Action::PushComplete { index, .. }
            | Action::RemotesLoaded { index, .. }
            | Action::RemoteAdded { index, .. }
            | Action::UpstreamSet { index, .. } => Some(*index),
            _ => None,
        }
    }
}
