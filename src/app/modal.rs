use crate::git::remote::compare_remote_names;
use crate::git::{Remote, RemoteBranch};

/// What the operator originally asked for when upstream resolution started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamTrigger {
    SetUpstream,
    Fetch,
    Sync,
    Push,
}

impl UpstreamTrigger {
    /// Only a sync is resumed once an existing remote branch is tracked.
    /// A push is satisfied by push-with-upstream itself.
    pub fn resumes_after_setup(&self) -> bool {
        matches!(self, UpstreamTrigger::Sync)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamOption {
    pub remote: String,
    pub branch: String,
    /// The remote already has this branch; otherwise it is created by pushing.
    pub exists: bool,
}

impl UpstreamOption {
    pub fn label(&self) -> String {
        if self.exists {
            format!("{}/{}", self.remote, self.branch)
        } else {
            format!("{}/{} (push -u)", self.remote, self.branch)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    /// Waiting for the remote and branch listing of `index`.
    Discovering {
        index: usize,
        trigger: UpstreamTrigger,
    },
    SelectingUpstream {
        index: usize,
        branch: String,
        options: Vec<UpstreamOption>,
        cursor: usize,
        trigger: UpstreamTrigger,
    },
    /// Collecting a URL for a new remote named "origin".
    AddingRemote {
        index: usize,
        input: String,
        trigger: UpstreamTrigger,
    },
}

impl Modal {
    pub fn index(&self) -> usize {
        match self {
            Modal::Discovering { index, .. }
            | Modal::SelectingUpstream { index, .. }
            | Modal::AddingRemote { index, .. } => *index,
        }
    }

    pub fn trigger(&self) -> UpstreamTrigger {
        match self {
            Modal::Discovering { trigger, .. }
            | Modal::SelectingUpstream { trigger, .. }
            | Modal::AddingRemote { trigger, .. } => *trigger,
        }
    }

    pub fn is_discovering(&self, for_index: usize) -> bool {
        matches!(self, Modal::Discovering { index, .. } if *index == for_index)
    }

    /// Next state once discovery for `index` has returned.
    pub fn from_discovery(
        index: usize,
        trigger: UpstreamTrigger,
        branch: &str,
        remotes: &[Remote],
        branches: &[RemoteBranch],
    ) -> Self {
        if remotes.is_empty() {
            return Modal::AddingRemote {
                index,
                input: String::new(),
                trigger,
            };
        }
        Modal::SelectingUpstream {
            index,
            branch: branch.to_string(),
            options: build_options(branch, remotes, branches),
            cursor: 0,
            trigger,
        }
    }
}

/// Upstream candidates for `branch`.
///
/// Remote branches with the same name win outright; push-to-create
/// suggestions are offered only when no remote has one.
pub fn build_options(
    branch: &str,
    remotes: &[Remote],
    branches: &[RemoteBranch],
) -> Vec<UpstreamOption> {
    let matches: Vec<UpstreamOption> = branches
        .iter()
        .filter(|rb| rb.branch == branch)
        .map(|rb| UpstreamOption {
            remote: rb.remote.clone(),
            branch: rb.branch.clone(),
            exists: true,
        })
        .collect();

    let mut options = if matches.is_empty() {
        remotes
            .iter()
            .map(|r| UpstreamOption {
                remote: r.name.clone(),
                branch: branch.to_string(),
                exists: false,
            })
            .collect()
    } else {
        matches
    };

    options.sort_by(|a, b| compare_remote_names(&a.remote, &b.remote));
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(name: &str) -> Remote {
        Remote {
            name: name.into(),
            url: format!("https://example.com/{}.git", name),
        }
    }

    fn remote_branch(remote: &str, branch: &str) -> RemoteBranch {
        RemoteBranch {
            remote: remote.into(),
            branch: branch.into(),
        }
    }

    #[test]
    fn test_exact_matches_win() {
        let remotes = [remote("origin"), remote("upstream")];
        let branches = [remote_branch("upstream", "main")];
        let options = build_options("main", &remotes, &branches);
        assert_eq!(
            options,
            vec![UpstreamOption {
                remote: "upstream".into(),
                branch: "main".into(),
                exists: true,
            }]
        );
    }

    #[test]
    fn test_push_to_create_fallback() {
        let options = build_options("main", &[remote("origin")], &[]);
        assert_eq!(
            options,
            vec![UpstreamOption {
                remote: "origin".into(),
                branch: "main".into(),
                exists: false,
            }]
        );
    }

    #[test]
    fn test_options_origin_first() {
        let remotes = [remote("zeta"), remote("alpha"), remote("origin")];
        let options = build_options("dev", &remotes, &[]);
        let names: Vec<_> = options.iter().map(|o| o.remote.as_str()).collect();
        assert_eq!(names, ["origin", "alpha", "zeta"]);
        assert!(options.iter().all(|o| !o.exists));
    }

    #[test]
    fn test_unrelated_branches_ignored() {
        let branches = [remote_branch("origin", "dev")];
        let options = build_options("main", &[remote("origin")], &branches);
        assert_eq!(options.len(), 1);
        assert!(!options[0].exists);
    }

    #[test]
    fn test_no_remotes_asks_for_one() {
        let modal = Modal::from_discovery(3, UpstreamTrigger::Push, "main", &[], &[]);
        assert_eq!(
            modal,
            Modal::AddingRemote {
                index: 3,
                input: String::new(),
                trigger: UpstreamTrigger::Push,
            }
        );
    }

    #[test]
    fn test_resume_only_for_sync() {
        assert!(UpstreamTrigger::Sync.resumes_after_setup());
        assert!(!UpstreamTrigger::SetUpstream.resumes_after_setup());
        assert!(!UpstreamTrigger::Push.resumes_after_setup());
        assert!(!UpstreamTrigger::Fetch.resumes_after_setup());
    }

    #[test]
    fn test_option_label() {
        let option = UpstreamOption {
            remote: "origin".into(),
            branch: "main".into(),
            exists: false,
        };
        assert_eq!(option.label(), "origin/main (push -u)");
    }
}
