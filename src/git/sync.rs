use anyhow::{Context, Result};
use git2::{BranchType, Repository, StatusOptions};
use std::path::Path;
use std::process::Command;

use super::remote::{self, Remote, RemoteBranch};
use super::{GitBackend, RepoStatus, StatusError};
use crate::util::relative_age;

/// Backend that probes repositories with libgit2 and shells out to `git`
/// for anything that talks to the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitSync;

impl GitSync {
    pub fn new() -> Self {
        Self
    }

    fn open(path: &Path) -> Result<Repository> {
        Repository::open(path).context("Failed to open repository")
    }

    fn current_branch(repo: &Repository) -> Result<String> {
        let head = repo.head().context("Failed to get HEAD")?;
        if !head.is_branch() {
            anyhow::bail!("HEAD is detached");
        }
        head.shorthand()
            .map(String::from)
            .context("Failed to get branch name")
    }

    fn fill_commit_info(repo: &Repository, status: &mut RepoStatus) {
        let Ok(commit) = repo.head().and_then(|h| h.peel_to_commit()) else {
            return;
        };
        status.commit_subject = commit.summary().unwrap_or_default().to_string();
        status.commit_time = commit.time().seconds();
        status.commit_age = relative_age(status.commit_time, chrono::Utc::now().timestamp());
    }

    fn is_dirty(repo: &Repository) -> bool {
        repo.statuses(Some(StatusOptions::new().include_untracked(true)))
            .map(|s| !s.is_empty())
            .unwrap_or(false)
    }

    fn ahead_behind(repo: &Repository, branch: &git2::Branch) -> Result<(u32, u32)> {
        let upstream = branch.upstream()?;
        let local_oid = branch
            .get()
            .target()
            .context("Failed to get local OID")?;
        let upstream_oid = upstream
            .get()
            .target()
            .context("Failed to get upstream OID")?;

        let (ahead, behind) = repo.graph_ahead_behind(local_oid, upstream_oid)?;
        Ok((ahead as u32, behind as u32))
    }
}

impl GitBackend for GitSync {
    fn get_status(&self, path: &Path, name: &str) -> RepoStatus {
        let mut status = RepoStatus::new(path, name);

        match std::fs::metadata(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                status.error = Some(StatusError::PathMissing);
                return status;
            }
            Err(_) => {
                status.error = Some(StatusError::CannotAccess);
                return status;
            }
            Ok(meta) if !meta.is_dir() => {
                status.error = Some(StatusError::NotADirectory);
                return status;
            }
            Ok(_) => {}
        }

        if !path.join(".git").exists() {
            status.error = Some(StatusError::NotARepository);
            return status;
        }
        let repo = match Repository::open(path) {
            Ok(repo) => repo,
            Err(_) => {
                status.error = Some(StatusError::NotARepository);
                return status;
            }
        };

        // An unborn HEAD has no commit to compare against.
        let head = match repo.head() {
            Ok(head) => head,
            Err(_) => {
                status.error = Some(StatusError::NoCommits);
                return status;
            }
        };
        status.branch = head.shorthand().unwrap_or("HEAD").to_string();
        let is_branch = head.is_branch();
        drop(head);

        status.dirty = Self::is_dirty(&repo);
        Self::fill_commit_info(&repo, &mut status);

        if !is_branch {
            return status;
        }
        let Ok(branch) = repo.find_branch(&status.branch, BranchType::Local) else {
            return status;
        };
        let upstream_name = match branch.upstream() {
            Ok(upstream) => upstream.name().ok().flatten().map(String::from),
            Err(_) => None,
        };
        let Some(upstream_name) = upstream_name else {
            return status;
        };
        status.upstream = upstream_name;
        status.has_upstream = true;

        match Self::ahead_behind(&repo, &branch) {
            Ok((ahead, behind)) => {
                status.ahead = ahead;
                status.behind = behind;
            }
            Err(e) => {
                status.error = Some(StatusError::AheadBehind(git_message(&e)));
            }
        }

        status
    }

    fn fetch(&self, path: &Path) -> Result<()> {
        run_git(path, &["fetch", "--prune"]).map(|_| ())
    }

    fn pull(&self, path: &Path) -> Result<()> {
        run_git(path, &["pull", "--rebase", "--autostash"]).map(|_| ())
    }

    fn push(&self, path: &Path) -> Result<()> {
        run_git(path, &["push"]).map(|_| ())
    }

    fn list_remotes(&self, path: &Path) -> Result<Vec<Remote>> {
        let repo = Self::open(path)?;
        let names = repo.remotes().context("Failed to list remotes")?;

        let mut remotes = Vec::new();
        for name in names.iter().flatten() {
            let url = repo
                .find_remote(name)
                .ok()
                .and_then(|r| r.url().map(String::from))
                .unwrap_or_default();
            remotes.push(Remote {
                name: name.to_string(),
                url,
            });
        }
        remote::sort_remotes(&mut remotes);
        Ok(remotes)
    }

    fn list_remote_branches(&self, path: &Path, branch_name: &str) -> Result<Vec<RemoteBranch>> {
        let repo = Self::open(path)?;
        let mut branches = Vec::new();

        for entry in repo.branches(Some(BranchType::Remote))? {
            let (branch, _) = entry?;
            let Some(refname) = branch.get().name() else {
                continue;
            };
            let Ok(remote_buf) = repo.branch_remote_name(refname) else {
                continue;
            };
            let Some(remote_name) = remote_buf.as_str() else {
                continue;
            };
            let Ok(Some(shorthand)) = branch.name() else {
                continue;
            };
            if let Some(rb) = remote::split_remote_branch(remote_name, shorthand) {
                branches.push(rb);
            }
        }

        let mut branches = remote::filter_by_name(branches, branch_name);
        remote::sort_remote_branches(&mut branches);
        Ok(branches)
    }

    fn set_upstream(&self, path: &Path, remote: &str, branch: &str) -> Result<()> {
        let repo = Self::open(path)?;
        let current = Self::current_branch(&repo)?;
        let mut local = repo
            .find_branch(&current, BranchType::Local)
            .context("Failed to find current branch")?;
        let upstream = format!("{}/{}", remote, branch);
        local
            .set_upstream(Some(upstream.as_str()))
            .with_context(|| format!("Failed to track {}", upstream))?;
        Ok(())
    }

    fn push_with_upstream(&self, path: &Path, remote: &str, branch: &str) -> Result<()> {
        run_git(path, &["push", "-u", remote, branch]).map(|_| ())
    }

    fn add_remote(&self, path: &Path, name: &str, url: &str) -> Result<()> {
        let repo = Self::open(path)?;
        repo.remote(name, url)
            .with_context(|| format!("Failed to add remote '{}'", name))?;
        Ok(())
    }
}

/// Run `git` in `dir`, returning stdout or failing with stderr.
fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .with_context(|| format!("Failed to execute git {}", args.first().unwrap_or(&"")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        if stderr.is_empty() {
            anyhow::bail!("git {} exited with {}", args.join(" "), output.status);
        }
        anyhow::bail!("{}", stderr);
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

fn git_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<git2::Error>() {
        Some(e) => e.message().to_string(),
        None => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Oid, RepositoryInitOptions, Signature};
    use tempfile::TempDir;

    fn init_repo(dir: &Path) -> Repository {
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("main");
        Repository::init_opts(dir, &opts).unwrap()
    }

    fn commit(repo: &Repository, file: &str, message: &str) -> Oid {
        let root = repo.workdir().unwrap().to_path_buf();
        std::fs::write(root.join(file), message).unwrap();

        let mut index = repo.index().unwrap();
        index.add_path(Path::new(file)).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = Signature::now("Test", "test@example.com").unwrap();

        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    fn tracking_ref(repo: &Repository, remote: &str, branch: &str, oid: Oid) {
        repo.reference(
            &format!("refs/remotes/{}/{}", remote, branch),
            oid,
            true,
            "test",
        )
        .unwrap();
    }

    #[test]
    fn test_status_missing_path() {
        let dir = TempDir::new().unwrap();
        let status = GitSync::new().get_status(&dir.path().join("gone"), "gone");
        assert_eq!(status.error, Some(StatusError::PathMissing));
        assert_eq!(status.name, "gone");
    }

    #[test]
    fn test_status_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "hi").unwrap();
        let status = GitSync::new().get_status(&file, "notes");
        assert_eq!(status.error, Some(StatusError::NotADirectory));
    }

    #[test]
    fn test_status_not_a_repository() {
        let dir = TempDir::new().unwrap();
        let status = GitSync::new().get_status(dir.path(), "plain");
        assert_eq!(status.error, Some(StatusError::NotARepository));
    }

    #[test]
    fn test_status_no_commits() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        let status = GitSync::new().get_status(dir.path(), "empty");
        assert_eq!(status.error, Some(StatusError::NoCommits));
    }

    #[test]
    fn test_status_local_branch() {
        let dir = TempDir::new().unwrap();
        let repo = init_repo(dir.path());
        commit(&repo, "README.md", "Initial commit");

        let git = GitSync::new();
        let status = git.get_status(dir.path(), "local");
        assert!(status.error.is_none());
        assert_eq!(status.branch, "main");
        assert!(!status.has_upstream);
        assert!(status.needs_upstream());
        assert!(!status.dirty);
        assert_eq!(status.commit_subject, "Initial commit");
        assert!(status.commit_age.ends_with("ago"));

        std::fs::write(dir.path().join("scratch.txt"), "wip").unwrap();
        assert!(git.get_status(dir.path(), "local").dirty);
    }

    #[test]
    fn test_status_tracked_ahead() {
        let dir = TempDir::new().unwrap();
        let repo = init_repo(dir.path());
        let base = commit(&repo, "README.md", "Initial commit");

        let git = GitSync::new();
        git.add_remote(dir.path(), "origin", "https://example.com/repo.git")
            .unwrap();
        tracking_ref(&repo, "origin", "main", base);
        commit(&repo, "lib.rs", "Add lib");
        git.set_upstream(dir.path(), "origin", "main").unwrap();

        let status = git.get_status(dir.path(), "tracked");
        assert!(status.error.is_none());
        assert!(status.has_upstream);
        assert_eq!(status.upstream, "origin/main");
        assert_eq!(status.ahead, 1);
        assert_eq!(status.behind, 0);
        assert!(status.needs_push());
        assert_eq!(status.commit_subject, "Add lib");
    }

    #[test]
    fn test_list_remotes_origin_first() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        let git = GitSync::new();
        git.add_remote(dir.path(), "upstream", "https://example.com/up.git")
            .unwrap();
        git.add_remote(dir.path(), "origin", "https://example.com/fork.git")
            .unwrap();
        git.add_remote(dir.path(), "backup", "https://example.com/bak.git")
            .unwrap();

        let names: Vec<String> = git
            .list_remotes(dir.path())
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["origin", "backup", "upstream"]);
    }

    #[test]
    fn test_add_remote_twice_fails() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        let git = GitSync::new();
        git.add_remote(dir.path(), "origin", "https://example.com/a.git")
            .unwrap();
        let err = git
            .add_remote(dir.path(), "origin", "https://example.com/b.git")
            .unwrap_err();
        assert!(err.to_string().contains("origin"));
    }

    #[test]
    fn test_list_remote_branches_filters_by_name() {
        let dir = TempDir::new().unwrap();
        let repo = init_repo(dir.path());
        let oid = commit(&repo, "README.md", "Initial commit");

        let git = GitSync::new();
        git.add_remote(dir.path(), "upstream", "https://example.com/up.git")
            .unwrap();
        git.add_remote(dir.path(), "origin", "https://example.com/fork.git")
            .unwrap();
        tracking_ref(&repo, "upstream", "main", oid);
        tracking_ref(&repo, "origin", "main", oid);
        tracking_ref(&repo, "origin", "feature/x", oid);

        let matching = git.list_remote_branches(dir.path(), "main").unwrap();
        assert_eq!(
            matching,
            vec![
                RemoteBranch {
                    remote: "origin".into(),
                    branch: "main".into()
                },
                RemoteBranch {
                    remote: "upstream".into(),
                    branch: "main".into()
                },
            ]
        );

        let all = git.list_remote_branches(dir.path(), "").unwrap();
        assert_eq!(all.len(), 3);
        assert!(all
            .iter()
            .any(|rb| rb.remote == "origin" && rb.branch == "feature/x"));
    }

    #[test]
    fn test_set_upstream_detached_head_fails() {
        let dir = TempDir::new().unwrap();
        let repo = init_repo(dir.path());
        let oid = commit(&repo, "README.md", "Initial commit");
        repo.set_head_detached(oid).unwrap();

        let err = GitSync::new()
            .set_upstream(dir.path(), "origin", "main")
            .unwrap_err();
        assert!(err.to_string().contains("detached"));
    }

    #[test]
    fn test_set_upstream_unknown_branch_fails() {
        let dir = TempDir::new().unwrap();
        let repo = init_repo(dir.path());
        commit(&repo, "README.md", "Initial commit");

        assert!(GitSync::new()
            .set_upstream(dir.path(), "origin", "main")
            .is_err());
    }
}
