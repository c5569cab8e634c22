use std::cmp::Ordering;

/// The conventional name of the primary remote, always listed first.
pub const DEFAULT_REMOTE: &str = "origin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteBranch {
    pub remote: String,
    pub branch: String,
}

/// "origin" first, then lexicographic.
pub fn compare_remote_names(a: &str, b: &str) -> Ordering {
    match (a == DEFAULT_REMOTE, b == DEFAULT_REMOTE) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}

pub fn sort_remotes(remotes: &mut [Remote]) {
    remotes.sort_by(|a, b| compare_remote_names(&a.name, &b.name));
}

pub fn sort_remote_branches(branches: &mut [RemoteBranch]) {
    branches.sort_by(|a, b| {
        compare_remote_names(&a.remote, &b.remote).then_with(|| a.branch.cmp(&b.branch))
    });
}

/// Split a remote-tracking shorthand such as `origin/feature/x` given the
/// remote that owns it. Symbolic `HEAD` entries are skipped.
pub fn split_remote_branch(remote: &str, shorthand: &str) -> Option<RemoteBranch> {
    let branch = shorthand.strip_prefix(remote)?.strip_prefix('/')?;
    if branch.is_empty() || branch == "HEAD" {
        return None;
    }
    Some(RemoteBranch {
        remote: remote.to_string(),
        branch: branch.to_string(),
    })
}

/// Keep branches matching `branch_name` exactly, or everything when it is empty.
pub fn filter_by_name(branches: Vec<RemoteBranch>, branch_name: &str) -> Vec<RemoteBranch> {
    if branch_name.is_empty() {
        return branches;
    }
    branches
        .into_iter()
        .filter(|rb| rb.branch == branch_name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(name: &str) -> Remote {
        Remote {
            name: name.to_string(),
            url: format!("git@example.com:{}.git", name),
        }
    }

    #[test]
    fn test_origin_sorts_first() {
        let mut remotes = vec![remote("upstream"), remote("fork"), remote("origin")];
        sort_remotes(&mut remotes);
        let names: Vec<_> = remotes.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["origin", "fork", "upstream"]);
    }

    #[test]
    fn test_split_nested_branch() {
        let rb = split_remote_branch("origin", "origin/feature/login").unwrap();
        assert_eq!(rb.remote, "origin");
        assert_eq!(rb.branch, "feature/login");
    }

    #[test]
    fn test_split_skips_head() {
        assert!(split_remote_branch("origin", "origin/HEAD").is_none());
        assert!(split_remote_branch("origin", "upstream/main").is_none());
    }

    #[test]
    fn test_filter_by_name() {
        let branches = vec![
            RemoteBranch {
                remote: "origin".into(),
                branch: "main".into(),
            },
            RemoteBranch {
                remote: "origin".into(),
                branch: "dev".into(),
            },
        ];
        assert_eq!(filter_by_name(branches.clone(), "main").len(), 1);
        assert_eq!(filter_by_name(branches, "").len(), 2);
    }
}
