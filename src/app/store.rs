use crate::app::config::RepoConfig;
use crate::git::RepoStatus;

/// Per-repository status records, indexed by configuration order.
///
/// Records are created once and never added or removed, so an index handed
/// to a background task stays valid for the life of the process.
#[derive(Debug, Clone, Default)]
pub struct StatusStore {
    records: Vec<RepoStatus>,
}

impl StatusStore {
    pub fn new(repos: &[RepoConfig]) -> Self {
        Self {
            records: repos
                .iter()
                .map(|r| RepoStatus::new(r.path.clone(), r.name.clone()))
                .collect(),
        }
    }

    pub fn from_records(records: Vec<RepoStatus>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RepoStatus> {
        self.records.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut RepoStatus> {
        self.records.get_mut(index)
    }

    pub fn records(&self) -> &[RepoStatus] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &RepoStatus)> {
        self.records.iter().enumerate()
    }

    /// Merge freshly probed facts into a record.
    ///
    /// Transient flags, the last operation message and identity survive; a
    /// refresh that lands while an operation is running must not hide it.
    pub fn replace(&mut self, index: usize, fresh: RepoStatus) -> bool {
        let Some(current) = self.records.get_mut(index) else {
            return false;
        };
        let RepoStatus {
            branch,
            upstream,
            ahead,
            behind,
            has_upstream,
            dirty,
            error,
            commit_subject,
            commit_age,
            commit_time,
            ..
        } = fresh;

        current.branch = branch;
        current.upstream = upstream;
        current.ahead = ahead;
        current.behind = behind;
        current.has_upstream = has_upstream;
        current.dirty = dirty;
        current.error = error;
        current.commit_subject = commit_subject;
        current.commit_age = commit_age;
        current.commit_time = commit_time;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::StatusError;
    use std::path::PathBuf;

    fn store() -> StatusStore {
        StatusStore::new(&[
            RepoConfig {
                path: PathBuf::from("/srv/a"),
                name: "a".into(),
            },
            RepoConfig {
                path: PathBuf::from("/srv/b"),
                name: "b".into(),
            },
        ])
    }

    #[test]
    fn test_replace_preserves_flags_and_message() {
        let mut store = store();
        {
            let record = store.get_mut(0).unwrap();
            record.fetching = true;
            record.last_message = Some("pushed".into());
        }

        let fresh = RepoStatus {
            branch: "main".into(),
            has_upstream: true,
            behind: 2,
            ..RepoStatus::new("/elsewhere", "other")
        };
        assert!(store.replace(0, fresh));

        let record = store.get(0).unwrap();
        assert!(record.fetching);
        assert_eq!(record.last_message.as_deref(), Some("pushed"));
        assert_eq!(record.name, "a");
        assert_eq!(record.path, PathBuf::from("/srv/a"));
        assert_eq!(record.branch, "main");
        assert_eq!(record.behind(), 2);
    }

    #[test]
    fn test_replace_clears_stale_error() {
        let mut store = store();
        store.get_mut(1).unwrap().error = Some(StatusError::PathMissing);
        store.replace(1, RepoStatus::new("/srv/b", "b"));
        assert!(store.get(1).unwrap().error.is_none());
    }

    #[test]
    fn test_replace_out_of_range() {
        let mut store = store();
        assert!(!store.replace(7, RepoStatus::default()));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_replace_is_idempotent() {
        let mut store = store();
        let fresh = RepoStatus {
            branch: "dev".into(),
            has_upstream: true,
            ahead: 1,
            ..RepoStatus::new("/srv/a", "a")
        };
        store.replace(0, fresh.clone());
        let once = store.get(0).unwrap().clone();
        store.replace(0, fresh);
        assert_eq!(store.get(0).unwrap(), &once);
    }
}
