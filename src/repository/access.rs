//! Granting and revoking user access across repositories.

use tracing::{info, instrument, warn};

use super::error::{RepositoryError, RepositoryResult};
use super::lifecycle::RepositoryManager;
use super::types::Repository;

impl RepositoryManager {
    /// Add `users` to every repository in `repos`.
    ///
    /// Users already present are not duplicated. Every repository is
    /// attempted; the first failure is returned once all have been tried.
    #[instrument(skip_all, fields(repos = repos.len(), users = users.len()))]
    pub fn grant_access<R, U>(&self, repos: &[R], users: &[U]) -> RepositoryResult<()>
    where
        R: AsRef<str>,
        U: AsRef<str>,
    {
        self.update_each(repos, |record| record.add_users(users))
    }

    /// Remove `users` from every repository in `repos`.
    ///
    /// A user missing from a repository is ignored. The remaining user list
    /// may end up empty.
    #[instrument(skip_all, fields(repos = repos.len(), users = users.len()))]
    pub fn revoke_access<R, U>(&self, repos: &[R], users: &[U]) -> RepositoryResult<()>
    where
        R: AsRef<str>,
        U: AsRef<str>,
    {
        self.update_each(repos, |record| record.remove_users(users))
    }

    fn update_each<R, F>(&self, repos: &[R], mut apply: F) -> RepositoryResult<()>
    where
        R: AsRef<str>,
        F: FnMut(&mut Repository) -> bool,
    {
        let mut first_error: Option<RepositoryError> = None;

        for repo in repos {
            let name = repo.as_ref();
            let result = self.lookup(name).and_then(|mut record| {
                if apply(&mut record) {
                    self.store.replace(name, &record)?;
                }
                Ok(())
            });

            if let Err(err) = result {
                warn!(repository = name, error = %err, "access update failed");
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => {
                info!("access updated");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::fs::RecordingFs;
    use crate::plumbing::CannedPlumbing;
    use crate::repository::{BareLocation, RepositoryManager};
    use crate::store::MemoryStore;

    fn manager() -> RepositoryManager {
        RepositoryManager::new(
            Arc::new(MemoryStore::new()),
            Arc::new(RecordingFs::new()),
            Arc::new(CannedPlumbing::default()),
            BareLocation::new("/var/repositories"),
        )
    }

    fn users(m: &RepositoryManager, name: &str) -> Vec<String> {
        m.get(name).unwrap().users
    }

    #[test]
    fn test_grant_access() {
        let m = manager();
        m.create("proj1", vec!["someuser".into()], false).unwrap();
        m.create("proj2", vec!["someuser".into()], false).unwrap();

        m.grant_access(&["proj1", "proj2"], &["umi", "luke"]).unwrap();

        for repo in ["proj1", "proj2"] {
            assert_eq!(users(&m, repo), vec!["someuser", "umi", "luke"]);
        }
    }

    #[test]
    fn test_grant_access_does_not_duplicate() {
        let m = manager();
        m.create("proj1", vec!["someuser".into()], false).unwrap();

        m.grant_access(&["proj1"], &["someuser", "umi"]).unwrap();
        m.grant_access(&["proj1"], &["umi"]).unwrap();

        assert_eq!(users(&m, "proj1"), vec!["someuser", "umi"]);
    }

    #[test]
    fn test_revoke_access() {
        let m = manager();
        m.create("proj1", vec!["someuser".into(), "umi".into()], false).unwrap();
        m.create("proj2", vec!["umi".into(), "luke".into()], false).unwrap();

        m.revoke_access(&["proj1", "proj2"], &["umi", "nobody"]).unwrap();

        assert_eq!(users(&m, "proj1"), vec!["someuser"]);
        assert_eq!(users(&m, "proj2"), vec!["luke"]);
    }

    #[test]
    fn test_revoke_last_user_leaves_empty_list() {
        let m = manager();
        m.create("proj1", vec!["umi".into()], false).unwrap();
        m.revoke_access(&["proj1"], &["umi"]).unwrap();
        assert!(users(&m, "proj1").is_empty());
    }

    #[test]
    fn test_missing_repository_does_not_stop_batch() {
        let m = manager();
        m.create("proj2", vec!["someuser".into()], false).unwrap();

        let err = m.grant_access(&["ghost", "proj2"], &["umi"]).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(users(&m, "proj2"), vec!["someuser", "umi"]);
    }

    #[test]
    fn test_name_outside_root_is_not_found() {
        let m = manager();
        let err = m.revoke_access(&["../proj1"], &["umi"]).unwrap_err();
        assert!(err.is_not_found());
    }
}
