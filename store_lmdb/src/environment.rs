//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::election::LmdbElectionStore;
use crate::user::LmdbUserStore;
use crate::LmdbError;

const MAX_DBS: u32 = 4;

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    pub(crate) elections_db: Database<Bytes, Bytes>,
    pub(crate) users_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    ///
    /// The path must be an existing directory. `map_size` is the maximum
    /// size the data file may grow to, in bytes.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        // Safety contract of heed: no other process may open the same
        // environment with incompatible options. The daemon is the only
        // writer of its data directory.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let elections_db = env.create_database(&mut wtxn, Some("elections"))?;
        let users_db = env.create_database(&mut wtxn, Some("users"))?;
        wtxn.commit()?;

        Ok(Self {
            env: Arc::new(env),
            elections_db,
            users_db,
        })
    }

    /// Handle on the election store backed by this environment.
    pub fn election_store(&self) -> LmdbElectionStore {
        LmdbElectionStore {
            env: self.env.clone(),
            elections_db: self.elections_db,
        }
    }

    /// Handle on the user store backed by this environment.
    pub fn user_store(&self) -> LmdbUserStore {
        LmdbUserStore {
            env: self.env.clone(),
            users_db: self.users_db,
        }
    }

    pub(crate) fn env(&self) -> &Env {
        &self.env
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_databases() {
        let dir = tempfile::tempdir().expect("temp dir");
        let env = LmdbEnvironment::open(dir.path(), 10 * 1024 * 1024).expect("open env");

        let rtxn = env.env().read_txn().expect("read_txn");
        assert_eq!(env.elections_db.len(&rtxn).unwrap(), 0);
        assert_eq!(env.users_db.len(&rtxn).unwrap(), 0);
    }

    #[test]
    fn reopen_preserves_data() {
        let dir = tempfile::tempdir().expect("temp dir");
        {
            let env = LmdbEnvironment::open(dir.path(), 10 * 1024 * 1024).expect("open env");
            let mut wtxn = env.env().write_txn().expect("write_txn");
            env.elections_db
                .put(&mut wtxn, b"k", b"v")
                .expect("put");
            wtxn.commit().expect("commit");
        }

        let env = LmdbEnvironment::open(dir.path(), 10 * 1024 * 1024).expect("reopen env");
        let rtxn = env.env().read_txn().expect("read_txn");
        let val = env.elections_db.get(&rtxn, b"k").expect("get");
        assert_eq!(val, Some(b"v".as_slice()));
    }
}
