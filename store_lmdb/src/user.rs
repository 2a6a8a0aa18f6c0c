//! LMDB implementation of UserStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use scrutin_store::{StoreError, UserRecord, UserStore};
use scrutin_types::UserId;

use crate::LmdbError;

pub struct LmdbUserStore {
    pub(crate) env: Arc<Env>,
    pub(crate) users_db: Database<Bytes, Bytes>,
}

impl UserStore for LmdbUserStore {
    fn get_user(&self, id: &UserId) -> Result<UserRecord, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .users_db
            .get(&rtxn, id.as_str().as_bytes())
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(id.to_string()))?;
        let record: UserRecord = bincode::deserialize(val).map_err(LmdbError::from)?;
        Ok(record)
    }

    fn put_user(&self, record: &UserRecord) -> Result<(), StoreError> {
        let bytes = bincode::serialize(record).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.users_db
            .put(&mut wtxn, record.id.as_str().as_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn exists(&self, id: &UserId) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .users_db
            .get(&rtxn, id.as_str().as_bytes())
            .map_err(LmdbError::from)?;
        Ok(val.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LmdbEnvironment;
    use scrutin_types::Role;

    #[test]
    fn user_roundtrip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let env = LmdbEnvironment::open(dir.path(), 10 * 1024 * 1024).expect("open env");
        let store = env.user_store();

        let user = UserRecord {
            id: UserId::new("u1"),
            college_id: "21CS001".into(),
            name: "Alice".into(),
            role: Role::SectionAdmin,
            department: "CSE".into(),
            section: "A".into(),
        };
        store.put_user(&user).expect("put");

        let loaded = store.get_user(&UserId::new("u1")).expect("get");
        assert_eq!(loaded.name, "Alice");
        assert_eq!(loaded.role, Role::SectionAdmin);
        assert!(store.exists(&UserId::new("u1")).unwrap());
        assert!(!store.exists(&UserId::new("ghost")).unwrap());
    }

    #[test]
    fn missing_user_is_not_found() {
        let dir = tempfile::tempdir().expect("temp dir");
        let env = LmdbEnvironment::open(dir.path(), 10 * 1024 * 1024).expect("open env");
        let store = env.user_store();
        let err = store.get_user(&UserId::new("ghost")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
