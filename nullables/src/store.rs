//! Nullable store — thread-safe in-memory record storage for testing.

use scrutin_store::{ElectionRecord, ElectionStore, StoreError, UserRecord, UserStore};
use scrutin_types::{ElectionId, ElectionStatus, UserId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// An in-memory election + user store.
/// Thread-safe for use with tokio's multi-threaded runtime.
#[derive(Default)]
pub struct NullStore {
    elections: Mutex<HashMap<String, ElectionRecord>>,
    users: Mutex<HashMap<String, UserRecord>>,
    /// When set, reads fail with a backend error — for exercising the
    /// storage-unavailable paths.
    fail_reads: AtomicBool,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent reads fail with [`StoreError::Backend`].
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::Relaxed);
    }

    fn check_readable(&self) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::Relaxed) {
            return Err(StoreError::Backend("record store unavailable".into()));
        }
        Ok(())
    }
}

impl ElectionStore for NullStore {
    fn get_election(&self, id: &ElectionId) -> Result<ElectionRecord, StoreError> {
        self.check_readable()?;
        self.elections
            .lock()
            .unwrap()
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn put_election(&self, record: &ElectionRecord) -> Result<(), StoreError> {
        self.elections
            .lock()
            .unwrap()
            .insert(record.id.as_str().to_string(), record.clone());
        Ok(())
    }

    fn exists(&self, id: &ElectionId) -> Result<bool, StoreError> {
        self.check_readable()?;
        Ok(self.elections.lock().unwrap().contains_key(id.as_str()))
    }

    fn election_count(&self) -> Result<u64, StoreError> {
        Ok(self.elections.lock().unwrap().len() as u64)
    }

    fn latest_completed(&self) -> Result<Option<ElectionRecord>, StoreError> {
        self.check_readable()?;
        Ok(self
            .elections
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.status == ElectionStatus::Completed)
            .max_by_key(|e| e.end_time)
            .cloned())
    }

    fn commit_vote(
        &self,
        id: &ElectionId,
        voter: &UserId,
        position: u32,
    ) -> Result<(), StoreError> {
        // One lock scope: the duplicate check and the commit are atomic.
        let mut elections = self.elections.lock().unwrap();
        let record = elections
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if record.has_voted(voter) {
            return Err(StoreError::Duplicate(voter.to_string()));
        }
        let candidate = record
            .candidates
            .iter_mut()
            .find(|c| c.position == Some(position))
            .ok_or_else(|| StoreError::NotFound(format!("candidate position {position}")))?;
        candidate.votes += 1;
        record.voted.push(voter.clone());
        Ok(())
    }
}

impl UserStore for NullStore {
    fn get_user(&self, id: &UserId) -> Result<UserRecord, StoreError> {
        self.check_readable()?;
        self.users
            .lock()
            .unwrap()
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn put_user(&self, record: &UserRecord) -> Result<(), StoreError> {
        self.users
            .lock()
            .unwrap()
            .insert(record.id.as_str().to_string(), record.clone());
        Ok(())
    }

    fn exists(&self, id: &UserId) -> Result<bool, StoreError> {
        self.check_readable()?;
        Ok(self.users.lock().unwrap().contains_key(id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrutin_store::CandidateRecord;
    use scrutin_types::{Role, Timestamp};

    fn election(id: &str) -> ElectionRecord {
        let mut rec = ElectionRecord::new(
            ElectionId::new(id),
            "CR Election",
            "CSE",
            "A",
            Timestamp::new(1000),
        );
        rec.candidates.push(CandidateRecord::new(UserId::new("alice")));
        rec.candidates.push(CandidateRecord::new(UserId::new("bob")));
        rec.freeze_positions();
        rec
    }

    #[test]
    fn put_get_roundtrip() {
        let store = NullStore::new();
        store.put_election(&election("e1")).unwrap();
        let rec = store.get_election(&ElectionId::new("e1")).unwrap();
        assert_eq!(rec.title, "CR Election");
        assert!(ElectionStore::exists(&store, &ElectionId::new("e1")).unwrap());
        assert!(store.get_election(&ElectionId::new("nope")).is_err());
    }

    #[test]
    fn commit_vote_is_exactly_once() {
        let store = NullStore::new();
        store.put_election(&election("e1")).unwrap();
        let id = ElectionId::new("e1");
        let voter = UserId::new("v1");

        store.commit_vote(&id, &voter, 1).unwrap();
        let err = store.commit_vote(&id, &voter, 2).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));

        let rec = store.get_election(&id).unwrap();
        assert_eq!(rec.candidates[0].votes, 1);
        assert_eq!(rec.candidates[1].votes, 0);
        assert_eq!(rec.voted.len(), 1);
    }

    #[test]
    fn commit_vote_unknown_position_leaves_record_untouched() {
        let store = NullStore::new();
        store.put_election(&election("e1")).unwrap();
        let id = ElectionId::new("e1");
        let err = store.commit_vote(&id, &UserId::new("v1"), 9).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        let rec = store.get_election(&id).unwrap();
        assert!(rec.voted.is_empty());
    }

    #[test]
    fn latest_completed_picks_newest_end_time() {
        let store = NullStore::new();
        let mut a = election("a");
        a.status = ElectionStatus::Completed;
        a.end_time = Some(Timestamp::new(100));
        let mut b = election("b");
        b.status = ElectionStatus::Completed;
        b.end_time = Some(Timestamp::new(200));
        let c = election("c"); // still Pending
        store.put_election(&a).unwrap();
        store.put_election(&b).unwrap();
        store.put_election(&c).unwrap();

        let latest = store.latest_completed().unwrap().unwrap();
        assert_eq!(latest.id, ElectionId::new("b"));
    }

    #[test]
    fn latest_completed_none_when_nothing_finished() {
        let store = NullStore::new();
        store.put_election(&election("e1")).unwrap();
        assert!(store.latest_completed().unwrap().is_none());
    }

    #[test]
    fn injected_read_failure_surfaces_as_backend_error() {
        let store = NullStore::new();
        store.put_election(&election("e1")).unwrap();
        store.set_fail_reads(true);
        let err = store.get_election(&ElectionId::new("e1")).unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
        store.set_fail_reads(false);
        assert!(store.get_election(&ElectionId::new("e1")).is_ok());
    }

    #[test]
    fn user_roundtrip() {
        let store = NullStore::new();
        let user = UserRecord {
            id: UserId::new("u1"),
            college_id: "21CS001".into(),
            name: "Alice".into(),
            role: Role::Student,
            department: "CSE".into(),
            section: "A".into(),
        };
        store.put_user(&user).unwrap();
        assert_eq!(store.get_user(&UserId::new("u1")).unwrap().name, "Alice");
        assert!(UserStore::exists(&store, &UserId::new("u1")).unwrap());
    }
}
