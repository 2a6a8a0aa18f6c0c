//! LMDB implementation of ElectionStore.
//!
//! Records are bincode-encoded and keyed by the election id's UTF-8 bytes.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use scrutin_store::{ElectionRecord, ElectionStore, StoreError};
use scrutin_types::{ElectionId, ElectionStatus, UserId};

use crate::LmdbError;

pub struct LmdbElectionStore {
    pub(crate) env: Arc<Env>,
    pub(crate) elections_db: Database<Bytes, Bytes>,
}

impl ElectionStore for LmdbElectionStore {
    fn get_election(&self, id: &ElectionId) -> Result<ElectionRecord, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .elections_db
            .get(&rtxn, id.as_str().as_bytes())
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(id.to_string()))?;
        let record: ElectionRecord = bincode::deserialize(val).map_err(LmdbError::from)?;
        Ok(record)
    }

    fn put_election(&self, record: &ElectionRecord) -> Result<(), StoreError> {
        let bytes = bincode::serialize(record).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.elections_db
            .put(&mut wtxn, record.id.as_str().as_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn exists(&self, id: &ElectionId) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .elections_db
            .get(&rtxn, id.as_str().as_bytes())
            .map_err(LmdbError::from)?;
        Ok(val.is_some())
    }

    fn election_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let count = self.elections_db.len(&rtxn).map_err(LmdbError::from)?;
        Ok(count)
    }

    fn latest_completed(&self) -> Result<Option<ElectionRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.elections_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut latest: Option<ElectionRecord> = None;
        for result in iter {
            let (_key, val) = result.map_err(LmdbError::from)?;
            let record: ElectionRecord = bincode::deserialize(val).map_err(LmdbError::from)?;
            if record.status != ElectionStatus::Completed {
                continue;
            }
            match &latest {
                Some(current) if record.end_time <= current.end_time => {}
                _ => latest = Some(record),
            }
        }
        Ok(latest)
    }

    fn commit_vote(
        &self,
        id: &ElectionId,
        voter: &UserId,
        position: u32,
    ) -> Result<(), StoreError> {
        // One write transaction: the duplicate check and the increment
        // commit or abort together, and LMDB serialises writers, so two
        // interleaved calls for the same voter cannot both succeed.
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let key = id.as_str().as_bytes();
        let val = self
            .elections_db
            .get(&wtxn, key)
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(id.to_string()))?;
        let mut record: ElectionRecord = bincode::deserialize(val).map_err(LmdbError::from)?;

        if record.has_voted(voter) {
            return Err(StoreError::Duplicate(voter.to_string()));
        }
        let candidate = record
            .candidates
            .iter_mut()
            .find(|c| c.position == Some(position))
            .ok_or_else(|| LmdbError::NotFound(format!("candidate position {position}")))?;
        candidate.votes += 1;
        record.voted.push(voter.clone());

        let bytes = bincode::serialize(&record).map_err(LmdbError::from)?;
        self.elections_db
            .put(&mut wtxn, key, &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
