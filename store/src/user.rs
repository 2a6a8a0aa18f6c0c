//! User record storage.
//!
//! User lifecycle (registration, credentials, sessions) is handled outside
//! the core; this trait exists so candidate registration can check the
//! referenced user and the public winner surface can resolve a display name.

use crate::StoreError;
use scrutin_types::{Role, UserId};
use serde::{Deserialize, Serialize};

/// A user document as the core sees it. No credential material.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub college_id: String,
    pub name: String,
    pub role: Role,
    pub department: String,
    pub section: String,
}

/// Trait for user document storage.
pub trait UserStore {
    fn get_user(&self, id: &UserId) -> Result<UserRecord, StoreError>;
    fn put_user(&self, record: &UserRecord) -> Result<(), StoreError>;
    fn exists(&self, id: &UserId) -> Result<bool, StoreError>;
}
