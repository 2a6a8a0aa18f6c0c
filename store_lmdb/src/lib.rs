//! LMDB record store backend.
//!
//! Implements the storage traits from `scrutin-store` using the `heed` LMDB
//! bindings. Elections and users each map to one LMDB database within a
//! single environment; records are bincode-encoded.

pub mod election;
pub mod environment;
pub mod error;
pub mod user;

pub use election::LmdbElectionStore;
pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use user::LmdbUserStore;
