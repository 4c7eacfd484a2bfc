//! Captionary core library.
//!
//! Pure domain building blocks shared by the persistence and HTTP crates:
//! primitive type aliases, the error taxonomy, the TTL read cache and input
//! validation helpers, plus the lock helpers the cache and session table
//! share. Nothing in here touches the network or the database.

pub mod cache;
pub mod error;
pub mod lock;
pub mod types;
pub mod validation;
