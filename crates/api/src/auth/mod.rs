//! Credential handling: Argon2id password hashes and signed session cookies.

pub mod password;
pub mod session;
