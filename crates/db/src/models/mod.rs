//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts
//! - Serializable read shapes where the entity is exposed over HTTP

pub mod caption;
pub mod image;
pub mod user;
