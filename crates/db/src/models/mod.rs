//! Content types for the revisioned tables, with their request DTOs.
//!
//! Each submodule contains:
//! - the content struct stored as a document's JSONB payload
//! - a `Deserialize` create DTO
//! - a `Deserialize` update DTO (all `Option` fields)

pub mod blog_post;
pub mod file;
pub mod review;
pub mod slug;
pub mod team;
pub mod thing;
pub mod user_meta;
