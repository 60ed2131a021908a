//! Domain logic for the review site's revisioned document store.
//!
//! Everything here is storage-agnostic: the algorithms talk to the traits in
//! [`store`], which `reviews-db` implements for PostgreSQL.

pub mod canonical_slug;
pub mod cascade;
pub mod error;
pub mod language;
pub mod mlstring;
pub mod revision;
pub mod slug;
pub mod slug_allocator;
pub mod store;
pub mod types;
pub mod validation;
