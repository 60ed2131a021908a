//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async queries that
//! accept `&PgPool` as the first argument. Single-document access goes
//! through [`crate::store`]; these cover lookups by content and joins.

pub mod blog_post_repo;
pub mod review_repo;
pub mod thing_repo;
pub mod user_meta_repo;

pub use blog_post_repo::BlogPostRepo;
pub use review_repo::ReviewRepo;
pub use thing_repo::ThingRepo;
pub use user_meta_repo::UserMetaRepo;
