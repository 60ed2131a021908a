/// Stable document identifiers and revision identifiers are random UUIDs.
pub type DocId = uuid::Uuid;

/// Identifier of a single revision row.
pub type RevId = uuid::Uuid;

/// Identifier of the acting user.
pub type UserId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
