//! Slug names: URL-safe, human-readable document identifiers.
//!
//! [`generate_slug_name`] is pure so a slug can always be re-derived from the
//! text it came from. Allocation against the slug tables lives in
//! [`crate::slug_allocator`].

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DocId, Timestamp, UserId};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// The only non-alphanumeric character kept verbatim in slug names.
const KEPT_SYMBOL: char = '.';

/// Names that collide with top-level routes and are always qualified.
pub const DEFAULT_RESERVED_SLUGS: &[&str] = &[
    "actions", "api", "faq", "feed", "login", "logout", "new", "register", "search", "signin",
    "signout", "static", "teams", "terms", "things", "user", "users",
];

/// Default number of qualified-insert attempts before giving up.
pub const DEFAULT_QUALIFY_ATTEMPTS: u32 = 2;

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("valid regex")
});

// ---------------------------------------------------------------------------
// Slug rows
// ---------------------------------------------------------------------------

/// A row of a slug table. `name` is the table's primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slug {
    pub name: String,
    /// The name before qualification.
    pub base_name: String,
    /// Numeric suffix, present only on qualified names.
    pub qualifier_part: Option<String>,
    /// Stable id of the owning document.
    pub owner_id: DocId,
    pub created_on: Timestamp,
    pub created_by: UserId,
}

impl Slug {
    /// An unqualified slug whose name is its base name.
    pub fn new(name: &str, owner_id: DocId, created_by: UserId) -> Self {
        Self {
            name: name.to_string(),
            base_name: name.to_string(),
            qualifier_part: None,
            owner_id,
            created_on: chrono::Utc::now(),
            created_by,
        }
    }

    /// A slug named `{base_name}-{qualifier}`.
    pub fn qualified(base_name: &str, qualifier: u64, owner_id: DocId, created_by: UserId) -> Self {
        Self {
            name: format!("{base_name}-{qualifier}"),
            base_name: base_name.to_string(),
            qualifier_part: Some(qualifier.to_string()),
            owner_id,
            created_on: chrono::Utc::now(),
            created_by,
        }
    }

    /// The numeric qualifier, if present and numeric.
    pub fn qualifier(&self) -> Option<u64> {
        self.qualifier_part.as_deref().and_then(|q| q.parse().ok())
    }
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Allocation settings shared by every slug namespace.
#[derive(Debug, Clone)]
pub struct SlugPolicy {
    /// Lowercase names that are never handed out unqualified.
    pub reserved: Vec<String>,
    /// How many qualified names to try before reporting a conflict.
    pub max_qualify_attempts: u32,
}

impl Default for SlugPolicy {
    fn default() -> Self {
        Self {
            reserved: DEFAULT_RESERVED_SLUGS.iter().map(|s| s.to_string()).collect(),
            max_qualify_attempts: DEFAULT_QUALIFY_ATTEMPTS,
        }
    }
}

impl SlugPolicy {
    /// Add extra reserved names (normalized to lowercase, duplicates skipped).
    pub fn with_reserved<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in extra {
            let name = name.as_ref().trim().to_lowercase();
            if !name.is_empty() && !self.reserved.contains(&name) {
                self.reserved.push(name);
            }
        }
        self
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.reserved.iter().any(|r| *r == name)
    }
}

// ---------------------------------------------------------------------------
// Name generation
// ---------------------------------------------------------------------------

/// True if `s` is a hyphenated UUID, the format used for document ids.
pub fn is_uuid(s: &str) -> bool {
    UUID_RE.is_match(s)
}

/// Normalize `source` into a slug name.
///
/// Entities are decoded, the text is trimmed and lowercased, every symbol
/// other than letters, digits and `.` is dropped, and runs of whitespace,
/// `_`, `/` and `-` become a single hyphen. Leading and trailing hyphens are
/// removed.
///
/// Fails with [`CoreError::InvalidSlugString`] if no letter or digit remains
/// or the result would be mistaken for a document id.
pub fn generate_slug_name(source: &str) -> Result<String, CoreError> {
    let decoded = html_escape::decode_html_entities(source);
    let trimmed = decoded.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidSlugString(
            "Name must not be empty".into(),
        ));
    }

    let lowered = trimmed.to_lowercase();
    let mut name = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;
    for c in lowered.chars() {
        if c.is_whitespace() || matches!(c, '_' | '/' | '-') {
            pending_hyphen = true;
        } else if is_dropped(c) {
            continue;
        } else {
            if pending_hyphen && !name.is_empty() {
                name.push('-');
            }
            pending_hyphen = false;
            name.push(c);
        }
    }

    // A name without letters or digits ("", ".", "..") is not a usable path segment.
    if !name.chars().any(char::is_alphanumeric) {
        return Err(CoreError::InvalidSlugString(format!(
            "'{trimmed}' contains no characters usable in a URL"
        )));
    }
    if is_uuid(&name) {
        return Err(CoreError::InvalidSlugString(
            "Name must not have the form of an identifier".into(),
        ));
    }
    Ok(name)
}

fn is_dropped(c: char) -> bool {
    !c.is_alphanumeric() && c != KEPT_SYMBOL
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
