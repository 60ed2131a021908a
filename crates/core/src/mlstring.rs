//! Multilingual strings: user-facing text keyed by [`Language`].

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::language::Language;

/// Matches a single HTML tag, including comments and doctype-like markup.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->|<[^>]*>").expect("valid regex"));

/// Text in one or more languages, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MlString(IndexMap<Language, String>);

/// The outcome of [`MlString::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'a> {
    pub value: &'a str,
    /// The language the value was actually found in.
    pub language: Language,
}

impl MlString {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map holding a single entry.
    pub fn single(language: Language, value: impl Into<String>) -> Self {
        let mut map = Self::new();
        map.set(language, value);
        map
    }

    /// The raw entry for `language`, which may be empty.
    pub fn get(&self, language: Language) -> Option<&str> {
        self.0.get(&language).map(String::as_str)
    }

    pub fn set(&mut self, language: Language, value: impl Into<String>) {
        self.0.insert(language, value.into());
    }

    /// True when no entry holds non-whitespace text.
    pub fn is_empty(&self) -> bool {
        self.0.values().all(|v| v.trim().is_empty())
    }

    /// Resolve the best available text for `preferred`.
    ///
    /// Tries the preferred language, then its fallback chain, then the first
    /// non-empty entry in insertion order. `None` means "no content".
    pub fn resolve(&self, preferred: Language) -> Option<Resolved<'_>> {
        std::iter::once(preferred)
            .chain(preferred.fallbacks().iter().copied())
            .find_map(|lang| self.non_empty(lang))
            .or_else(|| {
                self.0
                    .iter()
                    .find(|(_, value)| !value.is_empty())
                    .map(|(lang, value)| Resolved {
                        value,
                        language: *lang,
                    })
            })
    }

    /// A copy with HTML tags removed and entities decoded in every entry.
    pub fn strip_html(&self) -> Self {
        Self(
            self.0
                .iter()
                .map(|(lang, value)| (*lang, strip_html(value)))
                .collect(),
        )
    }

    /// Require at least one non-empty entry.
    pub fn require(&self, field: &str) -> Result<(), CoreError> {
        if self.is_empty() {
            return Err(CoreError::Validation(format!("{field} must not be empty")));
        }
        Ok(())
    }

    /// Plain text rendered as escaped HTML paragraphs, entry by entry.
    ///
    /// Blank lines separate paragraphs; single newlines become `<br>`.
    pub fn render_plain_html(&self) -> Self {
        Self(
            self.0
                .iter()
                .map(|(lang, value)| (*lang, render_plain_html(value)))
                .collect(),
        )
    }

    fn non_empty(&self, language: Language) -> Option<Resolved<'_>> {
        self.0
            .get(&language)
            .filter(|value| !value.is_empty())
            .map(|value| Resolved { value, language })
    }
}

impl FromIterator<(Language, String)> for MlString {
    fn from_iter<I: IntoIterator<Item = (Language, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Remove tags from an HTML fragment and decode its entities.
pub fn strip_html(html: &str) -> String {
    let without_tags = TAG_RE.replace_all(html, "");
    html_escape::decode_html_entities(&without_tags).into_owned()
}

fn render_plain_html(text: &str) -> String {
    text.replace("\r\n", "\n")
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            let escaped: Vec<_> = p
                .lines()
                .map(|line| html_escape::encode_text(line).into_owned())
                .collect();
            format!("<p>{}</p>", escaped.join("<br>"))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
