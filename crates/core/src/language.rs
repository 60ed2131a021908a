//! Supported content languages and their fallback chains.
//!
//! The set is closed: user-facing text can only be stored under one of these
//! codes, and each code's fallback chain is fixed at compile time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A supported content language, serialized as its language code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "ar")]
    Arabic,
    #[serde(rename = "bn")]
    Bengali,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "en")]
    English,
    #[serde(rename = "eo")]
    Esperanto,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "fi")]
    Finnish,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "hu")]
    Hungarian,
    #[serde(rename = "it")]
    Italian,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "lt")]
    Lithuanian,
    #[serde(rename = "mk")]
    Macedonian,
    #[serde(rename = "nl")]
    Dutch,
    #[serde(rename = "pt")]
    Portuguese,
    #[serde(rename = "pt-PT")]
    EuropeanPortuguese,
    #[serde(rename = "sk")]
    Slovak,
    #[serde(rename = "sl")]
    Slovenian,
    #[serde(rename = "sv")]
    Swedish,
    #[serde(rename = "tr")]
    Turkish,
    #[serde(rename = "uk")]
    Ukrainian,
    #[serde(rename = "zh")]
    Chinese,
    #[serde(rename = "zh-Hant")]
    TraditionalChinese,
    /// Content whose language is not known.
    #[serde(rename = "und")]
    Undetermined,
}

/// Site-wide default, tried after a language's own fallbacks.
pub const DEFAULT_LANGUAGE: Language = Language::English;

/// Every supported language, in code order.
pub const ALL_LANGUAGES: &[Language] = &[
    Language::Arabic,
    Language::Bengali,
    Language::German,
    Language::English,
    Language::Esperanto,
    Language::Spanish,
    Language::Finnish,
    Language::French,
    Language::Hungarian,
    Language::Italian,
    Language::Japanese,
    Language::Lithuanian,
    Language::Macedonian,
    Language::Dutch,
    Language::Portuguese,
    Language::EuropeanPortuguese,
    Language::Slovak,
    Language::Slovenian,
    Language::Swedish,
    Language::Turkish,
    Language::Ukrainian,
    Language::Chinese,
    Language::TraditionalChinese,
    Language::Undetermined,
];

impl Language {
    /// The language code used in storage and URLs.
    pub fn code(self) -> &'static str {
        match self {
            Self::Arabic => "ar",
            Self::Bengali => "bn",
            Self::German => "de",
            Self::English => "en",
            Self::Esperanto => "eo",
            Self::Spanish => "es",
            Self::Finnish => "fi",
            Self::French => "fr",
            Self::Hungarian => "hu",
            Self::Italian => "it",
            Self::Japanese => "ja",
            Self::Lithuanian => "lt",
            Self::Macedonian => "mk",
            Self::Dutch => "nl",
            Self::Portuguese => "pt",
            Self::EuropeanPortuguese => "pt-PT",
            Self::Slovak => "sk",
            Self::Slovenian => "sl",
            Self::Swedish => "sv",
            Self::Turkish => "tr",
            Self::Ukrainian => "uk",
            Self::Chinese => "zh",
            Self::TraditionalChinese => "zh-Hant",
            Self::Undetermined => "und",
        }
    }

    /// Languages tried, in order, when this one has no content.
    ///
    /// Regional variants fall back to their base language; every language
    /// then falls back to [`DEFAULT_LANGUAGE`] and finally to `und`.
    pub fn fallbacks(self) -> &'static [Language] {
        match self {
            Self::EuropeanPortuguese => &[Self::Portuguese, DEFAULT_LANGUAGE, Self::Undetermined],
            Self::TraditionalChinese => &[Self::Chinese, DEFAULT_LANGUAGE, Self::Undetermined],
            Self::English => &[Self::Undetermined],
            Self::Undetermined => &[DEFAULT_LANGUAGE],
            _ => &[DEFAULT_LANGUAGE, Self::Undetermined],
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = CoreError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        ALL_LANGUAGES
            .iter()
            .copied()
            .find(|lang| lang.code() == code)
            .ok_or_else(|| CoreError::Validation(format!("Unsupported language code '{code}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_round_trips_through_from_str() {
        for lang in ALL_LANGUAGES {
            assert_eq!(lang.code().parse::<Language>().unwrap(), *lang);
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert!("xx".parse::<Language>().is_err());
        assert!("EN".parse::<Language>().is_err());
    }

    #[test]
    fn regional_variant_falls_back_to_base_first() {
        assert_eq!(
            Language::EuropeanPortuguese.fallbacks(),
            &[Language::Portuguese, Language::English, Language::Undetermined]
        );
    }

    #[test]
    fn default_language_never_lists_itself() {
        assert!(!Language::English.fallbacks().contains(&Language::English));
    }

    #[test]
    fn serializes_as_code() {
        let json = serde_json::to_string(&Language::TraditionalChinese).unwrap();
        assert_eq!(json, "\"zh-Hant\"");
    }
}
