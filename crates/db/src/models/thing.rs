//! Review subjects ("things"), usually identified by one or more URLs.

use reviews_core::canonical_slug::Sluggable;
use reviews_core::language::Language;
use reviews_core::mlstring::MlString;
use reviews_core::revision::Revisioned;
use reviews_core::types::{Timestamp, UserId};
use serde::{Deserialize, Serialize};

use crate::store::RevisionTable;

/// Content of a row in the `things` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thing {
    pub urls: Vec<String>,
    pub label: MlString,
    pub aliases: MlString,
    pub description: MlString,
    pub original_language: Language,
    pub canonical_slug_name: Option<String>,
    pub created_on: Timestamp,
    pub created_by: UserId,
}

impl Thing {
    pub fn new(input: &CreateThing, language: Language, actor: UserId) -> Self {
        let mut thing = Self {
            urls: input.urls.iter().map(|u| u.trim().to_string()).collect(),
            label: MlString::new(),
            aliases: MlString::new(),
            description: MlString::new(),
            original_language: language,
            canonical_slug_name: None,
            created_on: chrono::Utc::now(),
            created_by: actor,
        };
        if let Some(label) = &input.label {
            thing.label.set(language, label.trim());
        }
        if let Some(description) = &input.description {
            thing.description.set(language, description.trim());
        }
        thing
    }

    /// Apply an edit made in `language`. Only provided fields change.
    pub fn apply(&mut self, input: &UpdateThing, language: Language) {
        if let Some(urls) = &input.urls {
            self.urls = urls.iter().map(|u| u.trim().to_string()).collect();
        }
        if let Some(label) = &input.label {
            self.label.set(language, label.trim());
        }
        if let Some(aliases) = &input.aliases {
            self.aliases.set(language, aliases.trim());
        }
        if let Some(description) = &input.description {
            self.description.set(language, description.trim());
        }
    }
}

impl Revisioned for Thing {
    const ENTITY: &'static str = "thing";
}

impl RevisionTable for Thing {
    const TABLE: &'static str = "things";
}

impl Sluggable for Thing {
    fn slug_source(&self) -> &MlString {
        &self.label
    }

    fn original_language(&self) -> Language {
        self.original_language
    }

    fn canonical_slug_name(&self) -> Option<&str> {
        self.canonical_slug_name.as_deref()
    }

    fn set_canonical_slug_name(&mut self, name: String) {
        self.canonical_slug_name = Some(name);
    }
}

/// DTO for creating a thing.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateThing {
    pub urls: Vec<String>,
    pub label: Option<String>,
    pub description: Option<String>,
    pub language: Option<Language>,
}

/// DTO for editing a thing in one language.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateThing {
    pub urls: Option<Vec<String>>,
    pub label: Option<String>,
    pub aliases: Option<String>,
    pub description: Option<String>,
    pub language: Option<Language>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_only_touches_given_language() {
        let input = CreateThing {
            urls: vec![" https://zombo.com/ ".into()],
            label: Some("Zombo.com".into()),
            description: None,
            language: None,
        };
        let mut thing = Thing::new(&input, Language::English, uuid::Uuid::new_v4());
        assert_eq!(thing.urls, vec!["https://zombo.com/"]);

        thing.apply(
            &UpdateThing {
                urls: None,
                label: Some("Zombo".into()),
                aliases: None,
                description: None,
                language: None,
            },
            Language::German,
        );
        assert_eq!(thing.label.get(Language::English), Some("Zombo.com"));
        assert_eq!(thing.label.get(Language::German), Some("Zombo"));
    }
}
