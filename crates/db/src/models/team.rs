//! Teams of reviewers.

use reviews_core::canonical_slug::Sluggable;
use reviews_core::language::Language;
use reviews_core::mlstring::MlString;
use reviews_core::revision::Revisioned;
use reviews_core::types::{Timestamp, UserId};
use serde::{Deserialize, Serialize};

use crate::store::RevisionTable;

/// Content of a row in the `teams` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub name: MlString,
    pub motto: MlString,
    pub description: MlString,
    pub rules: MlString,
    pub mod_approval_to_join: bool,
    pub only_mods_can_blog: bool,
    pub original_language: Language,
    pub canonical_slug_name: Option<String>,
    pub created_on: Timestamp,
    pub created_by: UserId,
}

impl Team {
    pub fn new(input: &CreateTeam, language: Language, actor: UserId) -> Self {
        let text = |value: &Option<String>| {
            value
                .as_deref()
                .map(|v| MlString::single(language, v.trim()))
                .unwrap_or_default()
        };
        Self {
            name: MlString::single(language, input.name.trim()),
            motto: text(&input.motto),
            description: text(&input.description),
            rules: text(&input.rules),
            mod_approval_to_join: input.mod_approval_to_join.unwrap_or(false),
            only_mods_can_blog: input.only_mods_can_blog.unwrap_or(false),
            original_language: language,
            canonical_slug_name: None,
            created_on: chrono::Utc::now(),
            created_by: actor,
        }
    }

    pub fn apply(&mut self, input: &UpdateTeam, language: Language) {
        for (field, value) in [
            (&mut self.name, &input.name),
            (&mut self.motto, &input.motto),
            (&mut self.description, &input.description),
            (&mut self.rules, &input.rules),
        ] {
            if let Some(value) = value {
                field.set(language, value.trim());
            }
        }
        if let Some(flag) = input.mod_approval_to_join {
            self.mod_approval_to_join = flag;
        }
        if let Some(flag) = input.only_mods_can_blog {
            self.only_mods_can_blog = flag;
        }
    }

    /// Moderators may post and edit freely. The founder is the only moderator.
    pub fn is_moderator(&self, user_id: UserId) -> bool {
        self.created_by == user_id
    }
}

impl Revisioned for Team {
    const ENTITY: &'static str = "team";
}

impl RevisionTable for Team {
    const TABLE: &'static str = "teams";
}

impl Sluggable for Team {
    fn slug_source(&self) -> &MlString {
        &self.name
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

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTeam {
    pub name: String,
    pub motto: Option<String>,
    pub description: Option<String>,
    pub rules: Option<String>,
    pub mod_approval_to_join: Option<bool>,
    pub only_mods_can_blog: Option<bool>,
    pub language: Option<Language>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTeam {
    pub name: Option<String>,
    pub motto: Option<String>,
    pub description: Option<String>,
    pub rules: Option<String>,
    pub mod_approval_to_join: Option<bool>,
    pub only_mods_can_blog: Option<bool>,
    pub language: Option<Language>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_optional_text_stays_empty() {
        let input = CreateTeam {
            name: " Annoyed QA Team ".into(),
            motto: None,
            description: Some("We file bugs".into()),
            rules: None,
            mod_approval_to_join: None,
            only_mods_can_blog: Some(true),
            language: None,
        };
        let team = Team::new(&input, Language::English, uuid::Uuid::new_v4());
        assert_eq!(team.name.get(Language::English), Some("Annoyed QA Team"));
        assert!(team.motto.is_empty());
        assert!(team.only_mods_can_blog);
        assert!(!team.mod_approval_to_join);
    }

    #[test]
    fn update_sets_text_in_edit_language() {
        let actor = uuid::Uuid::new_v4();
        let mut team = Team::new(
            &CreateTeam {
                name: "QA".into(),
                motto: None,
                description: None,
                rules: None,
                mod_approval_to_join: None,
                only_mods_can_blog: None,
                language: None,
            },
            Language::English,
            actor,
        );
        team.apply(
            &UpdateTeam {
                motto: Some("Alles kaputt".into()),
                ..UpdateTeam::default()
            },
            Language::German,
        );
        assert_eq!(team.motto.get(Language::German), Some("Alles kaputt"));
        assert_eq!(team.name.get(Language::English), Some("QA"));
        assert!(team.is_moderator(actor));
    }
}
