//! Field validation shared by the entity write paths.

use crate::error::CoreError;
use crate::mlstring::MlString;

/// Lowest accepted star rating.
pub const MIN_STAR_RATING: i16 = 1;
/// Highest accepted star rating.
pub const MAX_STAR_RATING: i16 = 5;

/// Maximum length of a single URL.
pub const MAX_URL_LENGTH: usize = 2048;

pub fn validate_star_rating(rating: i16) -> Result<(), CoreError> {
    if !(MIN_STAR_RATING..=MAX_STAR_RATING).contains(&rating) {
        return Err(CoreError::Validation(format!(
            "Star rating must be between {MIN_STAR_RATING} and {MAX_STAR_RATING}, got {rating}"
        )));
    }
    Ok(())
}

/// Accept absolute `http` and `https` URLs only.
pub fn validate_url(url: &str) -> Result<(), CoreError> {
    let trimmed = url.trim();
    if trimmed.len() > MAX_URL_LENGTH {
        return Err(CoreError::Validation(format!(
            "URL exceeds {MAX_URL_LENGTH} characters"
        )));
    }
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .ok_or_else(|| CoreError::Validation(format!("'{trimmed}' is not an http(s) URL")))?;
    if rest.is_empty() || rest.starts_with('/') || rest.chars().any(char::is_whitespace) {
        return Err(CoreError::Validation(format!("'{trimmed}' is not a valid URL")));
    }
    Ok(())
}

pub fn validate_urls(urls: &[String]) -> Result<(), CoreError> {
    urls.iter().try_for_each(|u| validate_url(u))
}

/// Require a single-language input to contain more than whitespace.
pub fn validate_text(value: &str, field: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Require at least one non-empty entry in a multilingual field.
pub fn validate_required(value: &MlString, field: &str) -> Result<(), CoreError> {
    value.require(field)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::language::Language;

    #[test]
    fn blank_text_is_rejected() {
        assert!(validate_text("Zombo", "title").is_ok());
        assert_matches!(
            validate_text("  \n", "title"),
            Err(CoreError::Validation(msg)) if msg == "title must not be empty"
        );
    }

    #[test]
    fn star_rating_bounds() {
        assert!(validate_star_rating(1).is_ok());
        assert!(validate_star_rating(5).is_ok());
        assert_matches!(validate_star_rating(0), Err(CoreError::Validation(_)));
        assert_matches!(validate_star_rating(6), Err(CoreError::Validation(_)));
    }

    #[test]
    fn only_http_urls_are_accepted() {
        assert!(validate_url("https://zombo.com/").is_ok());
        assert!(validate_url("http://example.org").is_ok());
        assert_matches!(validate_url("ftp://zombo.com"), Err(CoreError::Validation(_)));
        assert_matches!(validate_url("zombo.com"), Err(CoreError::Validation(_)));
        assert_matches!(validate_url("https://"), Err(CoreError::Validation(_)));
        assert_matches!(validate_url("https://a b.com"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn required_field_needs_text() {
        assert!(validate_required(&MlString::single(Language::German, "Titel"), "title").is_ok());
        assert_matches!(
            validate_required(&MlString::single(Language::English, "  "), "title"),
            Err(CoreError::Validation(msg)) if msg.contains("title")
        );
    }
}
