use std::fmt;

use crate::error::{AppError, Result};
use crate::models::{ContentField, ContentType};

pub const MIN_SUMMARY_LENGTH: u32 = 50;
pub const MAX_SUMMARY_LENGTH: u32 = 1000;
pub const SUMMARY_LENGTH_STEP: u32 = 50;

/// Fields that must be populated for a draft of the given type.
pub fn required_fields_for(content_type: ContentType) -> &'static [ContentField] {
    use ContentField::*;

    match content_type {
        ContentType::Text => &[Training, Title, TextContent],
        ContentType::Youtube | ContentType::Link => &[Training, Title, Url],
        ContentType::Pdf | ContentType::Video => &[Training, Title, File],
    }
}

pub fn is_summarizable(content_type: ContentType) -> bool {
    match content_type {
        ContentType::Text | ContentType::Pdf => true,
        ContentType::Youtube | ContentType::Link | ContentType::Video => false,
    }
}

/// Summary length budget in words, always within
/// [`MIN_SUMMARY_LENGTH`, `MAX_SUMMARY_LENGTH`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MaxLength(u32);

impl MaxLength {
    pub fn new(value: u32) -> Result<Self> {
        if (MIN_SUMMARY_LENGTH..=MAX_SUMMARY_LENGTH).contains(&value) {
            Ok(Self(value))
        } else {
            Err(AppError::InvalidRequest(format!(
                "max length must be between {} and {}, got {}",
                MIN_SUMMARY_LENGTH, MAX_SUMMARY_LENGTH, value
            )))
        }
    }

    /// Parse user input, rejecting anything that is not an in-range integer.
    pub fn parse(input: &str) -> Result<Self> {
        let value = input.trim().parse::<u32>().map_err(|_| {
            AppError::InvalidRequest(format!("max length must be a number, got {:?}", input.trim()))
        })?;
        Self::new(value)
    }

    pub fn clamped(value: u32) -> Self {
        Self(value.clamp(MIN_SUMMARY_LENGTH, MAX_SUMMARY_LENGTH))
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    pub fn increased(&self) -> Self {
        Self::clamped(self.0.saturating_add(SUMMARY_LENGTH_STEP))
    }

    pub fn decreased(&self) -> Self {
        Self::clamped(self.0.saturating_sub(SUMMARY_LENGTH_STEP))
    }
}

impl Default for MaxLength {
    fn default() -> Self {
        Self(200)
    }
}

impl fmt::Display for MaxLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_types_require_url() {
        for t in [ContentType::Youtube, ContentType::Link] {
            assert!(required_fields_for(t).contains(&ContentField::Url));
            assert!(!required_fields_for(t).contains(&ContentField::TextContent));
        }
    }

    #[test]
    fn text_requires_text_content() {
        let fields = required_fields_for(ContentType::Text);
        assert!(fields.contains(&ContentField::TextContent));
        assert!(!fields.contains(&ContentField::Url));
    }

    #[test]
    fn file_types_require_neither_url_nor_text() {
        for t in [ContentType::Pdf, ContentType::Video] {
            let fields = required_fields_for(t);
            assert!(!fields.contains(&ContentField::Url));
            assert!(!fields.contains(&ContentField::TextContent));
            assert!(fields.contains(&ContentField::File));
        }
    }

    #[test]
    fn every_type_requires_training_and_title() {
        for t in ContentType::ALL {
            let fields = required_fields_for(t);
            assert!(fields.contains(&ContentField::Training));
            assert!(fields.contains(&ContentField::Title));
        }
    }

    #[test]
    fn only_text_and_pdf_are_summarizable() {
        for t in ContentType::ALL {
            let expected = matches!(t, ContentType::Text | ContentType::Pdf);
            assert_eq!(is_summarizable(t), expected, "{t}");
        }
    }

    #[test]
    fn max_length_bounds_are_inclusive() {
        assert!(MaxLength::new(50).is_ok());
        assert!(MaxLength::new(1000).is_ok());
        assert!(matches!(MaxLength::new(49), Err(AppError::InvalidRequest(_))));
        assert!(matches!(MaxLength::new(1001), Err(AppError::InvalidRequest(_))));
        assert!(MaxLength::new(0).is_err());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(MaxLength::parse(" 300 ").unwrap().get(), 300);
        assert!(MaxLength::parse("abc").is_err());
        assert!(MaxLength::parse("-60").is_err());
        assert!(MaxLength::parse("20").is_err());
    }

    #[test]
    fn stepping_stays_in_range() {
        assert_eq!(MaxLength::clamped(1000).increased().get(), 1000);
        assert_eq!(MaxLength::clamped(50).decreased().get(), 50);
        assert_eq!(MaxLength::default().increased().get(), 250);
    }
}
