use std::path::PathBuf;

use crate::error::{AppError, FieldErrors, Result, NON_FIELD};
use crate::models::{ContentField, ContentItem, ContentType, NewContent, Training};
use crate::validation::required_fields_for;

/// Inputs of the create-content form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Training,
    Title,
    Description,
    ContentType,
    Url,
    TextContent,
    File,
    Order,
    IsActive,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            FormField::Training => "Training",
            FormField::Title => "Title",
            FormField::Description => "Description",
            FormField::ContentType => "Type",
            FormField::Url => "URL",
            FormField::TextContent => "Text",
            FormField::File => "File path",
            FormField::Order => "Order",
            FormField::IsActive => "Active",
        }
    }

    /// Key of this field in server error bodies.
    pub fn api_name(&self) -> &'static str {
        match self {
            FormField::Training => ContentField::Training.api_name(),
            FormField::Title => ContentField::Title.api_name(),
            FormField::Description => "description",
            FormField::ContentType => "content_type",
            FormField::Url => ContentField::Url.api_name(),
            FormField::TextContent => ContentField::TextContent.api_name(),
            FormField::File => ContentField::File.api_name(),
            FormField::Order => "order",
            FormField::IsActive => "is_active",
        }
    }

    /// Whether the field cycles through choices instead of taking text.
    pub fn is_choice(&self) -> bool {
        matches!(self, FormField::Training | FormField::ContentType | FormField::IsActive)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentDraft {
    pub training: Option<i64>,
    pub title: String,
    pub description: String,
    pub content_type: ContentType,
    pub url: String,
    pub text_content: String,
    pub file: String,
    pub order: u32,
    pub is_active: bool,
}

impl Default for ContentDraft {
    fn default() -> Self {
        Self {
            training: None,
            title: String::new(),
            description: String::new(),
            content_type: ContentType::Text,
            url: String::new(),
            text_content: String::new(),
            file: String::new(),
            order: 0,
            is_active: true,
        }
    }
}

impl ContentDraft {
    pub fn is_populated(&self, field: ContentField) -> bool {
        match field {
            ContentField::Training => self.training.is_some(),
            ContentField::Title => !self.title.trim().is_empty(),
            ContentField::Url => !self.url.trim().is_empty(),
            ContentField::TextContent => !self.text_content.trim().is_empty(),
            ContentField::File => !self.file.trim().is_empty(),
        }
    }

    pub fn missing_fields(&self) -> Vec<ContentField> {
        required_fields_for(self.content_type)
            .iter()
            .copied()
            .filter(|field| !self.is_populated(*field))
            .collect()
    }

    /// Build the create body, carrying only the fields the type uses.
    pub fn to_new_content(&self) -> std::result::Result<NewContent, FieldErrors> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            let mut errors = FieldErrors::new();
            for field in missing {
                errors.add(
                    field.api_name(),
                    format!("{} is required for {} content", field.label(), self.content_type),
                );
            }
            return Err(errors);
        }

        let required = required_fields_for(self.content_type);
        let keep = |field: ContentField, value: &str| {
            required
                .contains(&field)
                .then(|| value.trim().to_string())
        };
        let description = self.description.trim();

        Ok(NewContent {
            training: self.training.unwrap_or_default(),
            title: self.title.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            content_type: self.content_type,
            url: keep(ContentField::Url, &self.url),
            text_content: keep(ContentField::TextContent, &self.text_content),
            file: keep(ContentField::File, &self.file).map(PathBuf::from),
            order: self.order,
            is_active: self.is_active,
        })
    }
}

/// Draft state and submission rules for a new content record.
#[derive(Debug, Clone, Default)]
pub struct CreationForm {
    draft: ContentDraft,
    errors: FieldErrors,
    focus_index: usize,
    submitting: bool,
}

impl CreationForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &ContentDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Fields shown for the current content type.
    pub fn visible_fields(&self) -> Vec<FormField> {
        let mut fields = vec![
            FormField::Training,
            FormField::Title,
            FormField::Description,
            FormField::ContentType,
        ];
        for field in required_fields_for(self.draft.content_type) {
            match field {
                ContentField::Url => fields.push(FormField::Url),
                ContentField::TextContent => fields.push(FormField::TextContent),
                ContentField::File => fields.push(FormField::File),
                ContentField::Training | ContentField::Title => {}
            }
        }
        fields.extend([FormField::Order, FormField::IsActive]);
        fields
    }

    pub fn focus(&self) -> FormField {
        let fields = self.visible_fields();
        fields[self.focus_index.min(fields.len() - 1)]
    }

    pub fn focus_next(&mut self) {
        let len = self.visible_fields().len();
        self.focus_index = (self.focus_index.min(len - 1) + 1) % len;
    }

    pub fn focus_prev(&mut self) {
        let len = self.visible_fields().len();
        self.focus_index = (self.focus_index.min(len - 1) + len - 1) % len;
    }

    pub fn input_char(&mut self, c: char) {
        if self.submitting {
            return;
        }
        let focus = self.focus();
        let draft = &mut self.draft;
        match focus {
            FormField::Title => draft.title.push(c),
            FormField::Description => draft.description.push(c),
            FormField::Url => draft.url.push(c),
            FormField::TextContent => draft.text_content.push(c),
            FormField::File => draft.file.push(c),
            FormField::Order => {
                if let Some(digit) = c.to_digit(10) {
                    draft.order = draft.order.saturating_mul(10).saturating_add(digit);
                }
            }
            FormField::Training | FormField::ContentType | FormField::IsActive => {}
        }
    }

    pub fn backspace(&mut self) {
        if self.submitting {
            return;
        }
        let focus = self.focus();
        let draft = &mut self.draft;
        match focus {
            FormField::Title => {
                draft.title.pop();
            }
            FormField::Description => {
                draft.description.pop();
            }
            FormField::Url => {
                draft.url.pop();
            }
            FormField::TextContent => {
                draft.text_content.pop();
            }
            FormField::File => {
                draft.file.pop();
            }
            FormField::Order => draft.order /= 10,
            FormField::Training | FormField::ContentType | FormField::IsActive => {}
        }
    }

    /// Step a choice field forwards or backwards.
    pub fn cycle(&mut self, forward: bool, trainings: &[Training]) {
        if self.submitting {
            return;
        }
        match self.focus() {
            FormField::Training => {
                if trainings.is_empty() {
                    return;
                }
                let len = trainings.len();
                let current = self
                    .draft
                    .training
                    .and_then(|id| trainings.iter().position(|t| t.id == id));
                let next = match (current, forward) {
                    (None, true) => 0,
                    (None, false) => len - 1,
                    (Some(i), true) => (i + 1) % len,
                    (Some(i), false) => (i + len - 1) % len,
                };
                self.draft.training = Some(trainings[next].id);
            }
            FormField::ContentType => {
                self.draft.content_type = if forward {
                    self.draft.content_type.next()
                } else {
                    self.draft.content_type.prev()
                };
            }
            FormField::IsActive => self.draft.is_active = !self.draft.is_active,
            _ => {}
        }
    }

    /// Validate locally and hand back the body to send, or record errors.
    pub fn submit(&mut self) -> Option<NewContent> {
        if self.submitting {
            return None;
        }
        match self.draft.to_new_content() {
            Ok(content) => {
                self.errors = FieldErrors::new();
                self.submitting = true;
                Some(content)
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }

    /// Apply the server's answer. Returns true when the record was created.
    pub fn on_submitted(&mut self, result: Result<ContentItem>) -> bool {
        self.submitting = false;
        match result {
            Ok(item) => {
                tracing::info!(id = item.id, "Created content {:?}", item.title);
                self.draft = ContentDraft::default();
                self.errors = FieldErrors::new();
                self.focus_index = 0;
                true
            }
            Err(AppError::Validation(errors)) => {
                self.errors = errors;
                false
            }
            Err(e) => {
                tracing::error!("Failed to create content: {}", e);
                let mut errors = FieldErrors::new();
                errors.add(NON_FIELD, e.to_string());
                self.errors = errors;
                false
            }
        }
    }
}
