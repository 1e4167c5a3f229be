use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
    Youtube,
    Link,
    Pdf,
    Video,
}

impl ContentType {
    pub const ALL: [ContentType; 5] = [
        ContentType::Text,
        ContentType::Youtube,
        ContentType::Link,
        ContentType::Pdf,
        ContentType::Video,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Youtube => "youtube",
            ContentType::Link => "link",
            ContentType::Pdf => "pdf",
            ContentType::Video => "video",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContentType::Text => "Text Content",
            ContentType::Youtube => "YouTube Link",
            ContentType::Link => "External Link",
            ContentType::Pdf => "PDF Document",
            ContentType::Video => "Video",
        }
    }

    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        let idx = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Draft fields that may be required depending on the content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentField {
    Training,
    Title,
    Url,
    TextContent,
    File,
}

impl ContentField {
    /// Name the server uses for this field in request and error bodies.
    pub fn api_name(&self) -> &'static str {
        match self {
            ContentField::Training => "training",
            ContentField::Title => "title",
            ContentField::Url => "url",
            ContentField::TextContent => "text_content",
            ContentField::File => "file",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContentField::Training => "Training",
            ContentField::Title => "Title",
            ContentField::Url => "URL",
            ContentField::TextContent => "Text content",
            ContentField::File => "File",
        }
    }
}

/// A content record as returned by the API.
///
/// The list endpoint returns a summary projection, so body fields such as
/// `text_content`, `url` and `file_url` are only populated on detail fetches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub content_type: ContentType,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub text_content: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    pub training: i64,
    #[serde(default)]
    pub training_name: Option<String>,
    #[serde(default)]
    pub order: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_by: Option<i64>,
    #[serde(default)]
    pub created_by_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl ContentItem {
    pub fn creator(&self) -> &str {
        self.created_by_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("Unknown")
    }

    /// Link that can be opened outside the console, if any.
    pub fn link(&self) -> Option<&str> {
        self.url.as_deref().or(self.file_url.as_deref())
    }
}

/// Body of a create request. Only the fields relevant to `content_type` are set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewContent {
    pub training: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub content_type: ContentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    // Uploaded as a multipart part, never part of the JSON body.
    #[serde(skip)]
    pub file: Option<PathBuf>,
    pub order: u32,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Training {
    pub id: i64,
    pub name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}
