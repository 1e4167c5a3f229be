use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::error::{AppError, Result};
use crate::models::{ContentItem, NewContent, Training};

use super::ApiClient;

const CONTENTS_PATH: &str = "content/contents/";
const TRAININGS_PATH: &str = "users/trainings/";

/// Read and write access to content records.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Summary projection of every visible content item.
    async fn list_content(&self) -> Result<Vec<ContentItem>>;

    /// Full projection of one item. `NotFound` if it was deleted meanwhile.
    async fn fetch_content_detail(&self, id: i64) -> Result<ContentItem>;

    async fn create_content(&self, content: NewContent) -> Result<ContentItem>;

    async fn delete_content(&self, id: i64) -> Result<()>;

    async fn toggle_active(&self, id: i64) -> Result<ContentItem>;

    async fn list_trainings(&self) -> Result<Vec<Training>>;
}

pub struct HttpContentRepository {
    api: ApiClient,
}

impl HttpContentRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

fn detail_path(id: i64) -> String {
    format!("{}{}/", CONTENTS_PATH, id)
}

#[async_trait]
impl ContentRepository for HttpContentRepository {
    async fn list_content(&self) -> Result<Vec<ContentItem>> {
        self.api.get_list(CONTENTS_PATH).await
    }

    async fn fetch_content_detail(&self, id: i64) -> Result<ContentItem> {
        self.api.get_json(&detail_path(id)).await
    }

    async fn create_content(&self, content: NewContent) -> Result<ContentItem> {
        let Some(path) = content.file.clone() else {
            return self.api.post_json(CONTENTS_PATH, &content).await;
        };

        let bytes = tokio::fs::read(&path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| AppError::InvalidRequest(format!("not a file: {}", path.display())))?;

        let mut form = Form::new()
            .text("training", content.training.to_string())
            .text("title", content.title)
            .text("content_type", content.content_type.as_str())
            .text("order", content.order.to_string())
            .text("is_active", content.is_active.to_string())
            .part("file", Part::bytes(bytes).file_name(file_name));
        if let Some(description) = content.description {
            form = form.text("description", description);
        }

        self.api.post_multipart(CONTENTS_PATH, form).await
    }

    async fn delete_content(&self, id: i64) -> Result<()> {
        self.api.delete(&detail_path(id)).await
    }

    async fn toggle_active(&self, id: i64) -> Result<ContentItem> {
        let path = format!("{}toggle_active/", detail_path(id));
        self.api.post_json(&path, &serde_json::json!({})).await
    }

    async fn list_trainings(&self) -> Result<Vec<Training>> {
        self.api.get_list(TRAININGS_PATH).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_paths_keep_trailing_slash() {
        assert_eq!(detail_path(7), "content/contents/7/");
    }
}
