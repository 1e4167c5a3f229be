use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::models::{SummaryOutcome, SummaryRequest};
use crate::services::ApiClient;

const FALLBACK_MESSAGE: &str = "Failed to generate summary";

#[derive(Debug, Serialize)]
struct SummarizeBody {
    max_length: u32,
}

#[derive(Debug, Deserialize)]
struct SummarizeResponse {
    summary: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    detail: Option<String>,
}

/// Invokes the server-side summarizer.
///
/// Always resolves to exactly one outcome for the request; transport and
/// server failures come back as [`OutcomeKind::Failure`](crate::models::OutcomeKind).
#[async_trait]
pub trait SummaryService: Send + Sync {
    async fn summarize(&self, request: SummaryRequest) -> SummaryOutcome;
}

pub struct Summarizer {
    api: ApiClient,
}

impl Summarizer {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl SummaryService for Summarizer {
    async fn summarize(&self, request: SummaryRequest) -> SummaryOutcome {
        let seq = request.sequence_number;
        let path = format!("content/contents/{}/summarize/", request.content_id);
        let body = SummarizeBody {
            max_length: request.max_length.get(),
        };

        let response = match self.api.request(Method::POST, &path).json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Summary request {} failed: {}", seq, e);
                return SummaryOutcome::failure(seq, format!("{}: {}", FALLBACK_MESSAGE, e));
            }
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return SummaryOutcome::failure(seq, format!("{}: {}", FALLBACK_MESSAGE, e)),
        };

        if status.is_success() {
            match serde_json::from_str::<SummarizeResponse>(&text) {
                Ok(parsed) => SummaryOutcome::success(seq, parsed.summary),
                Err(e) => {
                    tracing::error!("Unexpected summary response: {}", e);
                    SummaryOutcome::failure(seq, FALLBACK_MESSAGE)
                }
            }
        } else {
            tracing::warn!(%status, "Summary request {} rejected", seq);
            SummaryOutcome::failure(seq, failure_message(&text))
        }
    }
}

/// Message shown for a failed summary: the body's `error`, else `detail`,
/// else a generic fallback.
fn failure_message(body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .error
        .or(parsed.detail)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_MESSAGE.to_string())
}
