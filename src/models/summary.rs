use crate::validation::MaxLength;

/// One summarization request issued by a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryRequest {
    pub content_id: i64,
    pub max_length: MaxLength,
    pub sequence_number: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeKind {
    Pending,
    Success(String),
    Failure(String),
}

/// Result of a summarization request, tagged with the request it answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOutcome {
    pub for_request: u64,
    pub kind: OutcomeKind,
}

impl SummaryOutcome {
    pub fn pending(for_request: u64) -> Self {
        Self {
            for_request,
            kind: OutcomeKind::Pending,
        }
    }

    pub fn success(for_request: u64, text: impl Into<String>) -> Self {
        Self {
            for_request,
            kind: OutcomeKind::Success(text.into()),
        }
    }

    pub fn failure(for_request: u64, message: impl Into<String>) -> Self {
        Self {
            for_request,
            kind: OutcomeKind::Failure(message.into()),
        }
    }
}
