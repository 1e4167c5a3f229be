use crate::models::{ContentItem, SummaryRequest};

/// What the content page is currently showing.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowState {
    List,
    ListLoading,
    DetailLoading(i64),
    DetailView(ContentItem),
    SummaryPending {
        item: ContentItem,
        request: SummaryRequest,
    },
    SummaryReady {
        item: ContentItem,
        request: SummaryRequest,
        text: String,
    },
    SummaryFailed {
        item: ContentItem,
        request: SummaryRequest,
        message: String,
    },
}

impl WorkflowState {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowState::List => "list",
            WorkflowState::ListLoading => "list-loading",
            WorkflowState::DetailLoading(_) => "detail-loading",
            WorkflowState::DetailView(_) => "detail",
            WorkflowState::SummaryPending { .. } => "summary-pending",
            WorkflowState::SummaryReady { .. } => "summary-ready",
            WorkflowState::SummaryFailed { .. } => "summary-failed",
        }
    }

    /// The detailed item on display, if any.
    pub fn item(&self) -> Option<&ContentItem> {
        match self {
            WorkflowState::DetailView(item)
            | WorkflowState::SummaryPending { item, .. }
            | WorkflowState::SummaryReady { item, .. }
            | WorkflowState::SummaryFailed { item, .. } => Some(item),
            WorkflowState::List | WorkflowState::ListLoading | WorkflowState::DetailLoading(_) => None,
        }
    }

    pub fn request(&self) -> Option<&SummaryRequest> {
        match self {
            WorkflowState::SummaryPending { request, .. }
            | WorkflowState::SummaryReady { request, .. }
            | WorkflowState::SummaryFailed { request, .. } => Some(request),
            _ => None,
        }
    }

    pub fn is_summary(&self) -> bool {
        self.request().is_some()
    }

    pub fn is_list(&self) -> bool {
        matches!(self, WorkflowState::List | WorkflowState::ListLoading)
    }
}
