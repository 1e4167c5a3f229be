//! Content page state machine.
//!
//! The workflow never performs I/O. User actions return an [`Effect`] for the
//! caller to run in the background, and completions are fed back through the
//! `on_*` methods. Summary requests carry a sequence number and only the
//! outcome of the most recently issued request is ever applied.

mod form;
mod state;

pub use form::{CreationForm, FormField};
pub use state::WorkflowState;

use crate::error::{AppError, Result};
use crate::models::{ContentItem, OutcomeKind, SummaryOutcome, SummaryRequest};
use crate::validation::{is_summarizable, MaxLength};

/// Background work requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadList,
    LoadDetail(i64),
    Summarize(SummaryRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// One-line message shown under the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

pub struct Workflow {
    state: WorkflowState,
    items: Vec<ContentItem>,
    notice: Option<Notice>,
    highest_issued: u64,
    reload_pending: bool,
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new()
    }
}

impl Workflow {
    pub fn new() -> Self {
        Self {
            state: WorkflowState::List,
            items: Vec::new(),
            notice: None,
            highest_issued: 0,
            reload_pending: false,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Sequence number of the latest summary request issued.
    pub fn highest_issued(&self) -> u64 {
        self.highest_issued
    }

    pub fn can_summarize(&self) -> bool {
        matches!(&self.state, WorkflowState::DetailView(item) if is_summarizable(item.content_type))
    }

    pub fn can_regenerate(&self) -> bool {
        self.state.is_summary()
    }

    pub fn can_go_back(&self) -> bool {
        matches!(
            self.state,
            WorkflowState::SummaryReady { .. } | WorkflowState::SummaryFailed { .. }
        )
    }

    /// Outcome to render in the summary panel.
    pub fn displayed_outcome(&self) -> Option<SummaryOutcome> {
        match &self.state {
            WorkflowState::SummaryPending { request, .. } => {
                Some(SummaryOutcome::pending(request.sequence_number))
            }
            WorkflowState::SummaryReady { request, text, .. } => {
                Some(SummaryOutcome::success(request.sequence_number, text.clone()))
            }
            WorkflowState::SummaryFailed { request, message, .. } => {
                Some(SummaryOutcome::failure(request.sequence_number, message.clone()))
            }
            _ => None,
        }
    }

    pub fn refresh(&mut self) -> Option<Effect> {
        if self.state != WorkflowState::List {
            return None;
        }
        self.transition(WorkflowState::ListLoading);
        Some(Effect::LoadList)
    }

    /// Apply a list response. Returns a follow-up load when the list changed
    /// while this one was in flight.
    pub fn on_list_loaded(&mut self, result: Result<Vec<ContentItem>>) -> Option<Effect> {
        if self.state != WorkflowState::ListLoading {
            tracing::debug!(state = self.state.name(), "Discarding list response");
            return None;
        }
        match result {
            Ok(items) => self.items = items,
            Err(e) => {
                tracing::error!("Failed to load content list: {}", e);
                self.notice = Some(Notice::error(format!("Could not load content: {}", e)));
            }
        }
        self.transition(WorkflowState::List);

        if std::mem::take(&mut self.reload_pending) {
            return self.refresh();
        }
        None
    }

    /// Record a created or updated item in the local list.
    pub fn upsert_item(&mut self, item: ContentItem) {
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    pub fn remove_item(&mut self, id: i64) {
        self.items.retain(|item| item.id != id);
    }

    /// The server-side list changed. Reloads now when idle on the list, after
    /// the outstanding load otherwise; closing a detail view always reloads.
    pub fn invalidate(&mut self) -> Option<Effect> {
        match self.state {
            WorkflowState::List => self.refresh(),
            WorkflowState::ListLoading => {
                self.reload_pending = true;
                None
            }
            _ => None,
        }
    }

    pub fn select(&mut self, id: i64) -> Option<Effect> {
        if self.state != WorkflowState::List {
            return None;
        }
        self.transition(WorkflowState::DetailLoading(id));
        Some(Effect::LoadDetail(id))
    }

    pub fn on_detail_loaded(&mut self, id: i64, result: Result<ContentItem>) {
        if self.state != WorkflowState::DetailLoading(id) {
            tracing::debug!(id, state = self.state.name(), "Discarding detail response");
            return;
        }
        match result {
            Ok(item) => self.transition(WorkflowState::DetailView(item)),
            Err(AppError::NotFound(_)) => {
                self.items.retain(|item| item.id != id);
                self.notice = Some(Notice::error(format!("Content {} no longer exists", id)));
                self.transition(WorkflowState::List);
            }
            Err(e) => {
                tracing::error!("Failed to load content {}: {}", id, e);
                self.notice = Some(Notice::error(format!("Could not load content details: {}", e)));
                self.transition(WorkflowState::List);
            }
        }
    }

    /// Start summarizing the item in the detail view.
    ///
    /// A no-op unless the detail view shows a summarizable item. An
    /// out-of-range `max_length` is rejected with a notice and nothing is
    /// dispatched.
    pub fn summarize(&mut self, max_length: u32) -> Option<Effect> {
        if !self.can_summarize() {
            tracing::debug!(state = self.state.name(), "Summarize not available");
            return None;
        }
        let max_length = self.validate_length(max_length)?;
        let item = self.state.item()?.clone();
        Some(self.issue(item, max_length))
    }

    /// Issue a fresh request for the item already in the summary panel.
    ///
    /// Accepted while a previous request is still pending; its response will
    /// be discarded on arrival.
    pub fn regenerate(&mut self, max_length: u32) -> Option<Effect> {
        if !self.can_regenerate() {
            return None;
        }
        let max_length = self.validate_length(max_length)?;
        let item = self.state.item()?.clone();
        Some(self.issue(item, max_length))
    }

    pub fn on_summary_outcome(&mut self, outcome: SummaryOutcome) {
        if outcome.for_request != self.highest_issued {
            tracing::debug!(
                seq = outcome.for_request,
                current = self.highest_issued,
                "Discarding stale summary"
            );
            return;
        }

        let state = std::mem::replace(&mut self.state, WorkflowState::List);
        self.state = match (state, outcome.kind) {
            (WorkflowState::SummaryPending { item, request }, kind)
                if request.sequence_number == outcome.for_request =>
            {
                match kind {
                    OutcomeKind::Success(text) => WorkflowState::SummaryReady { item, request, text },
                    OutcomeKind::Failure(message) => WorkflowState::SummaryFailed { item, request, message },
                    OutcomeKind::Pending => WorkflowState::SummaryPending { item, request },
                }
            }
            (state, _) => {
                tracing::debug!(state = state.name(), "Summary arrived after leaving the panel");
                state
            }
        };
        tracing::debug!(state = self.state.name(), "Applied summary outcome");
    }

    pub fn back(&mut self) {
        let state = std::mem::replace(&mut self.state, WorkflowState::List);
        self.state = match state {
            WorkflowState::SummaryReady { item, .. } | WorkflowState::SummaryFailed { item, .. } => {
                WorkflowState::DetailView(item)
            }
            other => other,
        };
    }

    /// Return to the list from anywhere, refreshing it.
    pub fn close(&mut self) -> Option<Effect> {
        if self.state.is_list() {
            return None;
        }
        self.transition(WorkflowState::ListLoading);
        Some(Effect::LoadList)
    }

    fn validate_length(&mut self, max_length: u32) -> Option<MaxLength> {
        match MaxLength::new(max_length) {
            Ok(valid) => Some(valid),
            Err(e) => {
                self.notice = Some(Notice::error(e.to_string()));
                None
            }
        }
    }

    fn issue(&mut self, item: ContentItem, max_length: MaxLength) -> Effect {
        self.highest_issued += 1;
        let request = SummaryRequest {
            content_id: item.id,
            max_length,
            sequence_number: self.highest_issued,
        };
        self.transition(WorkflowState::SummaryPending { item, request });
        Effect::Summarize(request)
    }

    fn transition(&mut self, next: WorkflowState) {
        tracing::debug!(from = self.state.name(), to = next.name(), "Workflow transition");
        self.state = next;
    }
}
