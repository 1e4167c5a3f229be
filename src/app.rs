use std::sync::Arc;

use tokio::sync::mpsc;

use crate::ai::SummaryService;
use crate::config::Config;
use crate::error::Result;
use crate::models::{ContentItem, ContentType, SummaryOutcome, Training, User};
use crate::services::ContentRepository;
use crate::tui::{AppAction, InputMode};
use crate::validation::MaxLength;
use crate::workflow::{CreationForm, Effect, Notice, Workflow, WorkflowState};

const SPINNER_FRAMES: [char; 4] = ['|', '/', '-', '\\'];

// Completion of a background request
pub enum ApiEvent {
    ListLoaded {
        items: Result<Vec<ContentItem>>,
        trainings: Result<Vec<Training>>,
    },
    DetailLoaded {
        id: i64,
        result: Result<ContentItem>,
    },
    SummaryFinished(SummaryOutcome),
    ContentCreated(Result<ContentItem>),
    ContentDeleted {
        id: i64,
        result: Result<()>,
    },
    ActiveToggled {
        id: i64,
        result: Result<ContentItem>,
    },
}

/// Popup drawn over the main panes.
pub enum Overlay {
    None,
    Help,
    Form(CreationForm),
    LengthInput(String),
    ConfirmDelete(i64),
}

pub struct App {
    // Data
    pub workflow: Workflow,
    pub trainings: Vec<Training>,
    pub user: User,

    // UI State
    pub selected_index: usize,
    pub filter: Option<ContentType>,
    pub max_length: MaxLength,
    pub overlay: Overlay,
    spinner_frame: usize,

    // Async state
    events_rx: mpsc::Receiver<ApiEvent>,
    events_tx: mpsc::Sender<ApiEvent>,

    // Services
    repository: Arc<dyn ContentRepository>,
    summarizer: Arc<dyn SummaryService>,
}

impl App {
    pub fn new(
        config: &Config,
        user: User,
        repository: Arc<dyn ContentRepository>,
        summarizer: Arc<dyn SummaryService>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel(32);

        Self {
            workflow: Workflow::new(),
            trainings: Vec::new(),
            user,
            selected_index: 0,
            filter: None,
            max_length: config.max_length(),
            overlay: Overlay::None,
            spinner_frame: 0,
            events_rx,
            events_tx,
            repository,
            summarizer,
        }
    }

    /// Kick off the initial list load.
    pub fn start(&mut self) {
        let effect = self.workflow.refresh();
        self.dispatch(effect);
    }

    pub fn can_manage(&self) -> bool {
        self.user.role.can_manage_content()
    }

    pub fn visible_items(&self) -> Vec<&ContentItem> {
        self.workflow
            .items()
            .iter()
            .filter(|item| self.filter.map_or(true, |t| item.content_type == t))
            .collect()
    }

    pub fn selected_item(&self) -> Option<&ContentItem> {
        self.visible_items().get(self.selected_index).copied()
    }

    pub fn input_mode(&self) -> InputMode {
        match self.overlay {
            Overlay::None => InputMode::Normal,
            Overlay::Help => InputMode::Help,
            Overlay::Form(_) => InputMode::Form,
            Overlay::LengthInput(_) => InputMode::LengthInput,
            Overlay::ConfirmDelete(_) => InputMode::ConfirmDelete,
        }
    }

    pub fn tick_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
    }

    pub fn spinner(&self) -> char {
        SPINNER_FRAMES[self.spinner_frame]
    }

    /// Apply one user action. Returns true when the app should quit.
    pub fn handle_action(&mut self, action: AppAction) -> bool {
        if !matches!(action, AppAction::ShowHelp | AppAction::HideHelp) {
            self.workflow.clear_notice();
        }

        match action {
            AppAction::Quit => return true,

            AppAction::MoveUp => {
                if self.workflow.state().is_list() && self.selected_index > 0 {
                    self.selected_index -= 1;
                }
            }

            AppAction::MoveDown => {
                let len = self.visible_items().len();
                if self.workflow.state().is_list() && len > 0 && self.selected_index < len - 1 {
                    self.selected_index += 1;
                }
            }

            AppAction::Select => {
                if *self.workflow.state() == WorkflowState::List {
                    if let Some(id) = self.selected_item().map(|item| item.id) {
                        let effect = self.workflow.select(id);
                        self.dispatch(effect);
                    }
                } else if matches!(self.workflow.state(), WorkflowState::DetailView(_)) {
                    self.summarize();
                }
            }

            AppAction::Summarize => self.summarize(),

            AppAction::RegenerateSummary => {
                let effect = self.workflow.regenerate(self.max_length.get());
                self.dispatch(effect);
            }

            AppAction::Back => self.workflow.back(),

            AppAction::Close => {
                let effect = self.workflow.close();
                self.dispatch(effect);
            }

            AppAction::Refresh => {
                let effect = self.workflow.refresh();
                self.dispatch(effect);
            }

            AppAction::CycleFilter => {
                self.filter = match self.filter {
                    None => Some(ContentType::ALL[0]),
                    Some(t) if t == ContentType::ALL[ContentType::ALL.len() - 1] => None,
                    Some(t) => Some(t.next()),
                };
                self.selected_index = 0;
            }

            AppAction::OpenLink => {
                if let Some(link) = self.workflow.state().item().and_then(|item| item.link()) {
                    if let Err(e) = open::that(link) {
                        tracing::warn!("Failed to open {}: {}", link, e);
                        self.workflow
                            .set_notice(Notice::error(format!("Could not open link: {}", e)));
                    }
                }
            }

            AppAction::IncreaseLength => self.max_length = self.max_length.increased(),
            AppAction::DecreaseLength => self.max_length = self.max_length.decreased(),

            AppAction::EditLength => self.overlay = Overlay::LengthInput(String::new()),

            AppAction::LengthInputChar(c) => {
                if let Overlay::LengthInput(input) = &mut self.overlay {
                    input.push(c);
                }
            }

            AppAction::LengthInputBackspace => {
                if let Overlay::LengthInput(input) = &mut self.overlay {
                    input.pop();
                }
            }

            AppAction::LengthInputConfirm => {
                if let Overlay::LengthInput(input) = &self.overlay {
                    match MaxLength::parse(input) {
                        Ok(length) => self.max_length = length,
                        Err(e) => self.workflow.set_notice(Notice::error(e.to_string())),
                    }
                }
                self.overlay = Overlay::None;
            }

            AppAction::LengthInputCancel => self.overlay = Overlay::None,

            AppAction::NewContent => {
                if self.can_manage() && self.workflow.state().is_list() {
                    self.overlay = Overlay::Form(CreationForm::new());
                }
            }

            AppAction::DeleteContent => {
                if self.can_manage() && *self.workflow.state() == WorkflowState::List {
                    if let Some(id) = self.selected_item().map(|item| item.id) {
                        self.overlay = Overlay::ConfirmDelete(id);
                    }
                }
            }

            AppAction::ConfirmDelete => {
                if let Overlay::ConfirmDelete(id) = self.overlay {
                    self.spawn_delete(id);
                }
                self.overlay = Overlay::None;
            }

            AppAction::CancelDelete => self.overlay = Overlay::None,

            AppAction::ToggleActive => {
                if self.can_manage() && *self.workflow.state() == WorkflowState::List {
                    if let Some(id) = self.selected_item().map(|item| item.id) {
                        self.spawn_toggle_active(id);
                    }
                }
            }

            AppAction::ShowHelp => self.overlay = Overlay::Help,
            AppAction::HideHelp => self.overlay = Overlay::None,

            AppAction::FormNextField => {
                if let Overlay::Form(form) = &mut self.overlay {
                    form.focus_next();
                }
            }

            AppAction::FormPrevField => {
                if let Overlay::Form(form) = &mut self.overlay {
                    form.focus_prev();
                }
            }

            AppAction::FormChar(c) => {
                if let Overlay::Form(form) = &mut self.overlay {
                    form.input_char(c);
                }
            }

            AppAction::FormBackspace => {
                if let Overlay::Form(form) = &mut self.overlay {
                    form.backspace();
                }
            }

            AppAction::FormCycle(forward) => {
                if let Overlay::Form(form) = &mut self.overlay {
                    form.cycle(forward, &self.trainings);
                }
            }

            AppAction::FormSubmit => {
                let content = match &mut self.overlay {
                    Overlay::Form(form) => form.submit(),
                    _ => None,
                };
                if let Some(content) = content {
                    let repository = Arc::clone(&self.repository);
                    let tx = self.events_tx.clone();
                    tokio::spawn(async move {
                        let result = repository.create_content(content).await;
                        let _ = tx.send(ApiEvent::ContentCreated(result)).await;
                    });
                }
            }

            AppAction::FormCancel => {
                // Stay open until the pending create answers
                if !matches!(&self.overlay, Overlay::Form(form) if form.is_submitting()) {
                    self.overlay = Overlay::None;
                }
            }
        }

        false
    }

    fn summarize(&mut self) {
        let effect = self.workflow.summarize(self.max_length.get());
        self.dispatch(effect);
    }

    /// Run a workflow effect in the background.
    fn dispatch(&self, effect: Option<Effect>) {
        let Some(effect) = effect else {
            return;
        };

        let tx = self.events_tx.clone();
        match effect {
            Effect::LoadList => {
                let repository = Arc::clone(&self.repository);
                tokio::spawn(async move {
                    let (items, trainings) =
                        futures::join!(repository.list_content(), repository.list_trainings());
                    let _ = tx.send(ApiEvent::ListLoaded { items, trainings }).await;
                });
            }
            Effect::LoadDetail(id) => {
                let repository = Arc::clone(&self.repository);
                tokio::spawn(async move {
                    let result = repository.fetch_content_detail(id).await;
                    let _ = tx.send(ApiEvent::DetailLoaded { id, result }).await;
                });
            }
            Effect::Summarize(request) => {
                let summarizer = Arc::clone(&self.summarizer);
                tokio::spawn(async move {
                    let outcome = summarizer.summarize(request).await;
                    let _ = tx.send(ApiEvent::SummaryFinished(outcome)).await;
                });
            }
        }
    }

    fn spawn_delete(&self, id: i64) {
        let repository = Arc::clone(&self.repository);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = repository.delete_content(id).await;
            let _ = tx.send(ApiEvent::ContentDeleted { id, result }).await;
        });
    }

    fn spawn_toggle_active(&self, id: i64) {
        let repository = Arc::clone(&self.repository);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = repository.toggle_active(id).await;
            let _ = tx.send(ApiEvent::ActiveToggled { id, result }).await;
        });
    }

    /// Apply every completed background result (non-blocking)
    pub fn poll_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::ListLoaded { items, trainings } => {
                match trainings {
                    Ok(trainings) => self.trainings = trainings,
                    Err(e) => tracing::warn!("Failed to load trainings: {}", e),
                }
                let effect = self.workflow.on_list_loaded(items);
                self.clamp_selection();
                self.dispatch(effect);
            }

            ApiEvent::DetailLoaded { id, result } => {
                self.workflow.on_detail_loaded(id, result);
                self.clamp_selection();
            }

            ApiEvent::SummaryFinished(outcome) => self.workflow.on_summary_outcome(outcome),

            ApiEvent::ContentCreated(result) => {
                if let Ok(item) = &result {
                    self.workflow.upsert_item(item.clone());
                }
                let Overlay::Form(form) = &mut self.overlay else {
                    tracing::debug!("Create finished after the form was closed");
                    if result.is_ok() {
                        self.reload();
                    }
                    return;
                };
                if form.on_submitted(result) {
                    self.overlay = Overlay::None;
                    self.workflow.set_notice(Notice::info("Content created"));
                    self.reload();
                }
            }

            ApiEvent::ContentDeleted { id, result } => match result {
                Ok(()) => {
                    tracing::info!(id, "Deleted content");
                    self.workflow.remove_item(id);
                    self.clamp_selection();
                    self.workflow.set_notice(Notice::info("Content deleted"));
                    self.reload();
                }
                Err(e) => {
                    tracing::error!("Failed to delete content {}: {}", id, e);
                    self.workflow
                        .set_notice(Notice::error(format!("Error deleting content: {}", e)));
                }
            },

            ApiEvent::ActiveToggled { id, result } => match result {
                Ok(item) => {
                    let state = if item.is_active { "active" } else { "inactive" };
                    self.workflow
                        .set_notice(Notice::info(format!("{:?} is now {}", item.title, state)));
                    self.workflow.upsert_item(item);
                    self.reload();
                }
                Err(e) => {
                    tracing::error!("Failed to toggle content {}: {}", id, e);
                    self.workflow
                        .set_notice(Notice::error(format!("Error updating content: {}", e)));
                }
            },
        }
    }

    /// Bring the list back in line with the server after a change.
    fn reload(&mut self) {
        let effect = self.workflow.invalidate();
        self.dispatch(effect);
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_items().len();
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio_test::assert_ok;

    use super::*;
    use crate::error::{AppError, FieldErrors};
    use crate::models::{NewContent, OutcomeKind, Role, SummaryRequest};

    struct FakeRepository {
        items: Mutex<Vec<ContentItem>>,
        reject_create: Option<FieldErrors>,
    }

    impl FakeRepository {
        fn with(items: Vec<ContentItem>) -> Arc<Self> {
            Arc::new(Self {
                items: Mutex::new(items),
                reject_create: None,
            })
        }
    }

    #[async_trait]
    impl ContentRepository for FakeRepository {
        async fn list_content(&self) -> Result<Vec<ContentItem>> {
            Ok(self.items.lock().unwrap().clone())
        }

        async fn fetch_content_detail(&self, id: i64) -> Result<ContentItem> {
            self.items
                .lock()
                .unwrap()
                .iter()
                .find(|item| item.id == id)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("content/contents/{}/", id)))
        }

        async fn create_content(&self, content: NewContent) -> Result<ContentItem> {
            if let Some(errors) = &self.reject_create {
                return Err(AppError::Validation(errors.clone()));
            }
            let mut items = self.items.lock().unwrap();
            let created = item(items.len() as i64 + 100, content.content_type, &content.title);
            items.push(created.clone());
            Ok(created)
        }

        async fn delete_content(&self, id: i64) -> Result<()> {
            self.items.lock().unwrap().retain(|item| item.id != id);
            Ok(())
        }

        async fn toggle_active(&self, id: i64) -> Result<ContentItem> {
            let mut items = self.items.lock().unwrap();
            let found = items
                .iter_mut()
                .find(|item| item.id == id)
                .ok_or_else(|| AppError::NotFound(id.to_string()))?;
            found.is_active = !found.is_active;
            Ok(found.clone())
        }

        async fn list_trainings(&self) -> Result<Vec<Training>> {
            Ok(vec![Training {
                id: 1,
                name: "Onboarding".to_string(),
                is_active: true,
            }])
        }
    }

    struct EchoSummarizer;

    #[async_trait]
    impl SummaryService for EchoSummarizer {
        async fn summarize(&self, request: SummaryRequest) -> SummaryOutcome {
            SummaryOutcome::success(
                request.sequence_number,
                format!("{} in {} words", request.content_id, request.max_length),
            )
        }
    }

    fn item(id: i64, content_type: ContentType, title: &str) -> ContentItem {
        serde_json::from_value(serde_json::json!({
            "id": id, "title": title, "content_type": content_type.as_str(), "training": 1
        }))
        .unwrap()
    }

    fn user(role: Role) -> User {
        User {
            id: 1,
            email: "someone@example.com".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            role,
        }
    }

    fn app(role: Role, repository: Arc<FakeRepository>) -> App {
        App::new(&Config::default(), user(role), repository, Arc::new(EchoSummarizer))
    }

    /// Wait for the next background result and apply it.
    async fn settle(app: &mut App) {
        let event = app.events_rx.recv().await.unwrap();
        app.apply_event(event);
    }

    #[tokio::test]
    async fn list_detail_summary_flow() {
        let repo = FakeRepository::with(vec![
            item(7, ContentType::Text, "Welcome"),
            item(8, ContentType::Youtube, "Intro video"),
        ]);
        let mut app = app(Role::Employee, repo);
        app.start();
        settle(&mut app).await;
        assert_eq!(app.visible_items().len(), 2);
        assert_eq!(app.trainings.len(), 1);

        app.handle_action(AppAction::Select);
        settle(&mut app).await;
        assert!(matches!(app.workflow.state(), WorkflowState::DetailView(i) if i.id == 7));

        app.handle_action(AppAction::Summarize);
        assert!(matches!(app.workflow.state(), WorkflowState::SummaryPending { .. }));
        settle(&mut app).await;
        assert_eq!(
            app.workflow.displayed_outcome().map(|o| o.kind),
            Some(OutcomeKind::Success("7 in 200 words".to_string()))
        );

        app.handle_action(AppAction::IncreaseLength);
        app.handle_action(AppAction::RegenerateSummary);
        settle(&mut app).await;
        assert_eq!(
            app.workflow.displayed_outcome(),
            Some(SummaryOutcome::success(2, "7 in 250 words"))
        );

        app.handle_action(AppAction::Back);
        assert!(matches!(app.workflow.state(), WorkflowState::DetailView(_)));
        app.handle_action(AppAction::Close);
        settle(&mut app).await;
        assert_eq!(app.workflow.state(), &WorkflowState::List);
    }

    #[tokio::test]
    async fn typed_length_out_of_range_is_rejected() {
        let mut app = app(Role::Employee, FakeRepository::with(vec![]));
        app.handle_action(AppAction::EditLength);
        for c in "2000".chars() {
            app.handle_action(AppAction::LengthInputChar(c));
        }
        app.handle_action(AppAction::LengthInputConfirm);

        assert_eq!(app.max_length.get(), 200);
        assert!(app.workflow.notice().is_some());
        assert!(matches!(app.overlay, Overlay::None));
    }

    #[tokio::test]
    async fn employees_cannot_create_or_delete() {
        let mut app = app(Role::Employee, FakeRepository::with(vec![item(1, ContentType::Text, "a")]));
        app.start();
        settle(&mut app).await;

        app.handle_action(AppAction::NewContent);
        assert!(matches!(app.overlay, Overlay::None));
        app.handle_action(AppAction::DeleteContent);
        assert!(matches!(app.overlay, Overlay::None));
    }

    #[tokio::test]
    async fn trainer_creates_content_and_list_refreshes() {
        let repo = FakeRepository::with(vec![]);
        let mut app = app(Role::Trainer, repo);
        app.start();
        settle(&mut app).await;

        app.handle_action(AppAction::NewContent);
        assert_eq!(app.input_mode(), InputMode::Form);
        app.handle_action(AppAction::FormCycle(true)); // pick the only training
        app.handle_action(AppAction::FormNextField);
        for c in "Welcome".chars() {
            app.handle_action(AppAction::FormChar(c));
        }
        app.handle_action(AppAction::FormNextField); // description
        app.handle_action(AppAction::FormNextField); // type
        app.handle_action(AppAction::FormNextField); // text content
        for c in "Body".chars() {
            app.handle_action(AppAction::FormChar(c));
        }
        app.handle_action(AppAction::FormSubmit);

        settle(&mut app).await; // created
        assert!(matches!(app.overlay, Overlay::None));
        settle(&mut app).await; // refreshed list
        assert_eq!(app.visible_items().len(), 1);
        assert_eq!(app.visible_items()[0].title, "Welcome");
    }

    #[tokio::test]
    async fn server_rejection_keeps_form_open() {
        let mut errors = FieldErrors::new();
        errors.add("non_field_errors", "You can only add content to your assigned trainings");
        let repo = Arc::new(FakeRepository {
            items: Mutex::new(vec![]),
            reject_create: Some(errors.clone()),
        });
        let mut app = app(Role::Trainer, repo);
        app.start();
        settle(&mut app).await;

        app.handle_action(AppAction::NewContent);
        app.handle_action(AppAction::FormCycle(true));
        app.handle_action(AppAction::FormNextField);
        app.handle_action(AppAction::FormChar('T'));
        app.handle_action(AppAction::FormNextField);
        app.handle_action(AppAction::FormNextField);
        app.handle_action(AppAction::FormNextField);
        app.handle_action(AppAction::FormChar('x'));
        app.handle_action(AppAction::FormSubmit);
        settle(&mut app).await;

        let Overlay::Form(form) = &app.overlay else {
            panic!("form should stay open");
        };
        assert_eq!(form.errors(), &errors);
        assert_eq!(form.draft().title, "T");
    }

    #[tokio::test]
    async fn manager_deletes_after_confirmation() {
        let repo = FakeRepository::with(vec![
            item(1, ContentType::Text, "a"),
            item(2, ContentType::Link, "b"),
        ]);
        let mut app = app(Role::Manager, Arc::clone(&repo));
        app.start();
        settle(&mut app).await;

        app.handle_action(AppAction::DeleteContent);
        assert_eq!(app.input_mode(), InputMode::ConfirmDelete);
        app.handle_action(AppAction::ConfirmDelete);
        settle(&mut app).await; // deleted
        settle(&mut app).await; // refreshed

        assert_eq!(app.visible_items().len(), 1);
        assert_ok!(repo.fetch_content_detail(2).await);
    }

    #[tokio::test]
    async fn delete_landing_during_detail_updates_list() {
        let repo = FakeRepository::with(vec![
            item(1, ContentType::Text, "a"),
            item(2, ContentType::Text, "b"),
        ]);
        let mut app = app(Role::Manager, repo);
        app.start();
        settle(&mut app).await;

        app.handle_action(AppAction::DeleteContent);
        app.handle_action(AppAction::ConfirmDelete);
        app.handle_action(AppAction::MoveDown);
        app.handle_action(AppAction::Select);
        settle(&mut app).await;
        settle(&mut app).await;

        assert!(matches!(app.workflow.state(), WorkflowState::DetailView(i) if i.id == 2));
        let ids: Vec<i64> = app.workflow.items().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2]);
        assert_eq!(app.selected_index, 0);

        app.handle_action(AppAction::Close);
        settle(&mut app).await;
        assert_eq!(app.workflow.state(), &WorkflowState::List);
        assert_eq!(app.visible_items().len(), 1);
    }

    #[tokio::test]
    async fn toggle_updates_row_before_reload() {
        let repo = FakeRepository::with(vec![item(1, ContentType::Link, "a")]);
        let mut app = app(Role::Trainer, repo);
        app.start();
        settle(&mut app).await;

        app.handle_action(AppAction::ToggleActive);
        settle(&mut app).await;
        assert!(!app.workflow.items()[0].is_active);
        assert_eq!(app.workflow.state(), &WorkflowState::ListLoading);

        settle(&mut app).await;
        assert!(!app.visible_items()[0].is_active);
    }

    #[tokio::test]
    async fn form_cannot_be_dismissed_while_saving() {
        let mut app = app(Role::Trainer, FakeRepository::with(vec![]));
        app.start();
        settle(&mut app).await;

        app.handle_action(AppAction::NewContent);
        app.handle_action(AppAction::FormCycle(true));
        app.handle_action(AppAction::FormNextField);
        app.handle_action(AppAction::FormChar('T'));
        app.handle_action(AppAction::FormNextField);
        app.handle_action(AppAction::FormNextField);
        app.handle_action(AppAction::FormNextField);
        app.handle_action(AppAction::FormChar('x'));
        app.handle_action(AppAction::FormSubmit);

        app.handle_action(AppAction::FormCancel);
        assert!(matches!(&app.overlay, Overlay::Form(form) if form.is_submitting()));

        settle(&mut app).await;
        assert!(matches!(app.overlay, Overlay::None));
        assert_eq!(app.workflow.items().len(), 1);

        // Cancelling an idle form still closes it.
        app.handle_action(AppAction::NewContent);
        app.handle_action(AppAction::FormCancel);
        assert!(matches!(app.overlay, Overlay::None));
    }

    #[tokio::test]
    async fn filter_cycles_through_types_and_back() {
        let repo = FakeRepository::with(vec![
            item(1, ContentType::Text, "a"),
            item(2, ContentType::Link, "b"),
        ]);
        let mut app = app(Role::Employee, repo);
        app.start();
        settle(&mut app).await;

        app.handle_action(AppAction::CycleFilter);
        assert_eq!(app.filter, Some(ContentType::Text));
        assert_eq!(app.visible_items().len(), 1);
        for _ in 0..ContentType::ALL.len() {
            app.handle_action(AppAction::CycleFilter);
        }
        assert_eq!(app.filter, None);
        assert_eq!(app.visible_items().len(), 2);
    }
}
