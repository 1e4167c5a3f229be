use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Help,
    Form,
    LengthInput,
    ConfirmDelete,
}

#[derive(Debug, Clone)]
pub enum AppAction {
    Quit,
    MoveUp,
    MoveDown,
    Select,
    Summarize,
    RegenerateSummary,
    Back,
    Close,
    Refresh,
    CycleFilter,
    OpenLink,
    IncreaseLength,
    DecreaseLength,
    NewContent,
    DeleteContent,
    ToggleActive,
    ShowHelp,
    HideHelp,
    // Summary length input actions
    EditLength,
    LengthInputChar(char),
    LengthInputBackspace,
    LengthInputConfirm,
    LengthInputCancel,
    // Delete confirmation
    ConfirmDelete,
    CancelDelete,
    // Create form actions
    FormNextField,
    FormPrevField,
    FormChar(char),
    FormBackspace,
    FormCycle(bool),
    FormSubmit,
    FormCancel,
}

pub fn handle_key_event(key: KeyEvent, mode: InputMode) -> Option<AppAction> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(AppAction::Quit);
    }

    match mode {
        // Any key closes help
        InputMode::Help => Some(AppAction::HideHelp),

        InputMode::LengthInput => match key.code {
            KeyCode::Enter => Some(AppAction::LengthInputConfirm),
            KeyCode::Esc => Some(AppAction::LengthInputCancel),
            KeyCode::Backspace => Some(AppAction::LengthInputBackspace),
            KeyCode::Char(c) => Some(AppAction::LengthInputChar(c)),
            _ => None,
        },

        InputMode::ConfirmDelete => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(AppAction::ConfirmDelete),
            _ => Some(AppAction::CancelDelete),
        },

        InputMode::Form => match key.code {
            KeyCode::Enter => Some(AppAction::FormSubmit),
            KeyCode::Esc => Some(AppAction::FormCancel),
            KeyCode::Tab | KeyCode::Down => Some(AppAction::FormNextField),
            KeyCode::BackTab | KeyCode::Up => Some(AppAction::FormPrevField),
            KeyCode::Left => Some(AppAction::FormCycle(false)),
            KeyCode::Right => Some(AppAction::FormCycle(true)),
            KeyCode::Backspace => Some(AppAction::FormBackspace),
            KeyCode::Char(c) => Some(AppAction::FormChar(c)),
            _ => None,
        },

        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(AppAction::Quit),

            KeyCode::Char('j') | KeyCode::Down => Some(AppAction::MoveDown),
            KeyCode::Char('k') | KeyCode::Up => Some(AppAction::MoveUp),

            KeyCode::Enter => Some(AppAction::Select),
            KeyCode::Esc => Some(AppAction::Close),
            KeyCode::Char('b') | KeyCode::Backspace => Some(AppAction::Back),

            KeyCode::Char('s') => Some(AppAction::Summarize),
            KeyCode::Char('g') => Some(AppAction::RegenerateSummary),
            KeyCode::Char('+') | KeyCode::Char(']') => Some(AppAction::IncreaseLength),
            KeyCode::Char('-') | KeyCode::Char('[') => Some(AppAction::DecreaseLength),
            KeyCode::Char('l') => Some(AppAction::EditLength),

            KeyCode::Char('r') => Some(AppAction::Refresh),
            KeyCode::Char('f') => Some(AppAction::CycleFilter),
            KeyCode::Char('o') => Some(AppAction::OpenLink),
            KeyCode::Char('n') => Some(AppAction::NewContent),
            KeyCode::Char('d') => Some(AppAction::DeleteContent),
            KeyCode::Char('t') => Some(AppAction::ToggleActive),

            KeyCode::Char('?') => Some(AppAction::ShowHelp),

            _ => None,
        },
    }
}
