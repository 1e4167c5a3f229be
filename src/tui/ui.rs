use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Overlay};
use crate::error::NON_FIELD;
use crate::models::{ContentItem, OutcomeKind};
use crate::validation::is_summarizable;
use crate::workflow::{CreationForm, FormField, NoticeLevel, WorkflowState};

pub fn draw(frame: &mut Frame, app: &App) {
    // Main horizontal split: 1/3 left, 2/3 right
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3), // Left pane: content list
            Constraint::Ratio(2, 3), // Right pane: details
        ])
        .split(frame.area());

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(0),    // Content list
            Constraint::Length(1), // Status line
        ])
        .split(main_chunks[0]);

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Content title
            Constraint::Min(0),    // Details
            Constraint::Length(1), // Key hints
        ])
        .split(main_chunks[1]);

    render_header(frame, app, left_chunks[0]);
    render_content_list(frame, app, left_chunks[1]);
    render_left_status(frame, app, left_chunks[2]);

    render_content_title(frame, app, right_chunks[0]);
    render_detail(frame, app, right_chunks[1]);
    render_right_status(frame, app, right_chunks[2]);

    if app.workflow.state().is_summary() {
        render_summary(frame, app);
    }

    match &app.overlay {
        Overlay::None => {}
        Overlay::Help => render_help(frame, app),
        Overlay::Form(form) => render_form(frame, app, form),
        Overlay::LengthInput(input) => render_length_input(frame, input),
        Overlay::ConfirmDelete(id) => render_confirm_delete(frame, app, *id),
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let filter_label = app.filter.map(|t| t.as_str()).unwrap_or("all");
    let title = format!(" Training Content [{filter_label}] ");
    let stats = format!(
        " {} items | {} ({})",
        app.visible_items().len(),
        app.user.display_name(),
        app.user.role.label()
    );

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let paragraph = Paragraph::new(stats).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

fn render_content_list(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .visible_items()
        .iter()
        .map(|content| {
            let style = if content.is_active {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let marker = if is_summarizable(content.content_type) { "* " } else { "  " };
            let training = content.training_name.as_deref().unwrap_or("?");

            let line = Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Yellow)),
                Span::styled(format!("[{}] ", content.content_type), Style::default().fg(Color::Blue)),
                Span::styled(content.title.as_str(), style),
                Span::styled(format!("  {training}"), Style::default().fg(Color::DarkGray)),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_left_status(frame: &mut Frame, app: &App, area: Rect) {
    let (text, color) = match app.workflow.notice() {
        Some(notice) => (
            notice.message.clone(),
            match notice.level {
                NoticeLevel::Info => Color::Green,
                NoticeLevel::Error => Color::Red,
            },
        ),
        None if *app.workflow.state() == WorkflowState::ListLoading => {
            (format!("{} Loading content...", app.spinner()), Color::DarkGray)
        }
        None if app.visible_items().is_empty() => ("No content found".to_string(), Color::DarkGray),
        None if app.can_manage() => {
            ("j/k:nav  n:new  d:delete  t:active  ?:help".to_string(), Color::DarkGray)
        }
        None => ("j/k:nav  Enter:view  ?:help  q:quit".to_string(), Color::DarkGray),
    };

    let paragraph = Paragraph::new(text).style(Style::default().fg(color));
    frame.render_widget(paragraph, area);
}

fn render_content_title(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.workflow.state() {
        WorkflowState::DetailLoading(_) => "Loading...",
        state => state
            .item()
            .map(|item| item.title.as_str())
            .unwrap_or("No content selected"),
    };

    let block = Block::default()
        .title(" Content ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let paragraph = Paragraph::new(title)
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn detail_lines(item: &ContentItem) -> Vec<Line<'_>> {
    let label = Style::default().fg(Color::Cyan);
    let mut lines = vec![
        Line::from(vec![Span::styled("Type:      ", label), Span::raw(item.content_type.label())]),
        Line::from(vec![
            Span::styled("Training:  ", label),
            Span::raw(item.training_name.as_deref().unwrap_or("?")),
        ]),
        Line::from(vec![Span::styled("Order:     ", label), Span::raw(item.order.to_string())]),
        Line::from(vec![
            Span::styled("Status:    ", label),
            Span::raw(if item.is_active { "Active" } else { "Inactive" }),
        ]),
        Line::from(vec![Span::styled("Created by ", label), Span::raw(item.creator())]),
    ];
    if let Some(created) = item.created_at {
        lines.push(Line::from(vec![
            Span::styled("Created:   ", label),
            Span::raw(created.format("%Y-%m-%d %H:%M").to_string()),
        ]));
    }
    if let Some(url) = &item.url {
        lines.push(Line::from(vec![Span::styled("URL:       ", label), Span::raw(url.as_str())]));
    }
    if let Some(file_url) = &item.file_url {
        lines.push(Line::from(vec![Span::styled("File:      ", label), Span::raw(file_url.as_str())]));
    }
    if let Some(description) = item.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(Line::raw(""));
        lines.push(Line::raw(description));
    }
    if let Some(text) = &item.text_content {
        lines.push(Line::raw(""));
        lines.push(Line::styled("Text content", label));
        lines.extend(text.lines().map(Line::raw));
    }
    lines
}

fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Details ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let paragraph = match app.workflow.state() {
        WorkflowState::List | WorkflowState::ListLoading => {
            Paragraph::new("Press Enter to view details...")
        }
        WorkflowState::DetailLoading(_) => {
            Paragraph::new(format!("{} Fetching details...", app.spinner()))
        }
        state => match state.item() {
            Some(item) => Paragraph::new(detail_lines(item)),
            None => Paragraph::new(""),
        },
    };

    frame.render_widget(paragraph.block(block).wrap(Wrap { trim: false }), area);
}

fn render_right_status(frame: &mut Frame, app: &App, area: Rect) {
    let status = match app.workflow.state() {
        WorkflowState::DetailView(item) if is_summarizable(item.content_type) => format!(
            "s:summarize ({} words)  +/-:length  l:set length  Esc:close",
            app.max_length
        ),
        WorkflowState::DetailView(item) if item.link().is_some() => {
            "o:open link  Esc:close".to_string()
        }
        WorkflowState::DetailView(_) => "Esc:close".to_string(),
        _ => String::new(),
    };

    let paragraph = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn render_summary(frame: &mut Frame, app: &App) {
    let area = centered_rect(70, 60, frame.area());
    let state = app.workflow.state();
    let title = state
        .item()
        .map(|item| format!(" Summary: {} ", item.title))
        .unwrap_or_else(|| " Summary ".to_string());

    let (body, color) = match app.workflow.displayed_outcome().map(|o| o.kind) {
        Some(OutcomeKind::Success(text)) => (text, Color::White),
        Some(OutcomeKind::Failure(message)) => (message, Color::Red),
        Some(OutcomeKind::Pending) | None => {
            (format!("{} Generating summary...", app.spinner()), Color::DarkGray)
        }
    };

    let requested = state
        .request()
        .map(|r| format!("max {} words, request #{}", r.max_length, app.workflow.highest_issued()))
        .unwrap_or_default();
    let hints = if app.workflow.can_go_back() {
        format!("{requested} | g:regenerate ({} words)  b:back  Esc:close", app.max_length)
    } else {
        format!("{requested} | g:restart ({} words)  Esc:close", app.max_length)
    };

    let block = Block::default()
        .title(title)
        .title_bottom(Line::from(hints).style(Style::default().fg(Color::DarkGray)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let paragraph = Paragraph::new(body)
        .block(block)
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn form_value(app: &App, form: &CreationForm, field: FormField) -> String {
    let draft = form.draft();
    match field {
        FormField::Training => draft
            .training
            .and_then(|id| app.trainings.iter().find(|t| t.id == id))
            .map(|t| t.name.clone())
            .unwrap_or_else(|| "< select a training >".to_string()),
        FormField::Title => draft.title.clone(),
        FormField::Description => draft.description.clone(),
        FormField::ContentType => format!("< {} >", draft.content_type.label()),
        FormField::Url => draft.url.clone(),
        FormField::TextContent => draft.text_content.clone(),
        FormField::File => draft.file.clone(),
        FormField::Order => draft.order.to_string(),
        FormField::IsActive => (if draft.is_active { "< yes >" } else { "< no >" }).to_string(),
    }
}

fn render_form(frame: &mut Frame, app: &App, form: &CreationForm) {
    let area = centered_rect(70, 70, frame.area());
    let focus = form.focus();
    let mut lines = Vec::new();

    for field in form.visible_fields() {
        let focused = field == focus;
        let marker = if focused { "> " } else { "  " };
        let cursor = if focused && !field.is_choice() { "_" } else { "" };
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{:<12}", field.label()), label_style),
            Span::raw(format!("{}{cursor}", form_value(app, form, field))),
        ]));
        for message in form.errors().get(field.api_name()) {
            lines.push(Line::styled(format!("    {message}"), Style::default().fg(Color::Red)));
        }
    }

    let general: Vec<&str> = form
        .errors()
        .iter()
        .filter(|(field, _)| {
            *field == NON_FIELD || !form.visible_fields().iter().any(|f| f.api_name() == *field)
        })
        .flat_map(|(_, messages)| messages.iter().map(String::as_str))
        .collect();
    if !general.is_empty() {
        lines.push(Line::raw(""));
        for message in general {
            lines.push(Line::styled(message.to_string(), Style::default().fg(Color::Red)));
        }
    }

    lines.push(Line::raw(""));
    let footer = if form.is_submitting() {
        format!("{} Saving...", app.spinner())
    } else {
        "Tab:next  Left/Right:choose  Enter:create  Esc:cancel".to_string()
    };
    lines.push(Line::styled(footer, Style::default().fg(Color::DarkGray)));

    let block = Block::default()
        .title(" Create Content ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn render_length_input(frame: &mut Frame, input: &str) {
    let area = centered_rect(50, 20, frame.area());

    let block = Block::default()
        .title(" Summary length in words (50-1000) ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let inner = block.inner(area);

    // Clear the area first
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let input_text = format!("> {}_", input);
    let paragraph = Paragraph::new(input_text).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

fn render_confirm_delete(frame: &mut Frame, app: &App, id: i64) {
    let area = centered_rect(50, 20, frame.area());
    let title = app
        .workflow
        .items()
        .iter()
        .find(|item| item.id == id)
        .map(|item| item.title.as_str())
        .unwrap_or("this content");

    let block = Block::default()
        .title(" Delete ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let paragraph = Paragraph::new(format!("Delete {:?}? (y/n)", title))
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame, app: &App) {
    let area = centered_rect(50, 70, frame.area());

    let mut help_text = vec![
        "",
        " Navigation:",
        "   j / ↓    Move down",
        "   k / ↑    Move up",
        "   Enter    View details",
        "   Esc      Close and refresh list",
        "",
        " Summaries (text and PDF):",
        "   s        Summarize",
        "   g        Regenerate",
        "   b        Back to details",
        "   + / -    Adjust length by 50 words",
        "   l        Type a length",
        "",
        " Actions:",
        "   r        Refresh list",
        "   f        Cycle type filter",
        "   o        Open link in browser",
    ];
    if app.can_manage() {
        help_text.extend([
            "   n        New content",
            "   d        Delete content",
            "   t        Toggle active",
        ]);
    }
    help_text.extend(["", " General:", "   ?        Toggle this help", "   q        Quit", "", " Press any key to close"]);

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popup_is_centered_inside_area() {
        let outer = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(50, 20, outer);
        assert_eq!(popup.width, 50);
        assert_eq!(popup.x, 25);
        assert!(popup.y > 0 && popup.bottom() < outer.bottom());
    }
}
