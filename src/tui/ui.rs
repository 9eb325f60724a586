//! UI rendering functions for the TUI.
//!
//! One screen per route: the filterable list (with its tag edit panel), the
//! note form, and the rendered note.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use super::app::{App, Focus};
use crate::form::FormField;
use crate::models::Tag;
use crate::route::Route;

/// Main rendering function for the TUI.
pub fn draw(frame: &mut Frame, app: &App) {
    match app.route() {
        Route::List => draw_list(frame, app),
        Route::New | Route::Edit(_) => draw_form(frame, app),
        Route::Detail(_) => draw_detail(frame, app),
    }
}

fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn focused_block(title: &str, is_focused: bool) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style(is_focused))
}

/// Builds badge spans for tags, separated by spaces.
fn tag_badges(tags: &[Tag]) -> Vec<Span<'static>> {
    let badge = Style::default().fg(Color::Black).bg(Color::Blue);
    let mut spans = Vec::new();
    for (i, tag) in tags.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(format!(" {} ", tag.label), badge));
    }
    spans
}

/// Builds a row of selectable tags with a cursor and selection markers.
fn tag_picker_line(
    tags: &[Tag],
    cursor: usize,
    is_focused: bool,
    is_selected: impl Fn(&Tag) -> bool,
) -> Line<'static> {
    if tags.is_empty() {
        return Line::from(Span::styled(
            "no tags",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
    }

    let mut spans = Vec::new();
    for (i, tag) in tags.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        let marker = if is_selected(tag) { "[x]" } else { "[ ]" };
        let mut style = Style::default();
        if is_selected(tag) {
            style = style.fg(Color::Cyan);
        }
        if is_focused && i == cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        spans.push(Span::styled(format!("{marker} {}", tag.label), style));
    }
    Line::from(spans)
}

/// Renders the list screen: filters, notes, shortcut bar, and the tag edit
/// panel on top when open.
fn draw_list(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title filter
            Constraint::Length(3), // Tag filter
            Constraint::Min(0),    // Notes
            Constraint::Length(1), // Shortcut bar
        ])
        .split(frame.area());

    let title_focused = app.focus() == Focus::TitleFilter && app.tag_editor().is_none();
    let mut title = app.filter().title.clone();
    if title_focused {
        title.push('█');
    }
    frame.render_widget(
        Paragraph::new(title).block(focused_block("Title", title_focused)),
        chunks[0],
    );

    let tags_focused = app.focus() == Focus::TagFilter && app.tag_editor().is_none();
    let picker = tag_picker_line(
        app.available_tags(),
        app.filter_tag_cursor(),
        tags_focused,
        |tag| app.filter().is_selected(tag),
    );
    frame.render_widget(
        Paragraph::new(picker).block(focused_block("Tags", tags_focused)),
        chunks[1],
    );

    render_note_list(frame, app, chunks[2]);

    let bar = match app.focus() {
        Focus::TitleFilter => {
            "type: filter | Tab: next panel | Ctrl+N: new note | Ctrl+T: edit tags | Ctrl+C: quit"
        }
        Focus::TagFilter => {
            "←/→: move | Space: toggle | Tab: next panel | Ctrl+N: new note | Ctrl+C: quit"
        }
        Focus::NoteList => {
            "j/k: navigate | Enter: open | n: new | t: edit tags | Esc: reset | q: quit"
        }
    };
    render_status_bar(frame, app, chunks[3], bar);

    if app.tag_editor().is_some() {
        render_tag_editor(frame, app);
    }
}

/// Renders the filtered notes with their tag badges.
fn render_note_list(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focus() == Focus::NoteList && app.tag_editor().is_none();
    let notes = app.visible_notes();
    let total = app.service().notes().len();

    let items: Vec<ListItem> = notes
        .iter()
        .map(|note| {
            let mut spans = vec![Span::styled(
                note.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )];
            if !note.tags.is_empty() {
                spans.push(Span::raw("  "));
                spans.extend(tag_badges(&note.tags));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = if app.filter().is_empty() {
        format!("My Notes ({total})")
    } else {
        format!("My Notes ({}/{})", notes.len(), total)
    };
    let list = List::new(items)
        .block(focused_block(&title, is_focused))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::REVERSED),
        );

    let mut list_state = ListState::default();
    list_state.select(app.selected_index());

    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Renders the tag edit panel as a centered overlay.
fn render_tag_editor(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 60, frame.area());
    let cursor = app.tag_editor().map(|editor| editor.cursor()).unwrap_or(0);

    let items: Vec<ListItem> = app
        .available_tags()
        .iter()
        .map(|tag| ListItem::new(tag.label.clone()))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Edit Tags (type: rename | Del: delete | ↑/↓: move | Esc: close)")
        .border_style(Style::default().fg(Color::Cyan));

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    if !app.available_tags().is_empty() {
        state.select(Some(cursor));
    }

    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut state);
}

/// Renders the new/edit form.
fn draw_form(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(4), // Tags
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Shortcut bar
        ])
        .split(frame.area());

    let heading = match app.route() {
        Route::Edit(_) => "Edit Note",
        _ => "New Note",
    };
    let form = app.form();
    let field = app.form_field();

    let mut title = form.title().to_string();
    if field == FormField::Title {
        title.push('█');
    }
    frame.render_widget(
        Paragraph::new(title).block(focused_block(heading, field == FormField::Title)),
        chunks[0],
    );

    let tags_focused = field == FormField::Tags;
    let picker = tag_picker_line(
        app.available_tags(),
        app.form_tag_cursor(),
        tags_focused,
        |tag| form.is_selected(tag),
    );
    let mut input = vec![Span::raw("new tag: "), Span::raw(form.tag_input().to_string())];
    if tags_focused {
        input.push(Span::raw("█"));
    }
    frame.render_widget(
        Paragraph::new(Text::from(vec![picker, Line::from(input)]))
            .block(focused_block("Tags", tags_focused)),
        chunks[1],
    );

    let mut body = form.markdown().to_string();
    if field == FormField::Body {
        body.push('█');
    }
    frame.render_widget(
        Paragraph::new(body)
            .block(focused_block("Body", field == FormField::Body))
            .wrap(Wrap { trim: false }),
        chunks[2],
    );

    let bar = match field {
        FormField::Tags => {
            "←/→: move | Enter: toggle or create | Tab: next field | Ctrl+S: save | Esc: cancel"
        }
        FormField::Title | FormField::Body => "Tab: next field | Ctrl+S: save | Esc: cancel",
    };
    render_status_bar(frame, app, chunks[3], bar);
}

/// Renders one note: title, tags and markdown body.
fn draw_detail(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Shortcut bar
        ])
        .split(frame.area());

    let Some(note) = app.current_note() else {
        frame.render_widget(Paragraph::new("Note not found"), chunks[1]);
        return;
    };

    let header = Text::from(vec![
        Line::from(Span::styled(
            note.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(tag_badges(&note.tags)),
    ]);
    frame.render_widget(
        Paragraph::new(header).block(Block::default().borders(Borders::ALL)),
        chunks[0],
    );

    let body = tui_markdown::from_str(&note.markdown);
    frame.render_widget(
        Paragraph::new(body)
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: false })
            .scroll((app.detail_scroll(), 0)),
        chunks[1],
    );

    render_status_bar(
        frame,
        app,
        chunks[2],
        "e: edit | d: delete | b: back | j/k: scroll | q: quit",
    );
}

/// Renders the bottom bar: the status message if any, otherwise shortcuts.
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect, shortcuts: &str) {
    let line = match app.status() {
        Some(message) => Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Yellow),
        )),
        None => Line::from(Span::styled(
            shortcuts.to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Returns a rectangle of the given percentage size centered in `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
