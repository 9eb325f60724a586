//! Keyboard event handling for the TUI.
//!
//! Maps crossterm keyboard events to application state changes. Key meaning
//! depends on the current route and, on the list screen, on the focused
//! panel.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Focus};
use crate::form::FormField;
use crate::route::Route;

/// Handles a keyboard event and updates the app state accordingly.
///
/// Returns `Ok(true)` if the application should quit.
///
/// # Event Handling
///
/// - `Ctrl+C`: quit from anywhere
/// - List: `Tab`/`Shift+Tab` cycle panels, `Ctrl+N` new note, `Ctrl+T` edit
///   tags, `Esc` reset; `q` quits when the note list is focused
/// - Form: `Tab`/`Shift+Tab` cycle fields, `Ctrl+S` save, `Esc` cancel
/// - Detail: `e` edit, `d` delete, `b`/`Esc` back, `j`/`k` scroll, `q` quit
///
/// # Errors
///
/// Returns an error if a mutation cannot be persisted.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use marknote::NoteService;
/// use marknote::store::MemoryStorage;
/// use marknote::tui::{App, event::handle_key_event};
/// use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
///
/// # fn main() -> anyhow::Result<()> {
/// let mut app = App::new(NoteService::new(Rc::new(MemoryStorage::new()))?);
/// let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
/// assert!(handle_key_event(&mut app, key)?);
/// # Ok(())
/// # }
/// ```
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<bool> {
    if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
        return Ok(true);
    }

    app.clear_status();

    match app.route().clone() {
        Route::List if app.tag_editor().is_some() => {
            handle_tag_editor(app, key)?;
            Ok(false)
        }
        Route::List => Ok(handle_list(app, key)),
        Route::New | Route::Edit(_) => {
            handle_form(app, key)?;
            Ok(false)
        }
        Route::Detail(_) => handle_detail(app, key),
    }
}

/// Returns whether `key` is plain text input (no modifiers besides Shift).
fn is_text_input(key: &KeyEvent) -> bool {
    key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT
}

/// Handles keys on the list screen. Returns `true` to quit.
fn handle_list(app: &mut App, key: KeyEvent) -> bool {
    if key.modifiers == KeyModifiers::CONTROL {
        match key.code {
            KeyCode::Char('n') => app.navigate(Route::New),
            KeyCode::Char('t') => app.open_tag_editor(),
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Tab => {
            app.next_focus();
            return false;
        }
        KeyCode::BackTab => {
            app.prev_focus();
            return false;
        }
        KeyCode::Esc => {
            app.reset_focus();
            return false;
        }
        _ => {}
    }

    match app.focus() {
        Focus::TitleFilter => match key.code {
            KeyCode::Char(c) if is_text_input(&key) => app.push_filter_char(c),
            KeyCode::Backspace => app.pop_filter_char(),
            _ => {}
        },
        Focus::TagFilter => match key.code {
            KeyCode::Left | KeyCode::Char('h') => app.move_filter_tag_cursor(-1),
            KeyCode::Right | KeyCode::Char('l') => app.move_filter_tag_cursor(1),
            KeyCode::Char(' ') | KeyCode::Enter => app.toggle_filter_tag(),
            _ => {}
        },
        Focus::NoteList => match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('j') | KeyCode::Down => app.select_next(),
            KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
            KeyCode::Enter => app.open_selected(),
            KeyCode::Char('n') => app.navigate(Route::New),
            KeyCode::Char('t') => app.open_tag_editor(),
            _ => {}
        },
    }

    false
}

/// Handles keys while the tag edit panel is open.
///
/// Typing edits the highlighted label in place; `Delete` removes the tag.
fn handle_tag_editor(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Esc => app.close_tag_editor(),
        KeyCode::Up => app.move_tag_editor_cursor(-1),
        KeyCode::Down => app.move_tag_editor_cursor(1),
        KeyCode::Delete => app.delete_edited_tag()?,
        KeyCode::Backspace => app.pop_tag_label_char()?,
        KeyCode::Char(c) if is_text_input(&key) => app.push_tag_label_char(c)?,
        _ => {}
    }
    Ok(())
}

/// Handles keys on the new/edit form.
fn handle_form(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.modifiers == KeyModifiers::CONTROL {
        if key.code == KeyCode::Char('s') {
            app.submit_form()?;
        }
        return Ok(());
    }

    match key.code {
        KeyCode::Tab => app.next_form_field(),
        KeyCode::BackTab => app.prev_form_field(),
        KeyCode::Esc => app.cancel_form(),
        KeyCode::Backspace => app.pop_form_char(),
        _ => match app.form_field() {
            FormField::Title => {
                if let KeyCode::Char(c) = key.code
                    && is_text_input(&key)
                {
                    app.push_form_char(c);
                }
            }
            FormField::Tags => match key.code {
                KeyCode::Left => app.move_form_tag_cursor(-1),
                KeyCode::Right => app.move_form_tag_cursor(1),
                KeyCode::Enter if app.form().tag_input().is_empty() => app.toggle_form_tag(),
                KeyCode::Enter => app.create_form_tag()?,
                KeyCode::Char(c) if is_text_input(&key) => app.push_form_char(c),
                _ => {}
            },
            FormField::Body => match key.code {
                KeyCode::Enter => app.push_form_char('\n'),
                KeyCode::Char(c) if is_text_input(&key) => app.push_form_char(c),
                _ => {}
            },
        },
    }
    Ok(())
}

/// Handles keys on the detail screen. Returns `true` to quit.
fn handle_detail(app: &mut App, key: KeyEvent) -> Result<bool> {
    let Some(id) = app.route().note_id().cloned() else {
        return Ok(false);
    };

    match key.code {
        KeyCode::Char('q') => return Ok(true),
        KeyCode::Char('e') => app.navigate(Route::Edit(id)),
        KeyCode::Char('d') => app.delete_current_note()?,
        KeyCode::Char('b') | KeyCode::Esc => app.navigate(Route::List),
        KeyCode::Char('j') | KeyCode::Down => app.scroll_detail_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_detail_up(1),
        _ => {}
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NoteData, Tag, TagId};
    use crate::service::NoteService;
    use crate::store::MemoryStorage;
    use std::rc::Rc;

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    fn ctrl(app: &mut App, c: char) -> bool {
        handle_key_event(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)).unwrap()
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn app() -> App {
        let mut service = NoteService::new(Rc::new(MemoryStorage::new())).unwrap();
        let work = Tag::new(TagId::new("1"), "work");
        service.add_tag(work.clone()).unwrap();
        service
            .create_note(NoteData::new("Buy milk", "# Milk\n\ntwo litres", vec![work]))
            .unwrap();
        service
            .create_note(NoteData::new("Call mum", "sunday", vec![]))
            .unwrap();
        App::new(service)
    }

    #[test]
    fn ctrl_c_quits_from_any_route() {
        let mut app = app();
        assert!(ctrl(&mut app, 'c'));

        app.navigate(Route::New);
        assert!(ctrl(&mut app, 'c'));
    }

    #[test]
    fn q_is_text_in_title_filter() {
        let mut app = app();
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.filter().title, "q");
    }

    #[test]
    fn q_quits_from_note_list() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus(), Focus::NoteList);
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn typing_then_enter_opens_filtered_note() {
        let mut app = app();
        type_text(&mut app, "MUM");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);

        let note = app.current_note().expect("detail should show a note");
        assert_eq!(note.title, "Call mum");
    }

    #[test]
    fn tag_filter_space_toggles_selection() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus(), Focus::TagFilter);

        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.visible_notes().len(), 1);

        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.visible_notes().len(), 2);
    }

    #[test]
    fn esc_on_list_resets_focus_and_selection() {
        let mut app = app();
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focus(), Focus::NoteList);
        assert_eq!(app.selected_index(), Some(0));

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.focus(), Focus::TitleFilter);
        assert_eq!(app.selected_index(), None);
    }

    #[test]
    fn full_create_flow_through_keys() {
        let mut app = app();
        ctrl(&mut app, 'n');
        assert_eq!(app.route(), &Route::New);

        type_text(&mut app, "Quarterly plan");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "planning");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "# Goals");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "- ship");
        ctrl(&mut app, 's');

        assert_eq!(app.route(), &Route::List);
        let notes = app.service().notes_with_tags();
        let created = notes.last().unwrap();
        assert_eq!(created.title, "Quarterly plan");
        assert_eq!(created.markdown, "# Goals\n- ship");
        assert_eq!(created.tags.len(), 1);
        assert_eq!(created.tags[0].label, "planning");
    }

    #[test]
    fn esc_on_form_cancels() {
        let mut app = app();
        ctrl(&mut app, 'n');
        type_text(&mut app, "draft");
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.route(), &Route::List);
        assert_eq!(app.service().notes().len(), 2);
    }

    #[test]
    fn detail_edit_and_back() {
        let mut app = app();
        let id = app.service().notes()[0].id.clone();
        app.navigate(Route::Detail(id.clone()));

        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.route(), &Route::Edit(id.clone()));

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.route(), &Route::Detail(id));

        press(&mut app, KeyCode::Char('b'));
        assert_eq!(app.route(), &Route::List);
    }

    #[test]
    fn detail_delete_returns_to_list() {
        let mut app = app();
        let id = app.service().notes()[0].id.clone();
        app.navigate(Route::Detail(id.clone()));

        press(&mut app, KeyCode::Char('d'));

        assert_eq!(app.route(), &Route::List);
        assert_eq!(app.service().notes().len(), 1);
        assert!(app.service().note_with_tags(&id).is_none());
    }

    #[test]
    fn detail_jk_scrolls() {
        let mut app = app();
        let id = app.service().notes()[0].id.clone();
        app.navigate(Route::Detail(id));

        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.detail_scroll(), 2);
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.detail_scroll(), 1);
    }

    #[test]
    fn tag_editor_keys_rename_and_delete() {
        let mut app = app();
        ctrl(&mut app, 't');
        assert!(app.tag_editor().is_some());

        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "K");
        assert_eq!(app.service().tags()[0].label, "worK");

        press(&mut app, KeyCode::Delete);
        assert!(app.service().tags().is_empty());

        press(&mut app, KeyCode::Esc);
        assert!(app.tag_editor().is_none());
        assert_eq!(app.route(), &Route::List);
    }
}
