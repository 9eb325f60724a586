use anyhow::Result;
use tracing::{info, warn};

use crate::filter::NoteFilter;
use crate::form::{FormError, FormField, NoteForm};
use crate::models::{NoteWithTags, Tag};
use crate::route::Route;
use crate::service::NoteService;

/// Application state for the TUI.
///
/// Owns the note service and the per-screen view state. The current
/// [`Route`] decides which screen is drawn and how keys are interpreted.
pub struct App {
    service: NoteService,
    route: Route,
    /// List screen: title and tag criteria
    filter: NoteFilter,
    /// List screen: focused panel
    focus: Focus,
    /// List screen: index into the filtered notes
    selected_index: Option<usize>,
    /// List screen: cursor over available tags in the tag filter
    filter_tag_cursor: usize,
    /// List screen: tag edit panel, `Some` while open
    tag_editor: Option<TagEditor>,
    /// Form screen state, reset on every navigation to a form route
    form: NoteForm,
    form_field: FormField,
    form_tag_cursor: usize,
    /// Detail screen scroll offset
    detail_scroll: u16,
    /// One-shot message for the status bar
    status: Option<String>,
}

/// Panel focus on the list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Title filter input (typing edits the filter)
    TitleFilter,
    /// Tag filter picker (Left/Right move, Space toggles)
    TagFilter,
    /// Note list (j/k navigation, Enter opens the note)
    NoteList,
}

/// Open tag edit panel. Its only state is the highlighted row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TagEditor {
    cursor: usize,
}

impl TagEditor {
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl App {
    /// Creates an App on the list route.
    pub fn new(service: NoteService) -> Self {
        Self {
            service,
            route: Route::List,
            filter: NoteFilter::default(),
            focus: Focus::TitleFilter,
            selected_index: None,
            filter_tag_cursor: 0,
            tag_editor: None,
            form: NoteForm::new(),
            form_field: FormField::Title,
            form_tag_cursor: 0,
            detail_scroll: 0,
            status: None,
        }
    }

    pub fn service(&self) -> &NoteService {
        &self.service
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn filter(&self) -> &NoteFilter {
        &self.filter
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn filter_tag_cursor(&self) -> usize {
        self.filter_tag_cursor
    }

    pub fn tag_editor(&self) -> Option<&TagEditor> {
        self.tag_editor.as_ref()
    }

    pub fn form(&self) -> &NoteForm {
        &self.form
    }

    pub fn form_field(&self) -> FormField {
        self.form_field
    }

    pub fn form_tag_cursor(&self) -> usize {
        self.form_tag_cursor
    }

    pub fn detail_scroll(&self) -> u16 {
        self.detail_scroll
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Returns all tags known to the service.
    pub fn available_tags(&self) -> &[Tag] {
        self.service.tags()
    }

    /// Returns the notes passing the current filter, in canonical order.
    pub fn visible_notes(&self) -> Vec<NoteWithTags> {
        self.service
            .notes_with_tags()
            .into_iter()
            .filter(|note| self.filter.matches(note))
            .collect()
    }

    /// Returns the highlighted note on the list screen, if any.
    pub fn selected_note(&self) -> Option<NoteWithTags> {
        let index = self.selected_index?;
        self.visible_notes().into_iter().nth(index)
    }

    /// Returns the note the current route is about, if it still exists.
    pub fn current_note(&self) -> Option<NoteWithTags> {
        self.route
            .note_id()
            .and_then(|id| self.service.note_with_tags(id))
    }

    /// Switches to `route`, resetting the target screen's state.
    ///
    /// Detail and edit routes whose note no longer exists fall back to the
    /// list.
    pub fn navigate(&mut self, route: Route) {
        let missing = route
            .note_id()
            .is_some_and(|id| self.service.note_with_tags(id).is_none());
        let route = if missing {
            warn!(path = %route, "note not found, returning to list");
            Route::List
        } else {
            route
        };

        match &route {
            Route::List => {
                self.selected_index = None;
                self.tag_editor = None;
                self.clamp_filter_tag_cursor();
            }
            Route::New => self.reset_form(NoteForm::new()),
            Route::Edit(id) => {
                let form = self
                    .service
                    .note_with_tags(id)
                    .map(|note| NoteForm::from_note(&note))
                    .unwrap_or_default();
                self.reset_form(form);
            }
            Route::Detail(_) => self.detail_scroll = 0,
        }

        self.route = route;
    }

    fn reset_form(&mut self, form: NoteForm) {
        self.form = form;
        self.form_field = FormField::Title;
        self.form_tag_cursor = 0;
    }

    // --- List screen ---

    /// Cycles list focus: `TitleFilter` -> `TagFilter` -> `NoteList`.
    pub fn next_focus(&mut self) {
        self.focus = match self.focus {
            Focus::TitleFilter => Focus::TagFilter,
            Focus::TagFilter => Focus::NoteList,
            Focus::NoteList => Focus::TitleFilter,
        };
        self.auto_select_on_note_list_focus();
    }

    /// Cycles list focus in reverse order.
    pub fn prev_focus(&mut self) {
        self.focus = match self.focus {
            Focus::TitleFilter => Focus::NoteList,
            Focus::TagFilter => Focus::TitleFilter,
            Focus::NoteList => Focus::TagFilter,
        };
        self.auto_select_on_note_list_focus();
    }

    fn auto_select_on_note_list_focus(&mut self) {
        if self.focus == Focus::NoteList
            && self.selected_index.is_none()
            && !self.visible_notes().is_empty()
        {
            self.selected_index = Some(0);
        }
    }

    /// Returns focus to the title filter and clears the selection.
    pub fn reset_focus(&mut self) {
        self.focus = Focus::TitleFilter;
        self.selected_index = None;
    }

    /// Moves the selection down, wrapping to the top.
    pub fn select_next(&mut self) {
        let len = self.visible_notes().len();
        if len == 0 {
            self.selected_index = None;
            return;
        }

        self.selected_index = Some(match self.selected_index {
            None => 0,
            Some(i) if i + 1 >= len => 0,
            Some(i) => i + 1,
        });
    }

    /// Moves the selection up, wrapping to the bottom.
    pub fn select_previous(&mut self) {
        let len = self.visible_notes().len();
        if len == 0 {
            self.selected_index = None;
            return;
        }

        self.selected_index = Some(match self.selected_index {
            None | Some(0) => len - 1,
            Some(i) => i - 1,
        });
    }

    /// Appends a character to the title filter.
    pub fn push_filter_char(&mut self, c: char) {
        self.filter.title.push(c);
        self.selected_index = None;
    }

    /// Removes the last character of the title filter.
    pub fn pop_filter_char(&mut self) {
        self.filter.title.pop();
        self.selected_index = None;
    }

    /// Moves the tag filter cursor by `delta`, wrapping around.
    pub fn move_filter_tag_cursor(&mut self, delta: isize) {
        self.filter_tag_cursor = wrap(self.filter_tag_cursor, delta, self.service.tags().len());
    }

    /// Toggles the tag under the tag filter cursor.
    pub fn toggle_filter_tag(&mut self) {
        if let Some(tag) = self.service.tags().get(self.filter_tag_cursor).cloned() {
            self.filter.toggle_tag(&tag);
            self.selected_index = None;
        }
    }

    fn clamp_filter_tag_cursor(&mut self) {
        let len = self.service.tags().len();
        if self.filter_tag_cursor >= len {
            self.filter_tag_cursor = len.saturating_sub(1);
        }
    }

    /// Opens the highlighted note's detail screen.
    pub fn open_selected(&mut self) {
        if let Some(note) = self.selected_note() {
            self.navigate(Route::Detail(note.id));
        }
    }

    // --- Tag edit panel ---

    pub fn open_tag_editor(&mut self) {
        self.tag_editor = Some(TagEditor::default());
    }

    pub fn close_tag_editor(&mut self) {
        self.tag_editor = None;
    }

    /// Moves the tag edit panel cursor by `delta`, wrapping around.
    pub fn move_tag_editor_cursor(&mut self, delta: isize) {
        let len = self.service.tags().len();
        if let Some(editor) = self.tag_editor.as_mut() {
            editor.cursor = wrap(editor.cursor, delta, len);
        }
    }

    fn edited_tag(&self) -> Option<Tag> {
        let editor = self.tag_editor?;
        self.service.tags().get(editor.cursor).cloned()
    }

    /// Appends a character to the highlighted tag's label.
    ///
    /// Every keystroke is a rename through the service, so it is persisted
    /// immediately.
    pub fn push_tag_label_char(&mut self, c: char) -> Result<()> {
        if let Some(tag) = self.edited_tag() {
            let mut label = tag.label;
            label.push(c);
            self.service.update_tag(&tag.id, &label)?;
            self.sync_filter_labels();
        }
        Ok(())
    }

    /// Removes the last character of the highlighted tag's label.
    pub fn pop_tag_label_char(&mut self) -> Result<()> {
        if let Some(tag) = self.edited_tag() {
            let mut label = tag.label;
            label.pop();
            self.service.update_tag(&tag.id, &label)?;
            self.sync_filter_labels();
        }
        Ok(())
    }

    /// Deletes the highlighted tag.
    ///
    /// Notes keep their reference to it; the tag is also dropped from the
    /// active filter since it can no longer be selected.
    pub fn delete_edited_tag(&mut self) -> Result<()> {
        if let Some(tag) = self.edited_tag() {
            self.service.delete_tag(&tag.id)?;
            if self.filter.is_selected(&tag) {
                self.filter.toggle_tag(&tag);
            }
            let len = self.service.tags().len();
            if let Some(editor) = self.tag_editor.as_mut()
                && editor.cursor >= len
            {
                editor.cursor = len.saturating_sub(1);
            }
            self.clamp_filter_tag_cursor();
            self.selected_index = None;
        }
        Ok(())
    }

    /// Refreshes labels of selected filter tags after a rename.
    fn sync_filter_labels(&mut self) {
        let tags = self.service.tags();
        for selected in &mut self.filter.tags {
            if let Some(current) = tags.iter().find(|t| t.id == selected.id) {
                selected.label = current.label.clone();
            }
        }
    }

    // --- Form screen ---

    pub fn next_form_field(&mut self) {
        self.form_field = self.form_field.next();
    }

    pub fn prev_form_field(&mut self) {
        self.form_field = self.form_field.prev();
    }

    pub fn push_form_char(&mut self, c: char) {
        self.form.push_char(self.form_field, c);
    }

    pub fn pop_form_char(&mut self) {
        self.form.pop_char(self.form_field);
    }

    /// Moves the form's tag cursor by `delta`, wrapping around.
    pub fn move_form_tag_cursor(&mut self, delta: isize) {
        self.form_tag_cursor = wrap(self.form_tag_cursor, delta, self.service.tags().len());
    }

    /// Toggles the tag under the form's tag cursor.
    pub fn toggle_form_tag(&mut self) {
        if let Some(tag) = self.service.tags().get(self.form_tag_cursor).cloned() {
            self.form.toggle_tag(&tag);
        }
    }

    /// Creates a tag from the typed label and selects it in the form.
    ///
    /// A blank label is reported on the status bar rather than as an error.
    pub fn create_form_tag(&mut self) -> Result<()> {
        match self.form.create_tag(&mut self.service) {
            Ok(tag) => {
                self.set_status(format!("Created tag \"{}\"", tag.label));
                Ok(())
            }
            Err(e) => {
                if let Some(form_error) = e.downcast_ref::<FormError>() {
                    self.set_status(form_error.to_string());
                    return Ok(());
                }
                Err(e)
            }
        }
    }

    /// Submits the form: creates on `/new`, updates on `/:id/edit`, then
    /// navigates one level up.
    ///
    /// Validation failures are reported on the status bar and keep the form
    /// open.
    pub fn submit_form(&mut self) -> Result<()> {
        let data = match self.form.submit() {
            Ok(data) => data,
            Err(e) => {
                self.set_status(e.to_string());
                return Ok(());
            }
        };

        match self.route.clone() {
            Route::New => {
                let note = self.service.create_note(data)?;
                info!(note_id = %note.id, "note saved from form");
            }
            Route::Edit(id) => self.service.update_note(&id, data)?,
            Route::List | Route::Detail(_) => return Ok(()),
        }

        let parent = self.route.parent();
        self.navigate(parent);
        Ok(())
    }

    /// Leaves the form without saving.
    pub fn cancel_form(&mut self) {
        let parent = self.route.parent();
        self.navigate(parent);
    }

    // --- Detail screen ---

    pub fn scroll_detail_down(&mut self, amount: u16) {
        self.detail_scroll = self.detail_scroll.saturating_add(amount);
    }

    pub fn scroll_detail_up(&mut self, amount: u16) {
        self.detail_scroll = self.detail_scroll.saturating_sub(amount);
    }

    /// Deletes the note on the detail screen and returns to the list.
    pub fn delete_current_note(&mut self) -> Result<()> {
        if let Route::Detail(id) = self.route.clone() {
            self.service.delete_note(&id)?;
            self.navigate(Route::List);
        }
        Ok(())
    }
}

/// Moves `index` by `delta` within `0..len`, wrapping at both ends.
fn wrap(index: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as isize;
    let next = (index as isize + delta).rem_euclid(len);
    next as usize
}
