//! Note form state for create and edit flows.
//!
//! The form collects a title, a markdown body and a tag selection, and turns
//! them into a [`NoteData`] on submit. Whether that payload creates a new
//! note or updates an existing one is up to the caller.

use anyhow::Result;
use thiserror::Error;
use tracing::debug;

use crate::models::{NoteData, NoteWithTags, Tag};
use crate::service::NoteService;

/// Validation failures reported by the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Title cannot be empty")]
    EmptyTitle,
    #[error("Body cannot be empty")]
    EmptyBody,
    #[error("Tag label cannot be empty")]
    EmptyTagLabel,
}

/// Editable fields of the form, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Tags,
    Body,
}

impl FormField {
    /// Returns the next field in Tab order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            FormField::Title => FormField::Tags,
            FormField::Tags => FormField::Body,
            FormField::Body => FormField::Title,
        }
    }

    /// Returns the previous field in Tab order, wrapping around.
    pub fn prev(self) -> Self {
        match self {
            FormField::Title => FormField::Body,
            FormField::Tags => FormField::Title,
            FormField::Body => FormField::Tags,
        }
    }
}

/// In-progress note form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteForm {
    title: String,
    markdown: String,
    selected_tags: Vec<Tag>,
    /// Label typed into the tag picker, used for ad hoc tag creation
    tag_input: String,
}

impl NoteForm {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a form with the given field values.
    pub fn prefilled(
        title: impl Into<String>,
        markdown: impl Into<String>,
        tags: Vec<Tag>,
    ) -> Self {
        Self {
            title: title.into(),
            markdown: markdown.into(),
            selected_tags: tags,
            tag_input: String::new(),
        }
    }

    /// Creates a form prefilled from an existing note.
    pub fn from_note(note: &NoteWithTags) -> Self {
        Self::prefilled(note.title.clone(), note.markdown.clone(), note.tags.clone())
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    pub fn selected_tags(&self) -> &[Tag] {
        &self.selected_tags
    }

    pub fn tag_input(&self) -> &str {
        &self.tag_input
    }

    /// Appends a character to `field`.
    ///
    /// For [`FormField::Tags`] the character goes to the tag label input.
    pub fn push_char(&mut self, field: FormField, c: char) {
        self.buffer_mut(field).push(c);
    }

    /// Removes the last character of `field`.
    pub fn pop_char(&mut self, field: FormField) {
        self.buffer_mut(field).pop();
    }

    fn buffer_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Title => &mut self.title,
            FormField::Tags => &mut self.tag_input,
            FormField::Body => &mut self.markdown,
        }
    }

    /// Adds `tag` to the selection, or removes it if already selected.
    pub fn toggle_tag(&mut self, tag: &Tag) {
        if let Some(pos) = self.selected_tags.iter().position(|t| t.id == tag.id) {
            self.selected_tags.remove(pos);
        } else {
            self.selected_tags.push(tag.clone());
        }
    }

    /// Returns whether a tag with `tag`'s id is selected.
    pub fn is_selected(&self, tag: &Tag) -> bool {
        self.selected_tags.iter().any(|t| t.id == tag.id)
    }

    /// Creates a tag from the typed label and selects it.
    ///
    /// The tag gets a fresh id and is registered with `service` immediately,
    /// so it persists and becomes available to other notes even if the form
    /// is never submitted. Clears the label input on success.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::EmptyTagLabel`] if the label is blank, or the
    /// service's error if the tag cannot be saved.
    pub fn create_tag(&mut self, service: &mut NoteService) -> Result<Tag> {
        if self.tag_input.trim().is_empty() {
            return Err(FormError::EmptyTagLabel.into());
        }

        let tag = service.create_tag(&self.tag_input)?;
        debug!(tag_id = %tag.id, "selected newly created tag");
        self.selected_tags.push(tag.clone());
        self.tag_input.clear();
        Ok(tag)
    }

    /// Validates the required fields and packages the payload.
    ///
    /// # Examples
    ///
    /// ```
    /// use marknote::form::{FormError, FormField, NoteForm};
    ///
    /// let mut form = NoteForm::new();
    /// assert_eq!(form.submit(), Err(FormError::EmptyTitle));
    ///
    /// "Buy milk".chars().for_each(|c| form.push_char(FormField::Title, c));
    /// "today".chars().for_each(|c| form.push_char(FormField::Body, c));
    /// let data = form.submit().unwrap();
    /// assert_eq!(data.title, "Buy milk");
    /// ```
    pub fn submit(&self) -> Result<NoteData, FormError> {
        if self.title.trim().is_empty() {
            return Err(FormError::EmptyTitle);
        }
        if self.markdown.trim().is_empty() {
            return Err(FormError::EmptyBody);
        }

        Ok(NoteData::new(
            self.title.clone(),
            self.markdown.clone(),
            self.selected_tags.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NoteId, TagId};
    use crate::store::MemoryStorage;
    use std::rc::Rc;

    fn type_into(form: &mut NoteForm, field: FormField, text: &str) {
        for c in text.chars() {
            form.push_char(field, c);
        }
    }

    #[test]
    fn field_focus_cycles_both_ways() {
        assert_eq!(FormField::Title.next(), FormField::Tags);
        assert_eq!(FormField::Body.next(), FormField::Title);
        assert_eq!(FormField::Title.prev(), FormField::Body);
        assert_eq!(FormField::Tags.prev(), FormField::Title);
    }

    #[test]
    fn submit_rejects_blank_required_fields() {
        let mut form = NoteForm::new();
        type_into(&mut form, FormField::Title, "   ");
        assert_eq!(form.submit(), Err(FormError::EmptyTitle));

        let mut form = NoteForm::new();
        type_into(&mut form, FormField::Title, "title");
        type_into(&mut form, FormField::Body, "\n\n");
        assert_eq!(form.submit(), Err(FormError::EmptyBody));
    }

    #[test]
    fn submit_packages_selected_tags() {
        let work = Tag::new(TagId::new("1"), "work");
        let mut form = NoteForm::new();
        type_into(&mut form, FormField::Title, "Standup");
        type_into(&mut form, FormField::Body, "# Notes\n- item");
        form.toggle_tag(&work);

        let data = form.submit().unwrap();
        assert_eq!(data.title, "Standup");
        assert_eq!(data.markdown, "# Notes\n- item");
        assert_eq!(data.tags, vec![work]);
    }

    #[test]
    fn pop_char_edits_the_right_buffer() {
        let mut form = NoteForm::new();
        type_into(&mut form, FormField::Title, "ab");
        type_into(&mut form, FormField::Tags, "cd");
        form.pop_char(FormField::Tags);

        assert_eq!(form.title(), "ab");
        assert_eq!(form.tag_input(), "c");
        assert_eq!(form.markdown(), "");
    }

    #[test]
    fn from_note_prefills_every_field() {
        let note = NoteWithTags {
            id: NoteId::new("A"),
            title: "Buy milk".to_string(),
            markdown: "*soon*".to_string(),
            tags: vec![Tag::new(TagId::new("1"), "work")],
        };

        let form = NoteForm::from_note(&note);
        assert_eq!(form.title(), "Buy milk");
        assert_eq!(form.markdown(), "*soon*");
        assert_eq!(form.selected_tags(), note.tags.as_slice());
    }

    #[test]
    fn create_tag_registers_and_selects() {
        let mut service = NoteService::new(Rc::new(MemoryStorage::new())).unwrap();
        let mut form = NoteForm::new();
        type_into(&mut form, FormField::Tags, "ideas");

        let tag = form.create_tag(&mut service).unwrap();

        assert_eq!(tag.label, "ideas");
        assert_eq!(service.tags(), &[tag.clone()]);
        assert!(form.is_selected(&tag));
        assert!(form.tag_input().is_empty());
    }

    #[test]
    fn create_tag_rejects_blank_label() {
        let mut service = NoteService::new(Rc::new(MemoryStorage::new())).unwrap();
        let mut form = NoteForm::new();

        let err = form.create_tag(&mut service).unwrap_err();
        assert_eq!(
            err.downcast_ref::<FormError>(),
            Some(&FormError::EmptyTagLabel)
        );
        assert!(service.tags().is_empty());
    }
}
