use std::rc::Rc;

use anyhow::{Context, Result};
use tracing::info;

use crate::models::{Note, NoteBuilder, NoteData, NoteId, NoteWithTags, Tag, TagId};
use crate::store::{Persisted, Storage};

/// Storage key holding the serialized notes collection.
pub const NOTES_KEY: &str = "NOTES";
/// Storage key holding the serialized tags collection.
pub const TAGS_KEY: &str = "TAGS";

/// Application state container.
///
/// Owns the canonical notes and tags, each persisted independently under its
/// own key. Every mutation replaces the whole collection and is written back
/// to storage before the call returns. This service is UI-independent and is
/// shared by the CLI and the TUI.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use marknote::{NoteData, NoteService};
/// use marknote::store::MemoryStorage;
///
/// # fn main() -> anyhow::Result<()> {
/// let mut service = NoteService::new(Rc::new(MemoryStorage::new()))?;
/// let note = service.create_note(NoteData::new("Buy milk", "", vec![]))?;
/// assert_eq!(service.notes().len(), 1);
/// assert_eq!(service.notes()[0].id, note.id);
/// # Ok(())
/// # }
/// ```
pub struct NoteService {
    notes: Persisted<Vec<Note>>,
    tags: Persisted<Vec<Tag>>,
}

impl NoteService {
    /// Loads both collections from `storage`, defaulting each to empty.
    ///
    /// # Errors
    ///
    /// Returns an error if either slot holds malformed text or cannot be read.
    pub fn new(storage: Rc<dyn Storage>) -> Result<Self> {
        let notes = Persisted::with_default(storage.clone(), NOTES_KEY, Vec::new)
            .context("Failed to load notes")?;
        let tags = Persisted::with_default(storage, TAGS_KEY, Vec::new)
            .context("Failed to load tags")?;
        Ok(Self { notes, tags })
    }

    /// Returns the canonical notes in insertion order.
    pub fn notes(&self) -> &[Note] {
        self.notes.get()
    }

    /// Returns the canonical tags in insertion order.
    pub fn tags(&self) -> &[Tag] {
        self.tags.get()
    }

    /// Creates a note from a form payload and appends it.
    ///
    /// Allocates a fresh `NoteId`. The note stores only the ids of
    /// `data.tags`.
    pub fn create_note(&mut self, data: NoteData) -> Result<Note> {
        let note = NoteBuilder::new()
            .tag_ids(data.tag_ids())
            .title(data.title)
            .markdown(data.markdown)
            .build();

        let appended = note.clone();
        self.notes
            .update(|prev| {
                let mut next = prev.clone();
                next.push(appended);
                next
            })
            .context("Failed to save notes")?;

        info!(note_id = %note.id, tags = note.tag_ids.len(), "created note");
        Ok(note)
    }

    /// Replaces title, body and tags of the note with `id`.
    ///
    /// All other notes are untouched. An unknown id leaves the collection
    /// unchanged.
    pub fn update_note(&mut self, id: &NoteId, data: NoteData) -> Result<()> {
        let tag_ids = data.tag_ids();
        self.notes
            .update(|prev| {
                prev.iter()
                    .map(|note| {
                        if &note.id == id {
                            Note {
                                id: note.id.clone(),
                                title: data.title.clone(),
                                markdown: data.markdown.clone(),
                                tag_ids: tag_ids.clone(),
                            }
                        } else {
                            note.clone()
                        }
                    })
                    .collect()
            })
            .context("Failed to save notes")?;

        info!(note_id = %id, "updated note");
        Ok(())
    }

    /// Removes the note with `id`.
    pub fn delete_note(&mut self, id: &NoteId) -> Result<()> {
        self.notes
            .update(|prev| prev.iter().filter(|note| &note.id != id).cloned().collect())
            .context("Failed to save notes")?;

        info!(note_id = %id, "deleted note");
        Ok(())
    }

    /// Appends a tag whose id was assigned by the caller.
    pub fn add_tag(&mut self, tag: Tag) -> Result<()> {
        let tag_id = tag.id.clone();
        self.tags
            .update(|prev| {
                let mut next = prev.clone();
                next.push(tag);
                next
            })
            .context("Failed to save tags")?;

        info!(tag_id = %tag_id, "added tag");
        Ok(())
    }

    /// Builds a tag with a fresh id for `label` and registers it.
    pub fn create_tag(&mut self, label: &str) -> Result<Tag> {
        let tag = Tag::with_fresh_id(label);
        self.add_tag(tag.clone())?;
        Ok(tag)
    }

    /// Sets the label of the tag with `id`.
    ///
    /// Every note referencing `id` observes the new label on its next
    /// resolution.
    pub fn update_tag(&mut self, id: &TagId, label: &str) -> Result<()> {
        self.tags
            .update(|prev| {
                prev.iter()
                    .map(|tag| {
                        if &tag.id == id {
                            Tag::new(tag.id.clone(), label)
                        } else {
                            tag.clone()
                        }
                    })
                    .collect()
            })
            .context("Failed to save tags")?;

        info!(tag_id = %id, "renamed tag");
        Ok(())
    }

    /// Removes the tag with `id` from the tag collection.
    ///
    /// Notes keep their reference; it resolves to nothing from now on.
    pub fn delete_tag(&mut self, id: &TagId) -> Result<()> {
        self.tags
            .update(|prev| prev.iter().filter(|tag| &tag.id != id).cloned().collect())
            .context("Failed to save tags")?;

        info!(tag_id = %id, "deleted tag");
        Ok(())
    }

    /// Returns every note with its tags resolved, in canonical order.
    pub fn notes_with_tags(&self) -> Vec<NoteWithTags> {
        self.notes()
            .iter()
            .map(|note| NoteWithTags::resolve(note, self.tags()))
            .collect()
    }

    /// Returns the note with `id` with its tags resolved.
    ///
    /// Returns `None` if no note has this id. This is not considered an error
    /// condition.
    pub fn note_with_tags(&self, id: &NoteId) -> Option<NoteWithTags> {
        self.notes()
            .iter()
            .find(|note| &note.id == id)
            .map(|note| NoteWithTags::resolve(note, self.tags()))
    }

    /// Looks up tags by label, case-insensitively.
    ///
    /// Returns one entry per input label, in input order: the first tag whose
    /// label matches, or `None`.
    pub fn find_tags_by_label(&self, labels: &[&str]) -> Vec<Option<Tag>> {
        labels
            .iter()
            .map(|label| {
                let wanted = label.to_lowercase();
                self.tags()
                    .iter()
                    .find(|tag| tag.label.to_lowercase() == wanted)
                    .cloned()
            })
            .collect()
    }
}
