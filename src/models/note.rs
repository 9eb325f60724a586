use serde::{Deserialize, Serialize};

use super::{NoteId, Tag, TagId};

/// A stored note: title, markdown body and the ids of the tags it carries.
///
/// This is the canonical, persisted shape. Tags are referenced by id only so
/// that renaming a tag is observed through every note that carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier, allocated on creation and kept across edits.
    pub id: NoteId,
    pub title: String,
    /// Raw markdown source of the body.
    pub markdown: String,
    /// Referenced tags in selection order. May contain ids of deleted tags.
    pub tag_ids: Vec<TagId>,
}

/// The payload a note form produces for create and update flows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteData {
    pub title: String,
    pub markdown: String,
    pub tags: Vec<Tag>,
}

impl NoteData {
    /// Creates a payload from its parts.
    pub fn new(title: impl Into<String>, markdown: impl Into<String>, tags: Vec<Tag>) -> Self {
        Self {
            title: title.into(),
            markdown: markdown.into(),
            tags,
        }
    }

    /// Returns the ids of the selected tags, preserving order.
    pub fn tag_ids(&self) -> Vec<TagId> {
        self.tags.iter().map(|tag| tag.id.clone()).collect()
    }
}

/// Builder for constructing `Note` instances with optional fields.
///
/// # Examples
///
/// ```
/// use marknote::{NoteBuilder, NoteId, TagId};
///
/// let note = NoteBuilder::new()
///     .id(NoteId::new("a"))
///     .title("Buy milk")
///     .tag_ids(vec![TagId::new("1")])
///     .build();
///
/// assert_eq!(note.title, "Buy milk");
/// assert_eq!(note.markdown, "");
/// assert_eq!(note.tag_ids.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct NoteBuilder {
    id: Option<NoteId>,
    title: Option<String>,
    markdown: Option<String>,
    tag_ids: Option<Vec<TagId>>,
}

impl NoteBuilder {
    /// Creates a new `NoteBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the note ID.
    pub fn id(mut self, id: NoteId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the note title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the markdown body.
    pub fn markdown(mut self, markdown: impl Into<String>) -> Self {
        self.markdown = Some(markdown.into());
        self
    }

    /// Sets the referenced tag ids.
    pub fn tag_ids(mut self, tag_ids: Vec<TagId>) -> Self {
        self.tag_ids = Some(tag_ids);
        self
    }

    /// Builds the `Note`.
    ///
    /// A missing id is replaced by a freshly generated one; missing text
    /// fields default to empty.
    pub fn build(self) -> Note {
        Note {
            id: self.id.unwrap_or_else(NoteId::generate),
            title: self.title.unwrap_or_default(),
            markdown: self.markdown.unwrap_or_default(),
            tag_ids: self.tag_ids.unwrap_or_default(),
        }
    }
}
