//! Title and tag filtering for the note list.

use crate::models::{NoteWithTags, Tag};

/// Filter criteria for the note list.
///
/// A note passes when both hold:
/// - `title` is empty, or the note's title contains it case-insensitively;
/// - `tags` is empty, or every selected tag is among the note's resolved tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    pub title: String,
    pub tags: Vec<Tag>,
}

impl NoteFilter {
    /// Creates a filter from a title fragment and a tag selection.
    pub fn new(title: impl Into<String>, tags: Vec<Tag>) -> Self {
        Self {
            title: title.into(),
            tags,
        }
    }

    /// Returns whether no criteria are set.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.tags.is_empty()
    }

    /// Returns whether `note` passes the filter.
    pub fn matches(&self, note: &NoteWithTags) -> bool {
        self.title_matches(&note.title) && self.tags.iter().all(|tag| note.has_tag(tag))
    }

    fn title_matches(&self, title: &str) -> bool {
        self.title.is_empty() || title.to_lowercase().contains(&self.title.to_lowercase())
    }

    /// Returns the notes passing the filter, in their original order.
    ///
    /// # Examples
    ///
    /// ```
    /// use marknote::{NoteFilter, NoteId, NoteWithTags, Tag, TagId};
    ///
    /// let work = Tag::new(TagId::new("1"), "work");
    /// let notes = vec![NoteWithTags {
    ///     id: NoteId::new("A"),
    ///     title: "Buy milk".to_string(),
    ///     markdown: String::new(),
    ///     tags: vec![work.clone()],
    /// }];
    ///
    /// assert_eq!(NoteFilter::new("buy", vec![]).apply(&notes).len(), 1);
    /// assert_eq!(NoteFilter::new("", vec![work]).apply(&notes).len(), 1);
    /// assert!(NoteFilter::new("x", vec![]).apply(&notes).is_empty());
    /// ```
    pub fn apply<'a>(&self, notes: &'a [NoteWithTags]) -> Vec<&'a NoteWithTags> {
        notes.iter().filter(|note| self.matches(note)).collect()
    }

    /// Adds `tag` to the selection, or removes it if already selected.
    pub fn toggle_tag(&mut self, tag: &Tag) {
        if let Some(pos) = self.tags.iter().position(|t| t.id == tag.id) {
            self.tags.remove(pos);
        } else {
            self.tags.push(tag.clone());
        }
    }

    /// Returns whether a tag with `tag`'s id is selected.
    pub fn is_selected(&self, tag: &Tag) -> bool {
        self.tags.iter().any(|t| t.id == tag.id)
    }
}
