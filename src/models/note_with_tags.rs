use super::{Note, NoteId, Tag};

/// A note with its tag ids resolved to full tags, for display.
///
/// Purely a read-time projection: never persisted. Ids that no longer name a
/// tag are dropped during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteWithTags {
    pub id: NoteId,
    pub title: String,
    pub markdown: String,
    pub tags: Vec<Tag>,
}

impl NoteWithTags {
    /// Resolves `note`'s tag ids against `tags`.
    ///
    /// Keeps the note's tag order. Unresolvable ids are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use marknote::{NoteBuilder, NoteWithTags, Tag, TagId};
    ///
    /// let tags = vec![Tag::new(TagId::new("1"), "work")];
    /// let note = NoteBuilder::new()
    ///     .title("Buy milk")
    ///     .tag_ids(vec![TagId::new("1"), TagId::new("gone")])
    ///     .build();
    ///
    /// let resolved = NoteWithTags::resolve(&note, &tags);
    /// assert_eq!(resolved.tags, tags);
    /// ```
    pub fn resolve(note: &Note, tags: &[Tag]) -> Self {
        let resolved = note
            .tag_ids
            .iter()
            .filter_map(|id| tags.iter().find(|tag| &tag.id == id))
            .cloned()
            .collect();

        Self {
            id: note.id.clone(),
            title: note.title.clone(),
            markdown: note.markdown.clone(),
            tags: resolved,
        }
    }

    /// Returns whether the resolved tags include a tag with the given id.
    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.iter().any(|own| own.id == tag.id)
    }
}
