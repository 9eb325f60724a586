use serde::{Deserialize, Serialize};

use super::TagId;

/// A user-defined label that notes reference by id.
///
/// Labels are editable and need not be unique; identity is the `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub label: String,
}

impl Tag {
    /// Creates a tag with the given id and label.
    ///
    /// # Examples
    ///
    /// ```
    /// use marknote::{Tag, TagId};
    ///
    /// let tag = Tag::new(TagId::new("1"), "work");
    /// assert_eq!(tag.id, TagId::new("1"));
    /// assert_eq!(tag.label, "work");
    /// ```
    pub fn new(id: TagId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }

    /// Creates a tag with a freshly generated id.
    pub fn with_fresh_id(label: impl Into<String>) -> Self {
        Self::new(TagId::generate(), label)
    }
}
