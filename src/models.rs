mod ids;
mod note;
mod note_with_tags;
mod tag;

pub use ids::{NoteId, TagId};
pub use note::{Note, NoteBuilder, NoteData};
pub use note_with_tags::NoteWithTags;
pub use tag::Tag;
