pub mod config;
pub mod db;
pub mod filter;
pub mod form;
pub mod logging;
pub mod models;
pub mod route;
pub mod service;
pub mod store;
pub mod tui;

pub use config::Config;
pub use db::Database;
pub use filter::NoteFilter;
pub use models::{Note, NoteBuilder, NoteData, NoteId, NoteWithTags, Tag, TagId};
pub use route::Route;
pub use service::NoteService;

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn database_accessible_from_crate_root() {
        let db = Database::in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn types_accessible_from_crate_root() {
        let tag = Tag::new(TagId::new("1"), "test");
        assert_eq!(tag.label, "test");

        let note = NoteBuilder::new()
            .id(NoteId::new("A"))
            .title("test")
            .tag_ids(vec![tag.id.clone()])
            .build();
        let resolved = NoteWithTags::resolve(&note, &[tag]);
        assert!(NoteFilter::new("TEST", vec![]).matches(&resolved));

        assert_eq!(Route::parse("/A"), Route::Detail(note.id));
    }

    #[test]
    fn service_runs_on_sqlite_storage() {
        let db = Database::in_memory().unwrap();
        let mut service = NoteService::new(Rc::new(db)).unwrap();
        service
            .create_note(NoteData::new("t", "b", vec![]))
            .unwrap();
        assert_eq!(service.notes_with_tags().len(), 1);
    }
}
