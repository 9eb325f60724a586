//! Integration tests for notes and tags surviving a restart.
//!
//! Each test opens a file-backed database, mutates it through the service,
//! drops everything and reopens the same file.

use std::rc::Rc;

use anyhow::Result;
use marknote::service::{NOTES_KEY, TAGS_KEY};
use marknote::store::{Persisted, Storage, StoreError};
use marknote::{Database, NoteData, NoteService, Tag, TagId};
use tempfile::TempDir;

fn open_service(dir: &TempDir) -> Result<NoteService> {
    let db = Database::open(dir.path().join("storage.db"))?;
    NoteService::new(Rc::new(db))
}

#[test]
fn test_notes_and_tags_survive_reopen() -> Result<()> {
    let dir = TempDir::new()?;

    let note_id = {
        let mut service = open_service(&dir)?;
        let tag = service.create_tag("work")?;
        let note = service.create_note(NoteData::new("Standup", "- done", vec![tag]))?;
        note.id
    };

    let service = open_service(&dir)?;
    let note = service
        .note_with_tags(&note_id)
        .expect("note should be reloaded");
    assert_eq!(note.title, "Standup");
    assert_eq!(note.markdown, "- done");
    assert_eq!(note.tags.len(), 1);
    assert_eq!(note.tags[0].label, "work");

    Ok(())
}

#[test]
fn test_fresh_database_starts_empty_and_writes_keys() -> Result<()> {
    let dir = TempDir::new()?;
    let service = open_service(&dir)?;
    assert!(service.notes().is_empty());
    assert!(service.tags().is_empty());
    drop(service);

    let db = Database::open(dir.path().join("storage.db"))?;
    assert_eq!(db.get_item(NOTES_KEY)?.as_deref(), Some("[]"));
    assert_eq!(db.get_item(TAGS_KEY)?.as_deref(), Some("[]"));

    Ok(())
}

#[test]
fn test_stored_notes_use_camel_case_tag_ids() -> Result<()> {
    let dir = TempDir::new()?;
    {
        let mut service = open_service(&dir)?;
        service.add_tag(Tag::new(TagId::new("t1"), "a"))?;
        service.create_note(NoteData::new(
            "N",
            "b",
            vec![Tag::new(TagId::new("t1"), "a")],
        ))?;
    }

    let db = Database::open(dir.path().join("storage.db"))?;
    let raw = db.get_item(NOTES_KEY)?.expect("notes should be stored");
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    assert_eq!(value[0]["tagIds"][0], "t1");
    assert_eq!(value[0]["title"], "N");

    Ok(())
}

#[test]
fn test_malformed_notes_are_reported_and_left_untouched() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("storage.db");
    {
        let db = Database::open(&path)?;
        db.set_item(NOTES_KEY, "{not json")?;
    }

    let result = open_service(&dir);
    assert!(result.is_err(), "malformed text must not load");

    let db = Database::open(&path)?;
    assert_eq!(db.get_item(NOTES_KEY)?.as_deref(), Some("{not json"));

    Ok(())
}

#[test]
fn test_persisted_value_reloads_from_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("storage.db");

    {
        let storage: Rc<dyn Storage> = Rc::new(Database::open(&path)?);
        let mut counter = Persisted::new(storage, "COUNTER", 0u32)?;
        counter.update(|n| n + 5)?;
    }

    let storage: Rc<dyn Storage> = Rc::new(Database::open(&path)?);
    let counter = Persisted::with_default(storage, "COUNTER", || -> u32 {
        panic!("default must not run when a value is stored")
    })?;
    assert_eq!(*counter.get(), 5);

    Ok(())
}

#[test]
fn test_wrong_shape_is_malformed() -> Result<()> {
    let storage: Rc<dyn Storage> = Rc::new(Database::in_memory()?);
    storage.set_item("COUNTER", "\"five\"")?;

    let result = Persisted::new(storage, "COUNTER", 0u32);
    assert!(matches!(result, Err(StoreError::Malformed { .. })));

    Ok(())
}
