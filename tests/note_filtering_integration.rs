//! End-to-end checks of list filtering and tag maintenance on a shared
//! service.

use std::rc::Rc;

use anyhow::Result;
use marknote::store::MemoryStorage;
use marknote::{NoteData, NoteFilter, NoteService, Tag, TagId};

fn seeded() -> Result<(NoteService, Tag, Tag)> {
    let mut service = NoteService::new(Rc::new(MemoryStorage::new()))?;
    let work = Tag::new(TagId::new("1"), "work");
    let home = Tag::new(TagId::new("2"), "home");
    service.add_tag(work.clone())?;
    service.add_tag(home.clone())?;

    service.create_note(NoteData::new("Buy milk", "", vec![work.clone()]))?;
    service.create_note(NoteData::new(
        "Buy bread",
        "",
        vec![work.clone(), home.clone()],
    ))?;
    service.create_note(NoteData::new("Call mum", "", vec![home.clone()]))?;

    Ok((service, work, home))
}

fn titles(service: &NoteService, filter: &NoteFilter) -> Vec<String> {
    let notes = service.notes_with_tags();
    filter
        .apply(&notes)
        .into_iter()
        .map(|note| note.title.clone())
        .collect()
}

#[test]
fn test_title_and_tag_filters_combine() -> Result<()> {
    let (service, work, home) = seeded()?;

    assert_eq!(
        titles(&service, &NoteFilter::new("buy", vec![])),
        vec!["Buy milk", "Buy bread"]
    );
    assert_eq!(
        titles(&service, &NoteFilter::new("buy", vec![work.clone()])),
        vec!["Buy milk", "Buy bread"]
    );
    assert_eq!(
        titles(&service, &NoteFilter::new("", vec![work, home])),
        vec!["Buy bread"]
    );
    assert!(titles(&service, &NoteFilter::new("zzz", vec![])).is_empty());

    Ok(())
}

#[test]
fn test_renamed_tag_shows_on_every_note() -> Result<()> {
    let (mut service, work, _) = seeded()?;

    service.update_tag(&work.id, "job")?;

    let labels: Vec<Vec<String>> = service
        .notes_with_tags()
        .iter()
        .map(|note| note.tags.iter().map(|tag| tag.label.clone()).collect())
        .collect();
    assert_eq!(labels[0], vec!["job"]);
    assert_eq!(labels[1], vec!["job", "home"]);
    assert_eq!(labels[2], vec!["home"]);

    Ok(())
}

#[test]
fn test_deleted_tag_no_longer_resolves_but_reference_stays() -> Result<()> {
    let (mut service, _, home) = seeded()?;

    service.delete_tag(&home.id)?;

    assert_eq!(service.tags().len(), 1);
    let bread = &service.notes()[1];
    assert!(bread.tag_ids.contains(&home.id));

    let resolved = service.notes_with_tags();
    assert_eq!(resolved[1].tags.len(), 1);
    assert!(resolved[2].tags.is_empty());

    // A filter naming the deleted tag matches nothing.
    assert!(titles(&service, &NoteFilter::new("", vec![home])).is_empty());

    Ok(())
}

#[test]
fn test_create_then_delete_restores_collection() -> Result<()> {
    let (mut service, _, _) = seeded()?;
    let before = service.notes().to_vec();

    let note = service.create_note(NoteData::new("Temp", "x", vec![]))?;
    assert_eq!(service.notes().len(), before.len() + 1);

    service.delete_note(&note.id)?;
    assert_eq!(service.notes(), before.as_slice());

    Ok(())
}
