use contact_book::validation::validate_draft;
use contact_book::{
    ContactController, ContactDraft, ContactError, ContactStore, Field, ValidationError,
};

fn controller() -> ContactController {
    ContactController::new(ContactStore::open_in_memory().unwrap()).unwrap()
}

fn draft(name: &str) -> ContactDraft {
    ContactDraft::new(name, "28", "1712345678", "person@example.com", "0998765432")
}

fn names(controller: &ContactController) -> Vec<String> {
    controller
        .contacts()
        .iter()
        .map(|contact| contact.name.clone())
        .collect()
}

fn validation(err: ContactError) -> ValidationError {
    match err {
        ContactError::Validation(inner) => inner,
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn valid_contact_is_listed_and_searchable() {
    let mut controller = controller();
    let added = controller.add(&draft("Elena")).unwrap();

    assert_eq!(controller.contacts(), &[added.clone()]);
    assert_eq!(controller.snapshot().unwrap(), vec![added.clone()]);
    assert_eq!(controller.search("ele"), vec![added]);
}

#[test]
fn duplicate_name_is_rejected_without_writing() {
    let mut controller = controller();
    controller.add(&draft("Elena")).unwrap();

    let err = controller.add(&draft("Elena")).unwrap_err();
    assert_eq!(
        validation(err),
        ValidationError::DuplicateContact("Elena".into())
    );
    assert_eq!(controller.snapshot().unwrap().len(), 1);
}

#[test]
fn empty_field_wins_over_duplicate() {
    let mut controller = controller();
    controller.add(&draft("Elena")).unwrap();

    let mut input = draft("Elena");
    input.email.clear();
    let err = controller.add(&input).unwrap_err();
    assert_eq!(validation(err), ValidationError::EmptyField(Field::Email));

    let err = controller.add(&draft("")).unwrap_err();
    assert_eq!(validation(err), ValidationError::EmptyField(Field::Name));
}

#[test]
fn name_format_is_checked() {
    let mut controller = controller();

    let err = controller.add(&draft("John123")).unwrap_err();
    assert_eq!(validation(err), ValidationError::InvalidName);

    let added = controller.add(&draft("María José")).unwrap();
    assert_eq!(added.name, "María José");
}

#[test]
fn email_needs_at_sign_and_dot() {
    let mut controller = controller();

    for (name, email) in [("Ana", "no-at-symbol.com"), ("Bea", "a@b")] {
        let mut input = draft(name);
        input.email = email.into();
        let err = controller.add(&input).unwrap_err();
        assert_eq!(validation(err), ValidationError::InvalidEmail);
    }

    let mut input = draft("Carla");
    input.email = "a@b.c".into();
    controller.add(&input).unwrap();
    assert_eq!(names(&controller), vec!["Carla"]);
}

#[test]
fn search_is_case_insensitive_and_empty_query_lists_all() {
    let mut controller = controller();
    for name in ["María", "Mark", "Elena"] {
        controller.add(&draft(name)).unwrap();
    }

    let mut found: Vec<String> = controller
        .search("mar")
        .into_iter()
        .map(|contact| contact.name)
        .collect();
    found.sort();
    assert_eq!(found, vec!["Mark", "María"]);

    assert_eq!(controller.search(""), controller.snapshot().unwrap());
    assert!(controller.search("zzz").is_empty());
}

#[test]
fn spaces_in_the_query_are_part_of_the_match() {
    let mut controller = controller();
    for name in ["María José", "María"] {
        controller.add(&draft(name)).unwrap();
    }

    let found: Vec<String> = controller
        .search("ría ")
        .into_iter()
        .map(|contact| contact.name)
        .collect();
    assert_eq!(found, vec!["María José"]);

    assert_eq!(controller.search("   "), controller.snapshot().unwrap());
}

#[test]
fn reload_selected_reads_the_stored_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.sqlite");

    let mut controller = ContactController::new(ContactStore::open(&path).unwrap()).unwrap();
    assert_eq!(controller.reload_selected().unwrap(), None);

    let elena = controller.add(&draft("Elena")).unwrap();
    controller.select(elena.id).unwrap();

    let other = ContactStore::open(&path).unwrap();
    let changed = ContactDraft::new("Elena", "40", "1712345678", "new@example.com", "0998765432");
    other
        .update_by_id(elena.id, &validate_draft(&changed).unwrap())
        .unwrap();

    let fresh = controller.reload_selected().unwrap().unwrap();
    assert_eq!(fresh.age, 40);
    assert_eq!(fresh.email, "new@example.com");
    assert_eq!(controller.selected(), Some(&fresh));

    assert_eq!(other.delete_by_name("Elena").unwrap(), 1);
    let err = controller.reload_selected().unwrap_err();
    assert!(matches!(err, ContactError::NotFound(_)));
    assert_eq!(controller.selected_id(), None);
}

#[test]
fn update_and_delete_require_selection() {
    let mut controller = controller();
    controller.add(&draft("Elena")).unwrap();

    let err = controller.update(&draft("Elena")).unwrap_err();
    assert_eq!(validation(err), ValidationError::NoSelection);

    let err = controller.delete("Elena").unwrap_err();
    assert_eq!(validation(err), ValidationError::NoSelection);

    assert_eq!(names(&controller), vec!["Elena"]);
}

#[test]
fn mutations_clear_the_selection() {
    let mut controller = controller();
    let elena = controller.add(&draft("Elena")).unwrap();
    controller.add(&draft("Mark")).unwrap();

    controller.select(elena.id).unwrap();
    controller.add(&draft("Zoe")).unwrap();
    assert_eq!(controller.selected_id(), None);

    controller.select(elena.id).unwrap();
    controller.update(&draft("Elena María")).unwrap();
    let err = controller.update(&draft("Elena")).unwrap_err();
    assert_eq!(validation(err), ValidationError::NoSelection);

    controller.select(elena.id).unwrap();
    controller.delete("Elena María").unwrap();
    let err = controller.delete("Mark").unwrap_err();
    assert_eq!(validation(err), ValidationError::NoSelection);
}

#[test]
fn update_keeps_the_id_and_overwrites_fields() {
    let mut controller = controller();
    let added = controller.add(&draft("Elena")).unwrap();
    controller.select(added.id).unwrap();

    let updated = controller
        .update(&ContactDraft::new(
            "Elena Ruiz",
            "31",
            "0912345678",
            "elena@ruiz.ec",
            "022345678",
        ))
        .unwrap();

    let listed = controller.snapshot().unwrap();
    assert_eq!(listed, vec![updated.clone()]);
    assert_eq!(updated.id, added.id);
    assert_eq!(updated.age, 31);
    assert_eq!(updated.email, "elena@ruiz.ec");
}

#[test]
fn update_revalidates_like_add() {
    let mut controller = controller();
    let elena = controller.add(&draft("Elena")).unwrap();
    controller.add(&draft("Mark")).unwrap();
    controller.select(elena.id).unwrap();

    let err = controller.update(&draft("Mark")).unwrap_err();
    assert_eq!(
        validation(err),
        ValidationError::DuplicateContact("Mark".into())
    );

    let err = controller.update(&draft("Elena 2")).unwrap_err();
    assert_eq!(validation(err), ValidationError::InvalidName);

    // Keeping its own name is fine, and the failed attempts kept the selection.
    controller.update(&draft("Elena")).unwrap();
    assert_eq!(names(&controller), vec!["Elena", "Mark"]);
}

#[test]
fn update_of_vanished_record_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.sqlite");

    let mut controller = ContactController::new(ContactStore::open(&path).unwrap()).unwrap();
    let elena = controller.add(&draft("Elena")).unwrap();
    controller.select(elena.id).unwrap();

    let other = ContactStore::open(&path).unwrap();
    assert_eq!(other.delete_by_name("Elena").unwrap(), 1);

    let err = controller.update(&draft("Elena")).unwrap_err();
    assert!(matches!(err, ContactError::NotFound(_)));
    assert_eq!(controller.selected_id(), None);
    assert!(controller.contacts().is_empty());
}

#[test]
fn delete_removes_by_name_and_reports_missing() {
    let mut controller = controller();
    let elena = controller.add(&draft("Elena")).unwrap();
    controller.add(&draft("Mark")).unwrap();

    controller.select(elena.id).unwrap();
    assert_eq!(controller.delete("Elena").unwrap(), 1);
    assert_eq!(names(&controller), vec!["Mark"]);

    let mark = controller.contacts()[0].id;
    controller.select(mark).unwrap();
    let err = controller.delete("Nobody").unwrap_err();
    assert!(matches!(err, ContactError::NotFound(ref name) if name == "Nobody"));
    assert_eq!(names(&controller), vec!["Mark"]);
}

#[test]
fn close_releases_the_store() {
    let mut controller = controller();
    controller.add(&draft("Elena")).unwrap();
    controller.close().unwrap();

    assert!(controller.contacts().is_empty());
    let err = controller.snapshot().unwrap_err();
    assert!(matches!(err, ContactError::Storage(_)));
}
