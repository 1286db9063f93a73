use super::*;
use crate::calling_codes::StaticCallingCodes;
use shared::domain::{CountryCode, Label};

fn add(book: &mut Phonebook, name: &str, label: Label, bookmarked: bool) -> ContactId {
    let mut form = ContactForm::new(CountryCode::default());
    form.set_name(name);
    form.set_phone("5550100");
    form.set_address("1 Main St");
    form.set_label(label);
    form.set_bookmarked(bookmarked);
    book.submit_form(&mut form, &StaticCallingCodes)
        .expect("submit")
}

fn visible(book: &Phonebook) -> Vec<String> {
    book.view().items.iter().map(|c| c.name.clone()).collect()
}

#[test]
fn worked_example_orders_bookmarks_first() {
    let mut book = Phonebook::default();
    add(&mut book, "Bob", Label::Work, false);
    let amy = add(&mut book, "Amy", Label::Work, true);
    add(&mut book, "Zoe", Label::Work, true);

    book.set_filter_enabled(false);
    assert_eq!(visible(&book), ["Amy", "Zoe", "Bob"]);

    book.set_search_query("bo");
    assert_eq!(visible(&book), ["Bob"]);

    book.set_search_query("");
    book.delete(amy).expect("delete amy");
    assert_eq!(visible(&book), ["Zoe", "Bob"]);
}

#[test]
fn invalid_phone_does_not_touch_the_store() {
    let mut book = Phonebook::default();
    add(&mut book, "Bob", Label::Work, false);

    let mut form = ContactForm::new(CountryCode::default());
    form.set_name("Amy");
    form.set_phone("12a3");
    form.set_address("Leadworth");

    let err = book
        .submit_form(&mut form, &StaticCallingCodes)
        .expect_err("invalid phone");
    match err {
        SubmitError::Validation(errors) => {
            assert_eq!(
                errors.get(crate::Field::Phone),
                Some(crate::form::PHONE_DIGITS_ONLY)
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(book.store().len(), 1);
    assert_eq!(form.phone(), "12a3");
}

#[test]
fn edit_form_replaces_existing_contact() {
    let mut book = Phonebook::default();
    let bob = add(&mut book, "Bob", Label::Work, false);

    let mut form = ContactForm::edit(book.get(bob).expect("bob"));
    form.set_name("Robert");
    form.set_label(Label::Family);
    let id = book
        .submit_form(&mut form, &StaticCallingCodes)
        .expect("edit");

    assert_eq!(id, bob);
    assert_eq!(book.store().len(), 1);
    let robert = book.get(bob).expect("robert");
    assert_eq!(robert.name, "Robert");
    assert_eq!(robert.label, Label::Family);
    assert_eq!(robert.phone, "+91 5550100");
}

#[test]
fn editing_a_deleted_contact_reports_not_found() {
    let mut book = Phonebook::default();
    let bob = add(&mut book, "Bob", Label::Work, false);
    let mut form = ContactForm::edit(book.get(bob).expect("bob"));
    book.delete(bob).expect("delete");

    let err = book
        .submit_form(&mut form, &StaticCallingCodes)
        .expect_err("gone");
    assert!(matches!(err, SubmitError::Store(StoreError::NotFound(id)) if id == bob));
    assert!(book.store().is_empty());

    let report = ErrorReport::from(err);
    assert_eq!(report.code, ErrorCode::NotFound);
}

#[test]
fn resubmitting_a_new_form_is_a_duplicate() {
    let mut book = Phonebook::default();
    let mut form = ContactForm::new(CountryCode::default());
    form.set_name("Amy");
    form.set_phone("1");
    form.set_address("x");
    book.submit_form(&mut form, &StaticCallingCodes)
        .expect("first");

    let err = book
        .submit_form(&mut form, &StaticCallingCodes)
        .expect_err("second");
    assert!(matches!(err, SubmitError::Store(StoreError::DuplicateId(_))));
    assert_eq!(book.store().len(), 1);
}

#[test]
fn filter_changes_reset_the_page() {
    let mut book = Phonebook::new(2);
    for name in ["A1", "A2", "A3", "A4", "A5"] {
        add(&mut book, name, Label::School, false);
    }

    book.go_to_page(3);
    assert_eq!(visible(&book), ["A5"]);

    book.set_search_query("a");
    assert_eq!(book.view_options().page, 1);

    book.go_to_page(2);
    book.set_selected_label(LabelFilter::Only(Label::School));
    assert_eq!(book.view_options().page, 1);

    book.go_to_page(2);
    assert!(book.toggle_bookmarked_only());
    assert_eq!(book.view_options().page, 1);
    assert!(book.view().is_empty());
    assert!(!book.toggle_bookmarked_only());

    book.go_to_page(2);
    book.set_filter_enabled(false);
    assert_eq!(book.view_options().page, 2);
    assert_eq!(visible(&book), ["A3", "A4"]);
}

#[test]
fn label_filter_only_applies_while_enabled() {
    let mut book = Phonebook::default();
    add(&mut book, "Worker", Label::Work, false);
    add(&mut book, "Cousin", Label::Family, false);

    book.set_selected_label(LabelFilter::Only(Label::Family));
    assert_eq!(visible(&book), ["Cousin"]);

    book.set_filter_enabled(false);
    assert_eq!(visible(&book), ["Cousin", "Worker"]);
}

#[test]
fn toggle_bookmark_reports_new_state() {
    let mut book = Phonebook::default();
    let bob = add(&mut book, "Bob", Label::Work, false);
    add(&mut book, "Amy", Label::Work, false);

    assert!(book.toggle_bookmark(bob).expect("toggle"));
    assert_eq!(visible(&book), ["Bob", "Amy"]);

    let ghost = ContactId::new();
    assert_eq!(book.toggle_bookmark(ghost), Err(StoreError::NotFound(ghost)));
}

#[test]
fn page_past_the_end_is_an_empty_state() {
    let mut book = Phonebook::default();
    add(&mut book, "Solo", Label::Work, false);
    book.go_to_page(7);
    let view = book.view();
    assert!(view.is_empty());
    assert_eq!(view.total_pages, 1);
    assert_eq!(view.summary(false), "1 Contact");
}
