use super::*;
use crate::calling_codes::StaticCallingCodes;

fn country(raw: &str) -> CountryCode {
    raw.parse().expect("country code")
}

fn filled(name: &str, phone: &str, address: &str) -> ContactForm {
    let mut form = ContactForm::new(country("IN"));
    form.set_name(name);
    form.set_phone(phone);
    form.set_address(address);
    form
}

#[test]
fn new_form_uses_defaults_and_fresh_id() {
    let a = ContactForm::new(country("IN"));
    let b = ContactForm::new(country("IN"));
    assert!(matches!(a.mode(), FormMode::New(_)));
    assert_ne!(a.mode().id(), b.mode().id());
    assert_eq!(a.label(), Label::Work);
    assert!(!a.bookmarked());
    assert!(a.image().is_none());
    assert!(a.errors().is_empty());
}

#[test]
fn valid_form_normalizes_phone_with_calling_code() {
    let mut form = filled("  Amy Pond ", "9876543210", " Leadworth ");
    form.set_label(Label::Friends);

    let contact = form.submit(&StaticCallingCodes).expect("valid");
    assert_eq!(contact.id, form.mode().id());
    assert_eq!(contact.name, "Amy Pond");
    assert_eq!(contact.phone, "+91 9876543210");
    assert_eq!(contact.address, "Leadworth");
    assert_eq!(contact.country, country("IN"));
    assert_eq!(contact.label, Label::Friends);
}

#[test]
fn empty_form_reports_every_required_field() {
    let errors = validate(&ContactForm::new(country("IN")), &StaticCallingCodes);
    assert_eq!(errors.len(), 3);
    assert_eq!(errors.get(Field::Name), Some(NAME_REQUIRED));
    assert_eq!(errors.get(Field::Phone), Some(PHONE_REQUIRED));
    assert_eq!(errors.get(Field::Address), Some(ADDRESS_REQUIRED));
    assert_eq!(errors.get(Field::Country), None);
}

#[test]
fn whitespace_only_fields_are_missing() {
    let errors = validate(&filled("   ", " ", "\t"), &StaticCallingCodes);
    assert_eq!(errors.get(Field::Name), Some(NAME_REQUIRED));
    assert_eq!(errors.get(Field::Phone), Some(PHONE_REQUIRED));
    assert_eq!(errors.get(Field::Address), Some(ADDRESS_REQUIRED));
}

#[test]
fn non_digit_phone_is_rejected() {
    for phone in ["12a3", "+919876", "98 76", " 123", "１２３"] {
        let errors = validate(&filled("Amy", phone, "Leadworth"), &StaticCallingCodes);
        assert_eq!(
            errors.get(Field::Phone),
            Some(PHONE_DIGITS_ONLY),
            "phone {phone:?}"
        );
    }
}

#[test]
fn unknown_country_is_a_field_error() {
    let mut form = filled("Amy", "123", "Leadworth");
    form.set_country(country("ZZ"));
    form.set_phone("123");
    let errors = validate(&form, &StaticCallingCodes);
    assert_eq!(errors.get(Field::Country), Some(UNKNOWN_COUNTRY));
    assert_eq!(errors.len(), 1);
}

#[test]
fn validation_is_fresh_on_every_call() {
    let bad = filled("", "x", "");
    let good = filled("Amy", "123", "Leadworth");
    assert_eq!(validate(&bad, &StaticCallingCodes).len(), 3);
    assert!(validate(&good, &StaticCallingCodes).is_empty());
    assert_eq!(validate(&bad, &StaticCallingCodes).len(), 3);
}

#[test]
fn failed_submit_keeps_input_and_records_errors() {
    let mut form = filled("Amy", "12a3", "Leadworth");
    let errors = form.submit(&StaticCallingCodes).expect_err("invalid phone");
    assert_eq!(errors.get(Field::Phone), Some(PHONE_DIGITS_ONLY));
    assert_eq!(form.errors(), &errors);
    assert_eq!(form.name(), "Amy");
    assert_eq!(form.phone(), "12a3");

    form.set_phone("123");
    assert!(form.errors().is_empty());
    form.submit(&StaticCallingCodes).expect("fixed");
}

#[test]
fn editing_a_field_clears_only_its_error() {
    let mut form = ContactForm::new(country("IN"));
    let _ = form.submit(&StaticCallingCodes);
    assert_eq!(form.errors().len(), 3);

    form.set_name("Amy");
    assert_eq!(form.errors().get(Field::Name), None);
    assert_eq!(form.errors().get(Field::Phone), Some(PHONE_REQUIRED));
    assert_eq!(form.errors().len(), 2);
}

#[test]
fn changing_country_clears_phone() {
    let mut form = filled("Amy", "9876543210", "Leadworth");
    form.set_country(country("IN"));
    assert_eq!(form.phone(), "9876543210");

    form.set_country(country("GB"));
    assert_eq!(form.phone(), "");
    assert_eq!(form.country(), country("GB"));
}

#[test]
fn edit_form_recovers_national_number() {
    let mut form = filled("Amy", "7700900123", "Leadworth");
    form.set_country(country("GB"));
    form.set_phone("7700900123");
    form.set_bookmarked(true);
    let contact = form.submit(&StaticCallingCodes).expect("valid");
    assert_eq!(contact.phone, "+44 7700900123");

    let mut edit = ContactForm::edit(&contact);
    assert_eq!(edit.mode(), FormMode::Edit(contact.id));
    assert_eq!(edit.phone(), "7700900123");
    assert_eq!(edit.country(), country("GB"));
    assert!(edit.bookmarked());

    let resubmitted = edit.submit(&StaticCallingCodes).expect("unchanged edit is valid");
    assert_eq!(resubmitted, contact);
}

#[test]
fn national_number_leaves_unprefixed_phones_alone() {
    assert_eq!(national_number("+91 98765"), "98765");
    assert_eq!(national_number("98765"), "98765");
    assert_eq!(national_number("+abc 98765"), "+abc 98765");
    assert_eq!(format_phone(1, "5551234"), "+1 5551234");
}

#[test]
fn images_attach_and_detach() {
    let mut form = filled("Amy", "123", "Leadworth");
    form.attach_image(ImageRef {
        url: "https://img.example/amy.png".into(),
        public_id: "amy".into(),
    });
    let with_image = form.submit(&StaticCallingCodes).expect("valid");
    assert_eq!(
        with_image.image.as_ref().map(|i| i.public_id.as_str()),
        Some("amy")
    );

    form.remove_image();
    let without = form.submit(&StaticCallingCodes).expect("valid");
    assert!(without.image.is_none());
}

#[test]
fn errors_render_field_by_field() {
    let errors = validate(&filled("", "12a3", "x"), &StaticCallingCodes);
    assert_eq!(
        errors.to_string(),
        "name: Name is required; phone: Please enter a valid phone number (numbers only)"
    );
}
