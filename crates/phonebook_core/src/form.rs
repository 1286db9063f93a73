//! In-progress contact drafts and their validation.
//!
//! A [`ContactForm`] holds what the user has typed so far. Submitting runs
//! [`validate`], which is pure and returns a fresh [`ValidationErrors`] on
//! every call; on success the phone is normalized to
//! `+<calling-code> <national-number>`.

use std::{collections::BTreeMap, fmt};

use shared::domain::{Contact, ContactId, CountryCode, ImageRef, Label};
use thiserror::Error;

use crate::calling_codes::CallingCodes;

pub const NAME_REQUIRED: &str = "Name is required";
pub const PHONE_REQUIRED: &str = "Phone number is required";
pub const PHONE_DIGITS_ONLY: &str = "Please enter a valid phone number (numbers only)";
pub const ADDRESS_REQUIRED: &str = "Address is required";
pub const UNKNOWN_COUNTRY: &str = "Unknown country code";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Phone,
    Country,
    Address,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Phone => "phone",
            Field::Country => "country",
            Field::Address => "address",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-scoped validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", self.render())]
pub struct ValidationErrors(BTreeMap<Field, &'static str>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }

    fn insert(&mut self, field: Field, message: &'static str) {
        self.0.insert(field, message);
    }

    fn clear(&mut self, field: Field) {
        self.0.remove(&field);
    }

    /// `"field: message; field: message"` in field order.
    fn render(&self) -> String {
        self.iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    New(ContactId),
    Edit(ContactId),
}

impl FormMode {
    pub fn id(self) -> ContactId {
        match self {
            FormMode::New(id) | FormMode::Edit(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    mode: FormMode,
    name: String,
    phone: String,
    country: CountryCode,
    address: String,
    label: Label,
    bookmarked: bool,
    image: Option<ImageRef>,
    errors: ValidationErrors,
}

impl ContactForm {
    /// Blank form for a new contact; the id is assigned now.
    pub fn new(default_country: CountryCode) -> Self {
        Self {
            mode: FormMode::New(ContactId::new()),
            name: String::new(),
            phone: String::new(),
            country: default_country,
            address: String::new(),
            label: Label::default(),
            bookmarked: false,
            image: None,
            errors: ValidationErrors::default(),
        }
    }

    /// Form pre-filled from an existing contact, with the national number
    /// split back out of the stored phone.
    pub fn edit(contact: &Contact) -> Self {
        Self {
            mode: FormMode::Edit(contact.id),
            name: contact.name.clone(),
            phone: national_number(&contact.phone).to_string(),
            country: contact.country,
            address: contact.address.clone(),
            label: contact.label,
            bookmarked: contact.bookmarked,
            image: contact.image.clone(),
            errors: ValidationErrors::default(),
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn country(&self) -> CountryCode {
        self.country
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn bookmarked(&self) -> bool {
        self.bookmarked
    }

    pub fn image(&self) -> Option<&ImageRef> {
        self.image.as_ref()
    }

    /// Errors from the last failed submission, minus fields edited since.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.name = value.into();
        self.errors.clear(Field::Name);
    }

    pub fn set_phone(&mut self, value: impl Into<String>) {
        self.phone = value.into();
        self.errors.clear(Field::Phone);
    }

    pub fn set_address(&mut self, value: impl Into<String>) {
        self.address = value.into();
        self.errors.clear(Field::Address);
    }

    /// Switching country discards the national number typed for the old one.
    pub fn set_country(&mut self, country: CountryCode) {
        if country != self.country {
            self.phone.clear();
        }
        self.country = country;
        self.errors.clear(Field::Country);
    }

    pub fn set_label(&mut self, label: Label) {
        self.label = label;
    }

    pub fn set_bookmarked(&mut self, bookmarked: bool) {
        self.bookmarked = bookmarked;
    }

    pub fn attach_image(&mut self, image: ImageRef) {
        self.image = Some(image);
    }

    pub fn remove_image(&mut self) {
        self.image = None;
    }

    /// Validates and builds the contact. On failure the errors are kept on
    /// the form and every field stays as typed.
    pub fn submit(&mut self, codes: &dyn CallingCodes) -> Result<Contact, ValidationErrors> {
        match into_contact(self, codes) {
            Ok(contact) => {
                self.errors = ValidationErrors::default();
                Ok(contact)
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }
}

pub fn validate(form: &ContactForm, codes: &dyn CallingCodes) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if form.name.trim().is_empty() {
        errors.insert(Field::Name, NAME_REQUIRED);
    }

    if form.phone.trim().is_empty() {
        errors.insert(Field::Phone, PHONE_REQUIRED);
    } else if !is_digits(&form.phone) {
        errors.insert(Field::Phone, PHONE_DIGITS_ONLY);
    }

    if codes.calling_code(form.country).is_none() {
        errors.insert(Field::Country, UNKNOWN_COUNTRY);
    }

    if form.address.trim().is_empty() {
        errors.insert(Field::Address, ADDRESS_REQUIRED);
    }

    errors
}

pub fn into_contact(
    form: &ContactForm,
    codes: &dyn CallingCodes,
) -> Result<Contact, ValidationErrors> {
    let errors = validate(form, codes);
    let calling_code = match codes.calling_code(form.country) {
        Some(code) if errors.is_empty() => code,
        _ => return Err(errors),
    };

    Ok(Contact {
        id: form.mode.id(),
        name: form.name.trim().to_string(),
        phone: format_phone(calling_code, &form.phone),
        country: form.country,
        address: form.address.trim().to_string(),
        label: form.label,
        bookmarked: form.bookmarked,
        image: form.image.clone(),
    })
}

pub fn format_phone(calling_code: u16, national: &str) -> String {
    format!("+{calling_code} {national}")
}

/// Inverse of [`format_phone`]; returns the input unchanged when it carries
/// no `+<digits> ` prefix.
pub fn national_number(phone: &str) -> &str {
    phone
        .strip_prefix('+')
        .and_then(|rest| rest.split_once(' '))
        .filter(|(code, _)| is_digits(code))
        .map(|(_, national)| national)
        .unwrap_or(phone)
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
