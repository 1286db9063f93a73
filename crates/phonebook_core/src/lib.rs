//! Contact store, view projection and form handling for the phonebook.
//!
//! [`ContactStore`] is the single source of truth for contacts and the two
//! pieces of query state that outlive a view (search text and selected
//! label). [`projection::project`] derives the ordered, paginated page to
//! render. [`Phonebook`] bundles both with the local view options and keeps
//! the page-reset contract.

use shared::{
    action::Action,
    domain::{Contact, ContactId, LabelFilter},
    error::StoreError,
};
use tracing::{debug, warn};

pub mod calling_codes;
pub mod collation;
pub mod form;
pub mod projection;
mod session;

pub use calling_codes::{CallingCodes, StaticCallingCodes};
pub use form::{ContactForm, Field, FormMode, ValidationErrors};
pub use projection::{project, Projection, ProjectionQuery, DEFAULT_PAGE_SIZE};
pub use session::{Phonebook, SubmitError, ViewOptions};

/// Owned contact collection plus stored query state.
///
/// Every mutation that can change a name ends by restoring ascending name
/// order ([`collation::compare_names`]). Rejected mutations leave the store
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct ContactStore {
    contacts: Vec<Contact>,
    search_query: String,
    selected_label: LabelFilter,
}

impl ContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one action; the reducer entry point.
    pub fn update(&mut self, action: Action) -> Result<(), StoreError> {
        let name = action.name();
        let outcome = match action {
            Action::AddContact(contact) => self.add_contact(contact),
            Action::EditContact(contact) => self.edit_contact(contact),
            Action::DeleteContact(id) => self.delete_contact(id).map(drop),
            Action::ToggleBookmark(id) => self.toggle_bookmark(id).map(drop),
            Action::SetSearchQuery(text) => {
                self.set_search_query(text);
                Ok(())
            }
            Action::SetSelectedLabel(filter) => {
                self.set_selected_label(filter);
                Ok(())
            }
        };
        if let Err(error) = &outcome {
            warn!(action = name, %error, "store action rejected");
        }
        outcome
    }

    pub fn add_contact(&mut self, contact: Contact) -> Result<(), StoreError> {
        if self.position(contact.id).is_some() {
            return Err(StoreError::DuplicateId(contact.id));
        }
        debug!(id = %contact.id, name = %contact.name, "adding contact");
        self.contacts.push(contact);
        self.sort_by_name();
        Ok(())
    }

    pub fn edit_contact(&mut self, contact: Contact) -> Result<(), StoreError> {
        let index = self
            .position(contact.id)
            .ok_or(StoreError::NotFound(contact.id))?;
        debug!(id = %contact.id, name = %contact.name, "editing contact");
        self.contacts[index] = contact;
        self.sort_by_name();
        Ok(())
    }

    /// Removes and returns the contact. Order is preserved.
    pub fn delete_contact(&mut self, id: ContactId) -> Result<Contact, StoreError> {
        let index = self.position(id).ok_or(StoreError::NotFound(id))?;
        debug!(%id, "deleting contact");
        Ok(self.contacts.remove(index))
    }

    /// Flips the bookmark flag and returns its new value.
    pub fn toggle_bookmark(&mut self, id: ContactId) -> Result<bool, StoreError> {
        let contact = self
            .contacts
            .iter_mut()
            .find(|contact| contact.id == id)
            .ok_or(StoreError::NotFound(id))?;
        contact.bookmarked = !contact.bookmarked;
        debug!(%id, bookmarked = contact.bookmarked, "toggled bookmark");
        Ok(contact.bookmarked)
    }

    pub fn set_search_query(&mut self, text: impl Into<String>) {
        self.search_query = text.into();
    }

    pub fn set_selected_label(&mut self, filter: LabelFilter) {
        self.selected_label = filter;
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn get(&self, id: ContactId) -> Option<&Contact> {
        self.contacts.iter().find(|contact| contact.id == id)
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn selected_label(&self) -> LabelFilter {
        self.selected_label
    }

    fn position(&self, id: ContactId) -> Option<usize> {
        self.contacts.iter().position(|contact| contact.id == id)
    }

    fn sort_by_name(&mut self) {
        self.contacts
            .sort_by(|a, b| collation::compare_names(&a.name, &b.name));
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
