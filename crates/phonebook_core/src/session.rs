use shared::{
    action::Action,
    domain::{Contact, ContactId, LabelFilter},
    error::{ErrorCode, ErrorReport, StoreError},
};
use thiserror::Error;
use tracing::debug;

use crate::{
    calling_codes::CallingCodes,
    form::{ContactForm, FormMode, ValidationErrors},
    projection::{project, Projection, ProjectionQuery, DEFAULT_PAGE_SIZE},
    ContactStore,
};

/// View options that live beside the store rather than in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    pub filter_enabled: bool,
    pub bookmarked_only: bool,
    pub page: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            filter_enabled: true,
            bookmarked_only: false,
            page: 1,
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("contact form is invalid: {0}")]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<SubmitError> for ErrorReport {
    fn from(value: SubmitError) -> Self {
        match value {
            SubmitError::Validation(errors) => {
                ErrorReport::new(ErrorCode::Validation, errors.to_string())
            }
            SubmitError::Store(error) => error.into(),
        }
    }
}

/// A session: the contact store plus the local view options.
///
/// Changing the search text, the selected label or the bookmark-only toggle
/// sends the view back to page 1. Toggling the label filter on or off and
/// moving between pages do not.
#[derive(Debug, Clone)]
pub struct Phonebook {
    store: ContactStore,
    view: ViewOptions,
    page_size: usize,
}

impl Default for Phonebook {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Phonebook {
    pub fn new(page_size: usize) -> Self {
        Self {
            store: ContactStore::new(),
            view: ViewOptions::default(),
            page_size: page_size.max(1),
        }
    }

    pub fn store(&self) -> &ContactStore {
        &self.store
    }

    pub fn view_options(&self) -> ViewOptions {
        self.view
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn view(&self) -> Projection<'_> {
        project(
            self.store.contacts(),
            &ProjectionQuery {
                search_query: self.store.search_query(),
                selected_label: self.store.selected_label(),
                filter_enabled: self.view.filter_enabled,
                bookmarked_only: self.view.bookmarked_only,
                page: self.view.page,
                page_size: self.page_size,
            },
        )
    }

    pub fn get(&self, id: ContactId) -> Option<&Contact> {
        self.store.get(id)
    }

    /// Validates the form and adds or replaces the contact it describes.
    /// Nothing is dispatched when validation fails.
    pub fn submit_form(
        &mut self,
        form: &mut ContactForm,
        codes: &dyn CallingCodes,
    ) -> Result<ContactId, SubmitError> {
        let contact = form.submit(codes)?;
        let id = contact.id;
        let action = match form.mode() {
            FormMode::New(_) => Action::AddContact(contact),
            FormMode::Edit(_) => Action::EditContact(contact),
        };
        self.store.update(action)?;
        Ok(id)
    }

    pub fn delete(&mut self, id: ContactId) -> Result<(), StoreError> {
        self.store.update(Action::DeleteContact(id))
    }

    pub fn toggle_bookmark(&mut self, id: ContactId) -> Result<bool, StoreError> {
        self.store.update(Action::ToggleBookmark(id))?;
        Ok(self.store.get(id).is_some_and(|contact| contact.bookmarked))
    }

    pub fn set_search_query(&mut self, text: impl Into<String>) {
        self.store.set_search_query(text);
        self.reset_page();
    }

    pub fn set_selected_label(&mut self, filter: LabelFilter) {
        self.store.set_selected_label(filter);
        self.reset_page();
    }

    pub fn toggle_bookmarked_only(&mut self) -> bool {
        self.view.bookmarked_only = !self.view.bookmarked_only;
        self.reset_page();
        self.view.bookmarked_only
    }

    pub fn set_filter_enabled(&mut self, enabled: bool) {
        self.view.filter_enabled = enabled;
    }

    /// Any page number is accepted; pages past the end render empty.
    pub fn go_to_page(&mut self, page: usize) {
        self.view.page = page;
    }

    fn reset_page(&mut self) {
        debug!(from = self.view.page, "resetting page after filter change");
        self.view.page = 1;
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
