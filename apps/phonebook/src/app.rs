use std::sync::Arc;

use media_upload::{ImagePayload, ImageUploader};
use phonebook_core::{ContactForm, Phonebook, StaticCallingCodes};
use shared::{
    domain::{ContactId, CountryCode},
    error::{ErrorCode, ErrorReport, StoreError},
};
use tracing::{debug, info};

use crate::{
    commands::{Command, ContactFields},
    render,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Output(String),
    /// Run `command` only if the user answers yes to `question`.
    Confirm { question: String, command: Command },
    Quit,
}

/// Prompt state: the phonebook session plus the draft kept after a failed
/// add or edit so it can be fixed with `retry`.
pub struct App {
    book: Phonebook,
    codes: StaticCallingCodes,
    uploader: Option<Arc<dyn ImageUploader>>,
    default_country: CountryCode,
    draft: Option<ContactForm>,
    confirm_deletes: bool,
}

impl App {
    pub fn new(
        book: Phonebook,
        default_country: CountryCode,
        uploader: Option<Arc<dyn ImageUploader>>,
    ) -> Self {
        Self {
            book,
            codes: StaticCallingCodes,
            uploader,
            default_country,
            draft: None,
            confirm_deletes: false,
        }
    }

    /// Ask before deleting unless the command carries `--yes`.
    pub fn confirm_deletes(mut self, enabled: bool) -> Self {
        self.confirm_deletes = enabled;
        self
    }

    pub fn book(&self) -> &Phonebook {
        &self.book
    }

    pub fn draft(&self) -> Option<&ContactForm> {
        self.draft.as_ref()
    }

    pub async fn execute(&mut self, command: Command) -> Result<Outcome, ErrorReport> {
        debug!(?command, "executing command");
        let output = match command {
            Command::List { json } => self.list(json)?,
            Command::Show { id } => {
                let id = self.resolve(&id)?;
                let contact = self.book.get(id).ok_or(StoreError::NotFound(id))?;
                render::contact(contact)
            }
            Command::Add(fields) => {
                self.ensure_no_draft()?;
                let form = ContactForm::new(self.default_country);
                self.fill_and_submit(form, fields).await?
            }
            Command::Edit { id, fields } => {
                self.ensure_no_draft()?;
                let id = self.resolve(&id)?;
                let contact = self.book.get(id).ok_or(StoreError::NotFound(id))?;
                let form = ContactForm::edit(contact);
                self.fill_and_submit(form, fields).await?
            }
            Command::Retry(fields) => {
                let form = self.draft.take().ok_or_else(|| {
                    ErrorReport::new(
                        ErrorCode::Validation,
                        "there is no draft to retry; start with add or edit",
                    )
                })?;
                self.fill_and_submit(form, fields).await?
            }
            Command::Draft => match &self.draft {
                Some(form) => render::draft(form),
                None => "no draft".to_string(),
            },
            Command::Discard => match self.draft.take() {
                Some(_) => "draft discarded".to_string(),
                None => "no draft".to_string(),
            },
            Command::Delete { id, yes } => {
                let id = self.resolve(&id)?;
                let name = self
                    .book
                    .get(id)
                    .map(|contact| contact.name.clone())
                    .ok_or(StoreError::NotFound(id))?;
                if self.confirm_deletes && !yes {
                    return Ok(Outcome::Confirm {
                        question: format!("Are you sure you want to delete {name}?"),
                        command: Command::Delete {
                            id: id.to_string(),
                            yes: true,
                        },
                    });
                }
                self.book.delete(id)?;
                info!(%id, "contact deleted");
                format!("deleted {name}")
            }
            Command::Bookmark { id } => {
                let id = self.resolve(&id)?;
                let bookmarked = self.book.toggle_bookmark(id)?;
                let name = self
                    .book
                    .get(id)
                    .map(|contact| contact.name.as_str())
                    .unwrap_or_default();
                if bookmarked {
                    format!("bookmarked {name}")
                } else {
                    format!("removed bookmark from {name}")
                }
            }
            Command::Search { words } => {
                self.book.set_search_query(words.join(" "));
                self.list(false)?
            }
            Command::Label { filter } => {
                self.book.set_selected_label(filter);
                self.list(false)?
            }
            Command::Filter { state } => {
                self.book.set_filter_enabled(state.enabled());
                self.list(false)?
            }
            Command::Bookmarked => {
                self.book.toggle_bookmarked_only();
                self.list(false)?
            }
            Command::Page { number } => {
                self.book.go_to_page(number);
                self.list(false)?
            }
            Command::Next => {
                let page = self.book.view_options().page;
                self.book.go_to_page(page.saturating_add(1));
                self.list(false)?
            }
            Command::Prev => {
                let page = self.book.view_options().page;
                self.book.go_to_page(page.saturating_sub(1).max(1));
                self.list(false)?
            }
            Command::Countries => render::countries(&self.codes),
            Command::Quit => return Ok(Outcome::Quit),
        };
        Ok(Outcome::Output(output))
    }

    fn list(&self, json: bool) -> Result<String, ErrorReport> {
        let view = self.book.view();
        if json {
            return serde_json::to_string_pretty(&view)
                .map_err(|err| ErrorReport::new(ErrorCode::Internal, err.to_string()));
        }
        Ok(render::page(
            &view,
            self.book.view_options(),
            self.book.store().search_query(),
            self.book.store().selected_label(),
        ))
    }

    /// Accepts a full id or any unambiguous prefix of one.
    fn resolve(&self, raw: &str) -> Result<ContactId, ErrorReport> {
        if let Ok(id) = raw.parse::<ContactId>() {
            return Ok(id);
        }
        let prefix = raw.trim().replace('-', "").to_ascii_lowercase();
        if prefix.is_empty() {
            return Err(ErrorReport::new(ErrorCode::Validation, "contact id is empty"));
        }
        let mut matches = self
            .book
            .store()
            .contacts()
            .iter()
            .map(|contact| contact.id)
            .filter(|id| id.to_string().starts_with(&prefix));
        match (matches.next(), matches.next()) {
            (Some(id), None) => Ok(id),
            (None, _) => Err(ErrorReport::new(
                ErrorCode::NotFound,
                format!("no contact id starts with '{raw}'"),
            )),
            (Some(_), Some(_)) => Err(ErrorReport::new(
                ErrorCode::Validation,
                format!("'{raw}' matches more than one contact; type more of the id"),
            )),
        }
    }

    /// A kept draft blocks new forms until it is retried or discarded.
    fn ensure_no_draft(&self) -> Result<(), ErrorReport> {
        match &self.draft {
            Some(_) => Err(ErrorReport::new(
                ErrorCode::Validation,
                "a draft is pending; `retry` or `discard` it first",
            )),
            None => Ok(()),
        }
    }

    async fn fill_and_submit(
        &mut self,
        mut form: ContactForm,
        fields: ContactFields,
    ) -> Result<String, ErrorReport> {
        if let Err(report) = self.apply_fields(&mut form, fields).await {
            self.draft = Some(form);
            return Err(kept_draft(report));
        }

        match self.book.submit_form(&mut form, &self.codes) {
            Ok(id) => {
                let name = self
                    .book
                    .get(id)
                    .map(|contact| contact.name.as_str())
                    .unwrap_or_default();
                info!(%id, "contact saved");
                Ok(format!("saved {name} ({})", render::short_id(id)))
            }
            Err(err) => {
                self.draft = Some(form);
                Err(kept_draft(err.into()))
            }
        }
    }

    /// Country goes first so a phone given alongside it survives the reset.
    async fn apply_fields(
        &self,
        form: &mut ContactForm,
        fields: ContactFields,
    ) -> Result<(), ErrorReport> {
        if let Some(country) = fields.country {
            form.set_country(country);
        }
        if let Some(name) = fields.name {
            form.set_name(name);
        }
        if let Some(phone) = fields.phone {
            form.set_phone(phone);
        }
        if let Some(address) = fields.address {
            form.set_address(address);
        }
        if let Some(label) = fields.label {
            form.set_label(label);
        }
        if fields.bookmark {
            form.set_bookmarked(true);
        }
        if fields.unbookmark {
            form.set_bookmarked(false);
        }
        if fields.remove_image {
            form.remove_image();
        }
        if let Some(path) = fields.image {
            let uploader = self.uploader.as_ref().ok_or_else(|| {
                ErrorReport::new(
                    ErrorCode::Upload,
                    "image upload is not configured; set upload_cloud_name and upload_preset",
                )
            })?;
            let payload = ImagePayload::from_path(&path).await?;
            let image = uploader.upload(payload).await?;
            form.attach_image(image);
        }
        Ok(())
    }
}

fn kept_draft(mut report: ErrorReport) -> ErrorReport {
    report
        .message
        .push_str("\n(draft kept: fix it with `retry --field value`, or `discard`)");
    report
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
