use serde::{Deserialize, Serialize};

use crate::domain::{Contact, ContactId, LabelFilter};

/// Store mutations, applied in order by the contact store's `update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Action {
    AddContact(Contact),
    EditContact(Contact),
    DeleteContact(ContactId),
    ToggleBookmark(ContactId),
    SetSearchQuery(String),
    SetSelectedLabel(LabelFilter),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddContact(_) => "add_contact",
            Action::EditContact(_) => "edit_contact",
            Action::DeleteContact(_) => "delete_contact",
            Action::ToggleBookmark(_) => "toggle_bookmark",
            Action::SetSearchQuery(_) => "set_search_query",
            Action::SetSelectedLabel(_) => "set_selected_label",
        }
    }
}
