//! Filtered, bookmark-first, paginated view of the contact list.
//!
//! # Pipeline
//!
//! 1. Search: keep contacts whose name or phone contains the query
//!    (case-insensitive substring; an empty query keeps everything).
//! 2. Label: applied only while the label filter is enabled.
//! 3. Bookmark: with `bookmarked_only`, keep bookmarked contacts.
//! 4. Sort: bookmarked first, then [`compare_names`].
//! 5. Paginate: 1-based pages of `page_size`.
//!
//! The projection is a pure function of its inputs; resetting the page when
//! a filter changes is the caller's job (see [`crate::Phonebook`]).

use serde::Serialize;
use shared::domain::{Contact, LabelFilter};

use crate::collation::compare_names;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionQuery<'a> {
    pub search_query: &'a str,
    pub selected_label: LabelFilter,
    pub filter_enabled: bool,
    pub bookmarked_only: bool,
    /// 1-based page number.
    pub page: usize,
    pub page_size: usize,
}

impl Default for ProjectionQuery<'_> {
    fn default() -> Self {
        Self {
            search_query: "",
            selected_label: LabelFilter::All,
            filter_enabled: true,
            bookmarked_only: false,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection<'a> {
    pub items: Vec<&'a Contact>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    /// Number of contacts that passed every filter, across all pages.
    pub total_matches: usize,
}

impl Projection<'_> {
    /// True when there is nothing to show on this page.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Header line such as `"3 Contacts (Bookmarked)"`.
    pub fn summary(&self, bookmarked_only: bool) -> String {
        let plural = if self.total_matches == 1 { "" } else { "s" };
        let suffix = if bookmarked_only { " (Bookmarked)" } else { "" };
        format!("{} Contact{plural}{suffix}", self.total_matches)
    }
}

pub fn project<'a>(contacts: &'a [Contact], query: &ProjectionQuery<'_>) -> Projection<'a> {
    let needle = query.search_query.to_lowercase();
    let mut matches: Vec<&Contact> = contacts
        .iter()
        .filter(|contact| matches_search(contact, &needle))
        .filter(|contact| !query.filter_enabled || query.selected_label.matches(contact.label))
        .filter(|contact| !query.bookmarked_only || contact.bookmarked)
        .collect();

    matches.sort_by(|a, b| {
        b.bookmarked
            .cmp(&a.bookmarked)
            .then_with(|| compare_names(&a.name, &b.name))
    });

    let page_size = query.page_size.max(1);
    let total_matches = matches.len();
    let total_pages = total_matches.div_ceil(page_size);

    let items = match query.page.checked_sub(1) {
        Some(index) if index < total_pages => matches
            .into_iter()
            .skip(index * page_size)
            .take(page_size)
            .collect(),
        _ => Vec::new(),
    };

    Projection {
        items,
        page: query.page,
        page_size,
        total_pages,
        total_matches,
    }
}

fn matches_search(contact: &Contact, needle: &str) -> bool {
    needle.is_empty()
        || contact.name.to_lowercase().contains(needle)
        || contact.phone.to_lowercase().contains(needle)
}

#[cfg(test)]
#[path = "tests/projection_tests.rs"]
mod tests;
