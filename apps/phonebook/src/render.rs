use std::fmt::Write;

use phonebook_core::{CallingCodes, ContactForm, FormMode, Projection, ViewOptions};
use shared::domain::{Avatar, Contact, ContactId, LabelFilter};

const SHORT_ID_LEN: usize = 8;

pub fn short_id(id: ContactId) -> String {
    id.to_string().chars().take(SHORT_ID_LEN).collect()
}

/// The contact list as shown at the prompt: summary, filter line, one row per contact.
pub fn page(
    view: &Projection<'_>,
    options: ViewOptions,
    search_query: &str,
    selected_label: LabelFilter,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.summary(options.bookmarked_only));

    let mut filters = Vec::new();
    if !search_query.trim().is_empty() {
        filters.push(format!("search \"{}\"", search_query.trim()));
    }
    let filter_state = if options.filter_enabled { "on" } else { "off" };
    filters.push(format!("label {selected_label} ({filter_state})"));
    let _ = writeln!(
        out,
        "{} | page {}/{}",
        filters.join(", "),
        view.page,
        view.total_pages.max(1)
    );

    if view.is_empty() {
        out.push_str("No contacts found");
        return out;
    }

    let name_width = view
        .items
        .iter()
        .map(|contact| contact.name.chars().count())
        .max()
        .unwrap_or(0);
    for contact in &view.items {
        let star = if contact.bookmarked { '*' } else { ' ' };
        let _ = writeln!(
            out,
            "{star} {}  {:<name_width$}  {:<9}  {}",
            short_id(contact.id),
            contact.name,
            format!("[{}]", contact.label),
            contact.phone,
        );
    }
    out.truncate(out.trim_end().len());
    out
}

pub fn contact(contact: &Contact) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", contact.name, contact.id);
    let _ = writeln!(out, "  label:      {}", contact.label);
    let _ = writeln!(out, "  phone:      {}", contact.phone);
    let _ = writeln!(out, "  country:    {}", contact.country);
    let _ = writeln!(out, "  address:    {}", contact.address);
    let _ = writeln!(
        out,
        "  bookmarked: {}",
        if contact.bookmarked { "yes" } else { "no" }
    );
    let _ = match contact.avatar() {
        Avatar::Image(url) => write!(out, "  avatar:     {url}"),
        Avatar::Initial { letter, color } => write!(out, "  avatar:     {letter} on {color}"),
    };
    out
}

pub fn draft(form: &ContactForm) -> String {
    let mut out = String::new();
    let heading = match form.mode() {
        FormMode::New(_) => "new contact".to_string(),
        FormMode::Edit(id) => format!("editing {}", short_id(id)),
    };
    let _ = writeln!(out, "draft: {heading}");
    let _ = writeln!(out, "  name:       {}", form.name());
    let _ = writeln!(out, "  phone:      {}", form.phone());
    let _ = writeln!(out, "  country:    {}", form.country());
    let _ = writeln!(out, "  address:    {}", form.address());
    let _ = writeln!(out, "  label:      {}", form.label());
    let _ = writeln!(
        out,
        "  bookmarked: {}",
        if form.bookmarked() { "yes" } else { "no" }
    );
    if let Some(image) = form.image() {
        let _ = writeln!(out, "  image:      {}", image.url);
    }
    for (field, message) in form.errors().iter() {
        let _ = writeln!(out, "  ! {}: {message}", field.as_str());
    }
    out.truncate(out.trim_end().len());
    out
}

pub fn countries(codes: &dyn CallingCodes) -> String {
    codes
        .countries()
        .into_iter()
        .filter_map(|country| {
            codes
                .calling_code(country)
                .map(|code| format!("{country} +{code}"))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
