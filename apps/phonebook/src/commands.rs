//! Grammar of the interactive prompt.
//!
//! Each input line is split into words (single and double quotes group,
//! a backslash escapes the next character) and parsed with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use shared::domain::{CountryCode, Label, LabelFilter};
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(
    name = "phonebook",
    no_binary_name = true,
    disable_version_flag = true,
    about = "Manage contacts from the prompt"
)]
pub struct Line {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the current page of contacts
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show one contact
    Show { id: String },
    /// Create a contact
    Add(ContactFields),
    /// Change an existing contact
    Edit {
        id: String,
        #[command(flatten)]
        fields: ContactFields,
    },
    /// Apply more changes to the draft kept after a failed add or edit, then submit it again
    Retry(ContactFields),
    /// Show the kept draft and its errors
    Draft,
    /// Throw the kept draft away
    Discard,
    /// Delete a contact
    #[command(alias = "rm")]
    Delete {
        id: String,
        /// Skip the confirmation question
        #[arg(long, short)]
        yes: bool,
    },
    /// Flip a contact's bookmark
    Bookmark { id: String },
    /// Filter by name; no words clears the search
    Search { words: Vec<String> },
    /// Select the label filter: all, work, school, friends or family
    Label { filter: LabelFilter },
    /// Turn the label filter on or off without forgetting the selection
    Filter { state: Switch },
    /// Toggle showing bookmarked contacts only
    Bookmarked,
    /// Jump to a page (1-based)
    Page { number: usize },
    /// Next page
    Next,
    /// Previous page
    Prev,
    /// List known country codes with their calling codes
    Countries,
    /// Leave the prompt
    #[command(alias = "exit")]
    Quit,
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    #[arg(long)]
    pub name: Option<String>,
    /// National number, digits only
    #[arg(long)]
    pub phone: Option<String>,
    /// Two-letter country code; changing it clears the phone number
    #[arg(long)]
    pub country: Option<CountryCode>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub label: Option<Label>,
    #[arg(long, conflicts_with = "unbookmark")]
    pub bookmark: bool,
    #[arg(long)]
    pub unbookmark: bool,
    /// Upload a jpg or png and use it as the avatar
    #[arg(long, conflicts_with = "remove_image")]
    pub image: Option<PathBuf>,
    #[arg(long)]
    pub remove_image: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub fn enabled(self) -> bool {
        matches!(self, Switch::On)
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unterminated quote")]
    UnterminatedQuote,
    #[error("{0}")]
    Clap(#[from] clap::Error),
}

/// Parses one prompt line. `Ok(None)` for blank lines.
pub fn parse_line(input: &str) -> Result<Option<Command>, ParseError> {
    let words = split_words(input)?;
    if words.is_empty() {
        return Ok(None);
    }
    let line = Line::try_parse_from(words)?;
    Ok(Some(line.command))
}

pub fn split_words(input: &str) -> Result<Vec<String>, ParseError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('"'), '\\') | (None, '\\') => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
                in_word = true;
            }
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(ParseError::UnterminatedQuote);
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
