use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0.simple())
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

id_newtype!(ContactId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Label {
    #[default]
    Work,
    School,
    Friends,
    Family,
}

impl Label {
    pub const ALL: [Label; 4] = [Label::Work, Label::School, Label::Friends, Label::Family];

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Work => "Work",
            Label::School => "School",
            Label::Friends => "Friends",
            Label::Family => "Family",
        }
    }

    /// Accent color used for chips and initial-letter avatars.
    pub fn color(self) -> &'static str {
        match self {
            Label::Work => "#1976d2",
            Label::School => "#2e7d32",
            Label::Friends => "#ed6c02",
            Label::Family => "#9c27b0",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown label '{0}'; expected one of Work, School, Friends, Family")]
pub struct ParseLabelError(pub String);

impl FromStr for Label {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        Label::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(raw))
            .ok_or_else(|| ParseLabelError(raw.to_string()))
    }
}

/// Label constraint applied by the contact list; `All` keeps every label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelFilter {
    #[default]
    All,
    Only(Label),
}

impl LabelFilter {
    pub fn matches(self, label: Label) -> bool {
        match self {
            LabelFilter::All => true,
            LabelFilter::Only(wanted) => wanted == label,
        }
    }
}

impl fmt::Display for LabelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelFilter::All => f.write_str("all"),
            LabelFilter::Only(label) => label.fmt(f),
        }
    }
}

impl FromStr for LabelFilter {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(LabelFilter::All)
        } else {
            s.parse().map(LabelFilter::Only)
        }
    }
}

/// ISO 3166-1 alpha-2 country code, stored uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode([u8; 2]);

impl CountryCode {
    pub fn new(raw: &str) -> Option<Self> {
        match raw.trim().as_bytes() {
            [a, b] if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() => {
                Some(Self([a.to_ascii_uppercase(), b.to_ascii_uppercase()]))
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        // Both bytes are ASCII letters by construction.
        std::str::from_utf8(&self.0).unwrap_or("??")
    }
}

impl Default for CountryCode {
    fn default() -> Self {
        Self(*b"IN")
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid country code '{0}'; expected two letters")]
pub struct ParseCountryCodeError(pub String);

impl FromStr for CountryCode {
    type Err = ParseCountryCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or_else(|| ParseCountryCodeError(s.to_string()))
    }
}

impl TryFrom<String> for CountryCode {
    type Error = ParseCountryCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CountryCode> for String {
    fn from(value: CountryCode) -> Self {
        value.as_str().to_string()
    }
}

/// Reference to an image held by the external media host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    pub public_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub phone: String,
    pub country: CountryCode,
    pub address: String,
    pub label: Label,
    #[serde(default)]
    pub bookmarked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Avatar<'a> {
    Image(&'a str),
    Initial { letter: char, color: &'static str },
}

impl Contact {
    pub fn avatar(&self) -> Avatar<'_> {
        match &self.image {
            Some(image) => Avatar::Image(&image.url),
            None => Avatar::Initial {
                letter: initial_letter(&self.name),
                color: self.label.color(),
            },
        }
    }
}

pub fn initial_letter(name: &str) -> char {
    name.trim()
        .chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or('?')
}
