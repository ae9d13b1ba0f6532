/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Bibliographic reference model.
//!
//! References are converted from BibTeX/BibLaTeX entries parsed by the
//! `biblatex` crate. Only the fields the author-date formatter and the label
//! disambiguator look at are kept.

use biblatex::{Chunk, Entry, Person};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// References keyed by citation key, in database order.
pub type Bibliography = IndexMap<String, Reference>;

/// A personal name.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Name {
    pub family: String,
    #[serde(default)]
    pub given: String,
}

impl Name {
    pub fn new(family: &str, given: &str) -> Self {
        Self {
            family: family.to_string(),
            given: given.to_string(),
        }
    }

    /// First letter of the given name, if any.
    pub fn given_initial(&self) -> Option<char> {
        self.given.chars().find(|c| c.is_alphabetic())
    }

    /// Initials of every given name part: "Thomas S." becomes "T. S.".
    pub fn initials(&self) -> String {
        self.given
            .split(|c: char| c.is_whitespace() || c == '-')
            .filter_map(|part| part.chars().find(|c| c.is_alphabetic()))
            .map(|c| format!("{}.", c))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn from_person(person: &Person) -> Self {
        let family = if person.prefix.is_empty() {
            person.name.clone()
        } else {
            format!("{} {}", person.prefix, person.name)
        };
        Self {
            family,
            given: person.given_name.clone(),
        }
    }
}

/// A bibliographic reference.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Reference {
    pub id: String,
    /// Lowercase BibTeX entry type ("article", "book", ...).
    pub entry_type: String,
    #[serde(default)]
    pub author: Vec<Name>,
    #[serde(default)]
    pub editor: Vec<Name>,
    pub title: Option<String>,
    /// Year of issue, as written (may carry a suffix or be "in press").
    pub year: Option<String>,
    pub container_title: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub pages: Option<String>,
    pub publisher: Option<String>,
    pub doi: Option<String>,
    pub url: Option<String>,
}

impl Reference {
    /// Convert a parsed BibLaTeX entry.
    pub fn from_biblatex(entry: &Entry) -> Self {
        let field_str = |key: &str| {
            entry.fields.get(key).map(|f| {
                f.iter()
                    .map(|c| match &c.v {
                        Chunk::Normal(s) | Chunk::Verbatim(s) => s.as_str(),
                        _ => "",
                    })
                    .collect::<String>()
            })
        };
        let persons = |key: &str| -> Vec<Name> {
            let found: Option<Vec<Person>> = match key {
                "author" => entry.author().ok(),
                _ => entry
                    .editors()
                    .ok()
                    .map(|e| e.into_iter().flat_map(|(persons, _)| persons).collect()),
            };
            found
                .map(|p| p.iter().map(Name::from_person).collect())
                .unwrap_or_default()
        };

        let year = field_str("year")
            .or_else(|| field_str("date").map(|d| d.chars().take(4).collect()))
            .filter(|y| !y.trim().is_empty());

        Self {
            id: entry.key.clone(),
            entry_type: entry.entry_type.to_string().to_lowercase(),
            author: persons("author"),
            editor: persons("editor"),
            title: field_str("title"),
            year,
            container_title: field_str("journaltitle")
                .or_else(|| field_str("journal"))
                .or_else(|| field_str("booktitle")),
            volume: field_str("volume"),
            issue: field_str("number").or_else(|| field_str("issue")),
            pages: field_str("pages"),
            publisher: field_str("publisher").or_else(|| field_str("institution")),
            doi: field_str("doi"),
            url: field_str("url"),
        }
    }

    /// Authors, falling back to editors when there are none.
    pub fn names(&self) -> &[Name] {
        if self.author.is_empty() {
            &self.editor
        } else {
            &self.author
        }
    }

    pub fn first_author(&self) -> Option<&Name> {
        self.names().first()
    }
}
