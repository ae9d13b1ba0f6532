/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Inline citation text for one occurrence.

use std::sync::LazyLock;

use pubtex_core::citation::{CitationOccurrence, CitationPosition, CitationType};
use regex::Regex;

/// `(Author, Year)`: everything up to the last ", " is the author part.
static AUTHOR_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((.*), (.*?)\)").expect("author-year regex"));

/// The label without its parentheses, with the occurrence's notes attached:
/// `see Lee, 2021, p. 4`.
pub fn format_citation(occurrence: &CitationOccurrence, label: &str) -> String {
    let bare = label.replacen('(', "", 1).replacen(')', "", 1);
    let mut out = String::new();
    if let Some(prefix) = &occurrence.prefix {
        out.push_str(prefix);
        out.push(' ');
    }
    out.push_str(&bare);
    if let Some(suffix) = &occurrence.suffix {
        out.push_str(", ");
        out.push_str(suffix);
    }
    out
}

/// The text that replaces one citation occurrence in running prose.
///
/// Parenthetical occurrences share one pair of parentheses across a group:
/// `first` opens it, `middle` continues after a semicolon, `last` closes it.
pub fn fix_citation(occurrence: &CitationOccurrence, label: &str) -> String {
    match occurrence.kind {
        CitationType::Text if AUTHOR_YEAR.is_match(label) => {
            let mut out = String::new();
            if let Some(prefix) = &occurrence.prefix {
                out.push_str(prefix);
                out.push(' ');
            }
            out.push_str(&AUTHOR_YEAR.replace(label, "$1 ($2"));
            if let Some(suffix) = &occurrence.suffix {
                out.push(' ');
                out.push_str(suffix);
            }
            out.push(')');
            out
        }
        CitationType::Year => AUTHOR_YEAR.replace(label, "$2").into_owned(),
        CitationType::Author => AUTHOR_YEAR.replace(label, "$1").into_owned(),
        CitationType::Text => format_citation(occurrence, label),
        CitationType::Paren => {
            let formatted = format_citation(occurrence, label);
            match occurrence.position {
                CitationPosition::First => format!("({}; ", formatted),
                CitationPosition::Middle => format!("{}; ", formatted),
                CitationPosition::Last => format!("{})", formatted),
                CitationPosition::Alone => format!("({})", formatted),
            }
        }
    }
}
