/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! BibLaTeX citation command parsing.
//!
//! Recognized commands: `\parencite`, `\parencites`, `\textcite`, `\textcites`,
//! `\citeauthor` and `\citeyear`. Each takes one or more entries of the form
//! `[note][note]{key}`: with two notes the first is the prefix and the second
//! the suffix, a single note is the suffix.

use std::sync::LazyLock;

use pubtex_core::citation::{CitationOccurrence, CitationPosition, CitationType};
use regex::Regex;
use winnow::combinator::{alt, opt, repeat};
use winnow::error::ContextError;
use winnow::prelude::*;
use winnow::token::take_till;

/// A formatting command wrapping note text, e.g. `\emph{cf.}`.
static NOTE_COMMAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\.*?\{(.*?)\}").expect("note command regex"));

/// A trait for markup parsers that can identify citation commands.
pub trait CitationParser {
    /// Find citation commands in `content`.
    /// Returns `(start_index, end_index, occurrences)` per command, in order.
    fn parse_citations(&self, content: &str) -> Vec<(usize, usize, Vec<CitationOccurrence>)>;
}

/// Parser for BibLaTeX citation commands.
#[derive(Debug, Default, Clone, Copy)]
pub struct LatexParser;

impl CitationParser for LatexParser {
    fn parse_citations(&self, content: &str) -> Vec<(usize, usize, Vec<CitationOccurrence>)> {
        let mut results = Vec::new();
        let mut input = content;
        let mut offset = 0;

        while let Some(start_pos) = input.find('\\') {
            let potential = &input[start_pos..];
            let mut p_input = potential;

            if let Ok(occurrences) = parse_command(&mut p_input) {
                let end_pos = start_pos + (potential.len() - p_input.len());
                results.push((offset + start_pos, offset + end_pos, occurrences));
                input = &input[end_pos..];
                offset += end_pos;
            } else {
                let shift = start_pos + 1;
                input = &input[shift..];
                offset += shift;
            }
        }

        results
    }
}

struct Entry<'a> {
    first_note: Option<&'a str>,
    second_note: Option<&'a str>,
    key: &'a str,
}

/// Parse `\command` followed by one or more entries.
fn parse_command(input: &mut &str) -> winnow::Result<Vec<CitationOccurrence>, ContextError> {
    let _ = '\\'.parse_next(input)?;
    let command: &str = alt((
        "parencites",
        "parencite",
        "textcites",
        "textcite",
        "citeauthor",
        "citeyear",
    ))
    .parse_next(input)?;
    let entries: Vec<Entry<'_>> = repeat(1.., parse_entry).parse_next(input)?;

    let kind = CitationType::from_command(command).unwrap_or_default();
    let count = entries.len();
    let occurrences = entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let (prefix, suffix) = match (entry.first_note, entry.second_note) {
                (Some(prefix), Some(suffix)) => (clean_note(prefix), clean_note(suffix)),
                (Some(suffix), None) | (None, Some(suffix)) => (None, clean_note(suffix)),
                (None, None) => (None, None),
            };
            CitationOccurrence {
                key: entry.key.trim().to_string(),
                kind,
                position: CitationPosition::in_group(i, count),
                prefix,
                suffix,
            }
        })
        .collect();

    Ok(occurrences)
}

/// Parse `[note][note]{key}` with both notes optional.
fn parse_entry<'a>(input: &mut &'a str) -> winnow::Result<Entry<'a>, ContextError> {
    let first_note = opt(parse_note).parse_next(input)?;
    let second_note = opt(parse_note).parse_next(input)?;
    let _ = '{'.parse_next(input)?;
    let key = take_till(0.., '}').parse_next(input)?;
    let _ = '}'.parse_next(input)?;
    Ok(Entry {
        first_note,
        second_note,
        key,
    })
}

fn parse_note<'a>(input: &mut &'a str) -> winnow::Result<&'a str, ContextError> {
    let _ = '['.parse_next(input)?;
    let note = take_till(0.., ']').parse_next(input)?;
    let _ = ']'.parse_next(input)?;
    Ok(note)
}

/// Reduce `\emph{text}` style wrappers to their argument; empty notes vanish.
fn clean_note(note: &str) -> Option<String> {
    let cleaned = NOTE_COMMAND.replace_all(note, "$1");
    let cleaned = cleaned.trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

/// All citation occurrences in `content`, in document order.
pub fn find_citations(content: &str) -> Vec<CitationOccurrence> {
    LatexParser
        .parse_citations(content)
        .into_iter()
        .flat_map(|(_, _, occurrences)| occurrences)
        .collect()
}

/// Rewrite every citation command in `content`.
///
/// Each occurrence is passed to `render` in document order and the whole
/// command is replaced by the concatenation of the results for its entries.
pub fn replace_citations<F>(content: &str, mut render: F) -> String
where
    F: FnMut(&CitationOccurrence) -> String,
{
    let mut result = String::with_capacity(content.len());
    let mut last_idx = 0;

    for (start, end, occurrences) in LatexParser.parse_citations(content) {
        result.push_str(&content[last_idx..start]);
        for occurrence in &occurrences {
            result.push_str(&render(occurrence));
        }
        last_idx = end;
    }

    result.push_str(&content[last_idx..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_parencite() {
        let citations = find_citations(r"as shown \parencite{Smith2020}.");
        assert_eq!(
            citations,
            vec![CitationOccurrence {
                key: "Smith2020".to_string(),
                kind: CitationType::Paren,
                position: CitationPosition::Alone,
                prefix: None,
                suffix: None,
            }]
        );
    }

    #[test]
    fn test_grouped_entries_with_notes() {
        let citations = find_citations(r"\parencites[see][p. 4]{a}{b}[chap. 2]{c}");
        assert_eq!(citations.len(), 3);

        assert_eq!(citations[0].key, "a");
        assert_eq!(citations[0].prefix.as_deref(), Some("see"));
        assert_eq!(citations[0].suffix.as_deref(), Some("p. 4"));
        assert_eq!(citations[0].position, CitationPosition::First);

        assert_eq!(citations[1].key, "b");
        assert_eq!(citations[1].prefix, None);
        assert_eq!(citations[1].position, CitationPosition::Middle);

        assert_eq!(citations[2].key, "c");
        assert_eq!(citations[2].suffix.as_deref(), Some("chap. 2"));
        assert_eq!(citations[2].position, CitationPosition::Last);
    }

    #[test]
    fn test_formatting_command_in_note_is_unwrapped() {
        let citations = find_citations(r"\textcite[\emph{cf.}][12]{kuhn1962}");
        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].kind, CitationType::Text);
        assert_eq!(citations[0].prefix.as_deref(), Some("cf."));
        assert_eq!(citations[0].suffix.as_deref(), Some("12"));
    }

    #[test]
    fn test_empty_prefix_note() {
        let citations = find_citations(r"\parencite[][p. 5]{a}");
        assert_eq!(citations[0].prefix, None);
        assert_eq!(citations[0].suffix.as_deref(), Some("p. 5"));
    }

    #[test]
    fn test_author_and_year_commands() {
        let citations = find_citations(r"\citeauthor{x} wrote in \citeyear{x}");
        let kinds: Vec<CitationType> = citations.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![CitationType::Author, CitationType::Year]);
    }

    #[test]
    fn test_other_commands_are_ignored() {
        assert!(find_citations(r"\cite{x} \parencite no braces \citeyearpar{y} \\").is_empty());
    }

    #[test]
    fn test_positions_for_every_group_size() {
        for n in 1..=6 {
            let keys: String = (0..n).map(|i| format!("{{k{}}}", i)).collect();
            let citations = find_citations(&format!(r"\textcites{}", keys));
            assert_eq!(citations.len(), n);
            if n == 1 {
                assert_eq!(citations[0].position, CitationPosition::Alone);
                continue;
            }
            assert_eq!(citations[0].position, CitationPosition::First);
            assert_eq!(citations[n - 1].position, CitationPosition::Last);
            for c in &citations[1..n - 1] {
                assert_eq!(c.position, CitationPosition::Middle);
            }
        }
    }

    #[test]
    fn test_replace_citations_rewrites_whole_command() {
        let rewritten = replace_citations(r"A \parencites{a}{b} B \citeyear{c}.", |o| {
            format!("<{}>", o.key)
        });
        assert_eq!(rewritten, "A <a><b> B <c>.");
    }

    #[test]
    fn test_repeated_commands_are_rewritten_in_place() {
        let mut seen = Vec::new();
        let rewritten = replace_citations(r"\parencite{a} x \parencite{a}", |o| {
            seen.push(o.key.clone());
            format!("[{}]", seen.len())
        });
        assert_eq!(rewritten, "[1] x [2]");
    }

    #[test]
    fn test_offsets() {
        let content = r"xy \citeauthor{k} z";
        let parsed = LatexParser.parse_citations(content);
        assert_eq!(parsed.len(), 1);
        let (start, end, _) = &parsed[0];
        assert_eq!(&content[*start..*end], r"\citeauthor{k}");
    }
}
