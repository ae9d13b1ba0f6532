/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Built-in author-date formatter.
//!
//! Produces APA-like labels and reference entries. It honours the output kind
//! but not the style name: every style renders the same way.

use pubtex_core::reference::{Bibliography, Name, Reference};

use super::{CitationRequest, OutputKind, StyleFormatter};
use crate::error::{ProcessorError, Result};
use crate::render::{Html, OutputFormat, PlainText};

const NO_DATE: &str = "n.d.";

#[derive(Debug, Default, Clone, Copy)]
pub struct AuthorDateFormatter;

impl StyleFormatter for AuthorDateFormatter {
    fn format_citation(
        &self,
        bibliography: &Bibliography,
        request: &CitationRequest<'_>,
    ) -> Result<String> {
        let reference = bibliography
            .get(request.key)
            .ok_or_else(|| ProcessorError::ReferenceNotFound(request.key.to_string()))?;
        Ok(match request.output {
            OutputKind::Text => citation_label(&PlainText, reference),
            OutputKind::Html => citation_label(&Html, reference),
        })
    }

    fn format_bibliography(
        &self,
        bibliography: &Bibliography,
        _style: &str,
        output: OutputKind,
    ) -> Result<String> {
        let mut references: Vec<&Reference> = bibliography.values().collect();
        references.sort_by_cached_key(|r| sort_key(r));
        Ok(match output {
            OutputKind::Text => render_bibliography(&PlainText, &references),
            OutputKind::Html => render_bibliography(&Html, &references),
        })
    }
}

fn sort_key(reference: &Reference) -> (String, String) {
    let primary = reference
        .first_author()
        .map(|n| n.family.clone())
        .or_else(|| reference.title.clone())
        .unwrap_or_default();
    (
        primary.to_lowercase(),
        reference.year.clone().unwrap_or_default(),
    )
}

fn year(reference: &Reference) -> &str {
    reference.year.as_deref().unwrap_or(NO_DATE)
}

/// Short author form used in citation labels.
fn label_authors(reference: &Reference) -> String {
    match reference.names() {
        [] => reference
            .title
            .clone()
            .unwrap_or_else(|| reference.id.clone()),
        [only] => only.family.clone(),
        [first, second] => format!("{} & {}", first.family, second.family),
        [first, ..] => format!("{} et al.", first.family),
    }
}

fn citation_label<F: OutputFormat<Output = String>>(fmt: &F, reference: &Reference) -> String {
    let content = fmt.text(&format!("{}, {}", label_authors(reference), year(reference)));
    fmt.finish(fmt.affix("(", content, ")"))
}

fn inverted_name(name: &Name) -> String {
    let initials = name.initials();
    if initials.is_empty() {
        name.family.clone()
    } else {
        format!("{}, {}", name.family, initials)
    }
}

fn name_list(names: &[Name]) -> String {
    let inverted: Vec<String> = names.iter().map(inverted_name).collect();
    match inverted.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{}, & {}", rest.join(", "), last),
    }
}

fn render_entry<F: OutputFormat<Output = String>>(fmt: &F, reference: &Reference) -> String {
    let mut parts: Vec<String> = Vec::new();
    let title = reference.title.as_deref().unwrap_or_default();
    let in_container = reference.container_title.is_some();
    let styled_title = if in_container {
        fmt.text(title)
    } else {
        fmt.emph(fmt.text(title))
    };

    let names = reference.names();
    if names.is_empty() {
        parts.push(fmt.affix("", styled_title, "."));
        parts.push(fmt.text(&format!("({}).", year(reference))));
    } else {
        let mut contributors = name_list(names);
        if reference.author.is_empty() {
            contributors.push_str(if names.len() > 1 { " (Eds.)" } else { " (Ed.)" });
        }
        parts.push(fmt.text(&contributors));
        parts.push(fmt.text(&format!("({}).", year(reference))));
        if !title.is_empty() {
            parts.push(fmt.affix("", styled_title, "."));
        }
    }

    if let Some(container) = &reference.container_title {
        let mut source = fmt.emph(fmt.text(container));
        if let Some(volume) = &reference.volume {
            source = fmt.affix("", source, ", ");
            source.push_str(&fmt.emph(fmt.text(volume)));
            if let Some(issue) = &reference.issue {
                source.push_str(&fmt.text(&format!("({})", issue)));
            }
        }
        if let Some(pages) = &reference.pages {
            source.push_str(&fmt.text(&format!(", {}", pages.replace("--", "\u{2013}"))));
        }
        parts.push(fmt.affix("", source, "."));
    } else if let Some(publisher) = &reference.publisher {
        parts.push(fmt.text(&format!("{}.", publisher)));
    }

    if let Some(doi) = &reference.doi {
        let url = format!("https://doi.org/{}", doi);
        parts.push(fmt.link(&url, fmt.text(&url)));
    } else if let Some(url) = &reference.url {
        parts.push(fmt.link(url, fmt.text(url)));
    }

    fmt.entry(&reference.id, fmt.join(parts, " "))
}

fn render_bibliography<F: OutputFormat<Output = String>>(
    fmt: &F,
    references: &[&Reference],
) -> String {
    let entries = references.iter().map(|r| render_entry(fmt, r)).collect();
    fmt.finish(fmt.bibliography(entries))
}
