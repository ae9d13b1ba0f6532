/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

#![allow(dead_code)]

use std::cell::RefCell;

use pubtex_core::reference::{Bibliography, Name, Reference};
use pubtex_core::tree::{Attrs, Node};
use pubtex_processor::style::{AuthorDateFormatter, CitationRequest, OutputKind, StyleFormatter};
use pubtex_processor::Result;
use serde_json::Value;

// --- Helper Functions for Test Data Construction ---

/// Create a Reference with the given authors and year.
pub fn make_reference(id: &str, authors: &[(&str, &str)], year: &str, title: &str) -> Reference {
    Reference {
        id: id.to_string(),
        entry_type: "article".to_string(),
        author: authors
            .iter()
            .map(|(family, given)| Name::new(family, given))
            .collect(),
        title: Some(title.to_string()),
        year: Some(year.to_string()),
        ..Default::default()
    }
}

pub fn make_bibliography(references: Vec<Reference>) -> Bibliography {
    references.into_iter().map(|r| (r.id.clone(), r)).collect()
}

/// A raw BibTeX entry as carried by a citation placeholder.
pub fn bibtex_entry(key: &str, author: &str, year: &str) -> String {
    format!(
        "@article{{{}, author = {{{}}}, title = {{Study {}}}, journal = {{Journal}}, year = {{{}}}}}",
        key, author, key, year
    )
}

/// A citation placeholder node carrying a BibTeX entry.
pub fn citation_node(key: &str, author: &str, year: &str) -> Node {
    let mut attrs = Attrs::new();
    attrs.insert(
        "value".to_string(),
        Value::from(bibtex_entry(key, author, year)),
    );
    Node::citation(attrs)
}

pub fn text_paragraph(text: &str) -> Node {
    Node::paragraph(vec![Node::text(text)])
}

pub fn table_node(columns: usize) -> Node {
    let cells = (0..columns)
        .map(|_| Node::element("table_cell", Attrs::new(), vec![Node::empty_paragraph()]))
        .collect();
    Node::table(
        Attrs::new(),
        vec![Node::element("table_row", Attrs::new(), cells)],
    )
}

/// One observed citation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub key: String,
    pub before: Vec<String>,
    pub after: Vec<String>,
}

/// Author-date formatter that records the citation context of each request.
#[derive(Default)]
pub struct RecordingFormatter {
    pub requests: RefCell<Vec<Recorded>>,
}

impl RecordingFormatter {
    pub fn recorded(&self) -> Vec<Recorded> {
        self.requests.borrow().clone()
    }
}

impl StyleFormatter for RecordingFormatter {
    fn format_citation(
        &self,
        bibliography: &Bibliography,
        request: &CitationRequest<'_>,
    ) -> Result<String> {
        self.requests.borrow_mut().push(Recorded {
            key: request.key.to_string(),
            before: request.cited_before.to_vec(),
            after: request.cited_after.to_vec(),
        });
        AuthorDateFormatter.format_citation(bibliography, request)
    }

    fn format_bibliography(
        &self,
        bibliography: &Bibliography,
        style: &str,
        output: OutputKind,
    ) -> Result<String> {
        AuthorDateFormatter.format_bibliography(bibliography, style, output)
    }
}
