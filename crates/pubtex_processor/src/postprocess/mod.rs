/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Document tree post-processing.
//!
//! Takes the tree an external builder produced from the manuscript body and
//! finishes it: citation placeholders get their labels, tables get captions
//! and styling, duplicate abstract headings are blanked, a reference list is
//! appended and the abstract/keywords/DOI front matter is prepended.
//!
//! All walk state (citation records, the occurrence index) lives in values
//! owned by a single [`PostProcessor::process`] call.

pub mod assembly;
pub mod citations;
pub mod structure;

pub use assembly::{bibliography_nodes, crossmark_href, references_section, FrontMatter};
pub use citations::{bibtex_key, CitationRecord, CitationRewriter, CitationStore};
pub use structure::{blank_duplicate_abstracts, caption_paragraph, caption_tables};

use pubtex_core::citation::CitationOccurrence;
use pubtex_core::reference::Bibliography;
use pubtex_core::tree::{Fragment, Node};
use pubtex_core::{Funding, PipelineConfig};
use serde::Serialize;

use crate::error::Result;
use crate::markup::{extract_table_captions, find_citations, TableCaption};
use crate::style::{OutputKind, StyleFormatter};

/// Everything the post-processor needs besides the tree itself.
#[derive(Debug, Clone, Default)]
pub struct PostProcessInput {
    /// The manuscript markup the tree was built from.
    pub tex: String,
    pub bibliography: Option<Bibliography>,
    pub abstract_html: Option<String>,
    pub keywords: Option<String>,
    pub doi: Option<String>,
    pub funding: Option<Funding>,
}

/// The finished document and its forwarded funding metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Processed {
    pub doc: Node,
    pub funding: Option<Funding>,
}

pub struct PostProcessor<'a> {
    config: &'a PipelineConfig,
    formatter: &'a dyn StyleFormatter,
    input: PostProcessInput,
    occurrences: Vec<CitationOccurrence>,
    captions: Vec<TableCaption>,
}

impl<'a> PostProcessor<'a> {
    /// Prepare a post-processor, recovering citation occurrences and table
    /// captions from the markup up front.
    pub fn new(
        config: &'a PipelineConfig,
        formatter: &'a dyn StyleFormatter,
        input: PostProcessInput,
    ) -> Self {
        let occurrences = find_citations(&input.tex);
        let captions = extract_table_captions(&input.tex);
        log::debug!(
            "markup has {} citation occurrence(s) and {} table environment(s)",
            occurrences.len(),
            captions.len()
        );
        Self {
            config,
            formatter,
            input,
            occurrences,
            captions,
        }
    }

    /// Run every pass over `doc` and return the finished top-level nodes.
    pub fn process(&self, doc: Fragment) -> Result<Fragment> {
        let mut store = CitationStore::collect(&doc, self.input.bibliography.as_ref());
        store.resolve_labels(self.formatter, &self.config.style);

        let mut rewriter = CitationRewriter::new(&store, &self.occurrences);
        let doc = rewriter.rewrite_fragment(doc);
        if rewriter.index() != self.occurrences.len() {
            log::warn!(
                "tree has {} citation(s) but the markup has {}",
                rewriter.index(),
                self.occurrences.len()
            );
        }

        let abstract_html = non_empty(&self.input.abstract_html);
        let doc = blank_duplicate_abstracts(doc, &self.config.headings, abstract_html.is_some());
        let doc = caption_tables(doc, &self.captions, &self.config.tables);

        let database = self.input.bibliography.as_ref().unwrap_or(&store.database);
        let html = self
            .formatter
            .format_bibliography(database, &self.config.style, OutputKind::Html)?;
        let entries = bibliography_nodes(&html)?;
        log::debug!("reference list has {} entries", entries.len());
        let doc = doc.append(references_section(&self.config.headings, entries));

        let front = FrontMatter {
            abstract_html,
            keywords: non_empty(&self.input.keywords),
            doi: non_empty(&self.input.doi),
        }
        .build(&self.config.headings, &self.config.crossmark)?;
        Ok(front.append(doc))
    }

    /// Process `doc` and pair the result with the funding metadata.
    pub fn run(&self, doc: Fragment) -> Result<Processed> {
        Ok(Processed {
            doc: self.process(doc)?.into_doc(),
            funding: self.input.funding.clone(),
        })
    }
}

/// Empty strings count as absent.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
