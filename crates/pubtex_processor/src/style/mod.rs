/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Style formatter boundary.
//!
//! The pipeline never formats references itself: it asks a [`StyleFormatter`]
//! for one rendered label per cited key and for the whole bibliography. The
//! bundled [`AuthorDateFormatter`] covers the author-date house style; other
//! engines plug in by implementing the trait.

pub mod author_date;

pub use author_date::AuthorDateFormatter;

use pubtex_core::reference::Bibliography;

use crate::error::Result;

/// Target markup of formatted output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputKind {
    #[default]
    Text,
    Html,
}

/// One citation formatting request.
#[derive(Debug, Clone, Copy)]
pub struct CitationRequest<'a> {
    pub key: &'a str,
    pub style: &'a str,
    pub output: OutputKind,
    /// Keys already cited earlier in the document, in citation order.
    pub cited_before: &'a [String],
    /// Keys cited from this point on, in citation order.
    pub cited_after: &'a [String],
}

impl<'a> CitationRequest<'a> {
    /// A plain-text request with no citation context.
    pub fn new(key: &'a str, style: &'a str) -> Self {
        Self {
            key,
            style,
            output: OutputKind::Text,
            cited_before: &[],
            cited_after: &[],
        }
    }
}

/// A citation style engine.
pub trait StyleFormatter {
    /// Render the citation label for one key, e.g. `(Lee, 2021)`.
    fn format_citation(&self, bibliography: &Bibliography, request: &CitationRequest<'_>)
        -> Result<String>;

    /// Render every reference in `bibliography` as a formatted reference list.
    fn format_bibliography(
        &self,
        bibliography: &Bibliography,
        style: &str,
        output: OutputKind,
    ) -> Result<String>;
}
