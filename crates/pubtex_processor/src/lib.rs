/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! pubtex Processor
//!
//! Turns a LaTeX-like manuscript and its BibTeX database into a finished
//! rich document tree. The pipeline has two entry points:
//!
//! - [`Precleaner`] rewrites the raw markup before an external tree builder
//!   runs: it unwraps and hoists environments and resolves citations inside
//!   footnotes and captions to plain label text.
//! - [`PostProcessor`] takes the tree the builder produced and labels its
//!   citation placeholders, captions its tables, blanks duplicate abstract
//!   headings, appends the reference list and prepends the front matter.
//!
//! Reference formatting is delegated to a [`StyleFormatter`];
//! [`AuthorDateFormatter`] is bundled.
//!
//! # Example
//!
//! ```rust
//! use pubtex_processor::markup::find_citations;
//! use pubtex_core::CitationType;
//!
//! let occurrences = find_citations(r"As \textcite[p. 4]{lee2021} shows.");
//! assert_eq!(occurrences.len(), 1);
//! assert_eq!(occurrences[0].key, "lee2021");
//! assert_eq!(occurrences[0].kind, CitationType::Text);
//! assert_eq!(occurrences[0].suffix.as_deref(), Some("p. 4"));
//! ```

pub mod error;
pub mod html;
pub mod io;
pub mod labels;
pub mod markup;
pub mod postprocess;
pub mod render;
pub mod style;

pub use error::{ProcessorError, Result};
pub use html::{html_to_fragment, html_to_node};
pub use labels::{fix_citation, format_citation, Disambiguator};
pub use markup::{extract_regions, extract_table_captions, find_citations, Precleaner};
pub use postprocess::{PostProcessInput, PostProcessor, Processed};
pub use style::{AuthorDateFormatter, CitationRequest, OutputKind, StyleFormatter};
