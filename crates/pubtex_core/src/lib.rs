/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Data model for the pubtex manuscript pipeline.
//!
//! - [`tree`]: the rich document tree the pipeline rewrites.
//! - [`citation`]: inline citation occurrences recovered from markup.
//! - [`reference`]: bibliographic references converted from BibLaTeX.
//! - [`options`]: pipeline configuration.

pub mod citation;
pub mod options;
pub mod reference;
pub mod tree;

pub use citation::{CitationOccurrence, CitationPosition, CitationType};
pub use options::PipelineConfig;
pub use reference::{Bibliography, Name, Reference};
pub use tree::{Attrs, Element, Fragment, Mark, Node, Text};

/// Opaque funding metadata, forwarded to the output untouched.
pub type Funding = indexmap::IndexMap<String, serde_json::Value>;
