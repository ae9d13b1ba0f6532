/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! LaTeX-like manuscript markup: regions, citation commands, table captions
//! and pre-cleaning.

pub mod commands;
pub mod preclean;
pub mod regions;
pub mod tables;

pub use commands::{find_citations, replace_citations, CitationParser, LatexParser};
pub use preclean::{extract_embedded_bibliography, restructure, Precleaner};
pub use regions::{extract_regions, Region, RegionKind, Regions};
pub use tables::{extract_table_captions, plain_caption, TableCaption};
