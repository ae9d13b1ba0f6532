/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Citation labels: disambiguation across references and the inline text
//! of each occurrence.

pub mod disambiguation;
pub mod inline;

pub use disambiguation::{next_suffix, Disambiguator};
pub use inline::{fix_citation, format_citation};

use pubtex_core::reference::Bibliography;

use crate::style::{CitationRequest, StyleFormatter};

/// Ask the formatter for a label, degrading to `(key)` when it cannot render one.
pub fn render_label(
    formatter: &dyn StyleFormatter,
    bibliography: &Bibliography,
    request: &CitationRequest<'_>,
) -> String {
    match formatter.format_citation(bibliography, request) {
        Ok(label) => label,
        Err(e) => {
            log::warn!("{}", e);
            format!("({})", request.key)
        }
    }
}
