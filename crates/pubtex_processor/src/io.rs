/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

use std::fs;
use std::path::Path;

use pubtex_core::reference::{Bibliography, Reference};
use pubtex_core::tree::{Fragment, Node};
use pubtex_core::{Funding, PipelineConfig};

use crate::ProcessorError;

/// Parse BibTeX/BibLaTeX source into references keyed by citation key.
pub fn parse_bibliography(src: &str) -> Result<Bibliography, ProcessorError> {
    let parsed = biblatex::Bibliography::parse(src)
        .map_err(|e| ProcessorError::BibliographyParse(e.to_string()))?;
    Ok(parsed
        .iter()
        .map(|entry| (entry.key.clone(), Reference::from_biblatex(entry)))
        .collect())
}

/// Load a `.bib` file.
pub fn load_bibliography(path: &Path) -> Result<Bibliography, ProcessorError> {
    let src = fs::read_to_string(path)?;
    parse_bibliography(&src)
}

/// Load a JSON document tree.
/// Accepts a `doc` node or a top-level array of nodes.
pub fn load_tree(path: &Path) -> Result<Fragment, ProcessorError> {
    let bytes = fs::read(path)?;
    let value: serde_json::Value = serde_json::from_slice(&bytes)?;
    if value.is_array() {
        return Ok(serde_json::from_value::<Fragment>(value)?);
    }
    let doc: Node = serde_json::from_value(value)?;
    Ok(Fragment::from_doc(doc))
}

/// Load pipeline configuration.
/// Supports YAML and JSON, chosen by extension.
pub fn load_config(path: &Path) -> Result<PipelineConfig, ProcessorError> {
    let bytes = fs::read(path)?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    match ext {
        "json" => Ok(serde_json::from_slice(&bytes)?),
        _ => {
            let content = String::from_utf8_lossy(&bytes);
            Ok(serde_yaml::from_str(&content)?)
        }
    }
}

/// Load funding metadata; it is forwarded untouched.
pub fn load_funding(path: &Path) -> Result<Funding, ProcessorError> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}
