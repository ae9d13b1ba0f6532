/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessorError {
    /// The root of an HTML fragment does not map to a tree node.
    #[error("invalid HTML fragment: {0}")]
    InvalidFragment(String),

    /// A citation placeholder has no parseable BibTeX key.
    #[error("could not find a BibTeX key in citation value {0:?}")]
    MissingBibtexKey(String),

    /// No caption is available for the table at this (1-based) position.
    #[error("could not find a caption for table {0}")]
    MissingTableCaption(usize),

    #[error("reference '{0}' not found in bibliography")]
    ReferenceNotFound(String),

    #[error("failed to parse bibliography: {0}")]
    BibliographyParse(String),

    #[error("failed to parse {0}: {1}")]
    ParseError(String, String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ProcessorError {
    fn from(e: serde_json::Error) -> Self {
        ProcessorError::ParseError("JSON".to_string(), e.to_string())
    }
}

impl From<serde_yaml::Error> for ProcessorError {
    fn from(e: serde_yaml::Error) -> Self {
        ProcessorError::ParseError("YAML".to_string(), e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ProcessorError>;
