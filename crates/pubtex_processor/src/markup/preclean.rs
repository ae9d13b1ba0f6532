/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Markup pre-cleaning.
//!
//! Runs before the external tree builder sees the markup: removes or moves
//! environments the builder cannot handle, and resolves citations inside
//! footnotes and captions to plain label text, since the builder does not
//! produce citation nodes there.

use std::sync::LazyLock;

use pubtex_core::citation::CitationOccurrence;
use pubtex_core::options::{HoistedSection, PrecleanConfig};
use pubtex_core::reference::Bibliography;
use pubtex_core::PipelineConfig;
use regex::{Captures, Regex};

use super::commands::{find_citations, replace_citations};
use super::regions::extract_regions;
use crate::error::{ProcessorError, Result};
use crate::io::parse_bibliography;
use crate::labels::{fix_citation, render_label, Disambiguator};
use crate::style::{CitationRequest, OutputKind, StyleFormatter};

static FILECONTENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\\begin\{filecontents\*?\}(?:\[[^\]]*\])?\{[^}]*\}(.*?)\\end\{filecontents\*?\}")
        .expect("filecontents regex")
});
static MARKUP_SPECIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([%&])").expect("special character regex"));

/// The body of the first `filecontents` environment, if any.
pub fn extract_embedded_bibliography(tex: &str) -> Option<&str> {
    FILECONTENTS
        .captures(tex)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Rewrites raw markup ahead of tree building.
pub struct Precleaner<'a> {
    config: &'a PipelineConfig,
    formatter: &'a dyn StyleFormatter,
}

impl<'a> Precleaner<'a> {
    pub fn new(config: &'a PipelineConfig, formatter: &'a dyn StyleFormatter) -> Self {
        Self { config, formatter }
    }

    /// Clean `tex`, resolving footnote and caption citations against
    /// `bibliography`, or against the embedded `filecontents` database when
    /// none is given.
    pub fn clean(&self, tex: &str, bibliography: Option<&Bibliography>) -> Result<String> {
        let embedded;
        let bibliography = match bibliography {
            Some(bibliography) => bibliography,
            None => {
                embedded = match extract_embedded_bibliography(tex) {
                    Some(src) => parse_bibliography(src)?,
                    None => {
                        log::warn!("no bibliography given and none embedded in the markup");
                        Bibliography::new()
                    }
                };
                &embedded
            }
        };

        let restructured = restructure(tex, &self.config.preclean)?;
        Ok(self.resolve_region_citations(&restructured, bibliography))
    }

    /// Replace citation commands inside footnotes and captions with label text.
    ///
    /// Body citations are labelled first, in order, so a key shows the same
    /// label in a footnote as it gets in the body.
    fn resolve_region_citations(&self, tex: &str, bibliography: &Bibliography) -> String {
        let keys: Vec<String> = bibliography.keys().cloned().collect();
        let mut disambiguator = Disambiguator::new();
        let regions = extract_regions(tex);

        for occurrence in find_citations(&regions.body) {
            self.label(&occurrence, bibliography, &keys, &mut disambiguator);
        }

        let mut out = String::with_capacity(tex.len());
        let mut last = 0;
        for region in regions.in_source_order() {
            let rewritten = replace_citations(&region.text, |occurrence| {
                let label = self.label(occurrence, bibliography, &keys, &mut disambiguator);
                MARKUP_SPECIAL
                    .replace_all(&fix_citation(occurrence, &label), r"\$1")
                    .into_owned()
            });
            out.push_str(&tex[last..region.span.start]);
            out.push_str(&rewritten);
            last = region.span.end;
        }
        out.push_str(&tex[last..]);
        out
    }

    /// The disambiguated label of one occurrence; every database key counts
    /// as cited after it.
    fn label(
        &self,
        occurrence: &CitationOccurrence,
        bibliography: &Bibliography,
        keys: &[String],
        disambiguator: &mut Disambiguator,
    ) -> String {
        let request = CitationRequest {
            key: &occurrence.key,
            style: &self.config.style,
            output: OutputKind::Text,
            cited_before: &[],
            cited_after: keys,
        };
        let rendered = render_label(self.formatter, bibliography, &request);
        disambiguator.assign(&occurrence.key, bibliography.get(&occurrence.key), &rendered)
    }
}

/// Environment-level rewrites: unwrap, hoist, unstar.
pub fn restructure(tex: &str, config: &PrecleanConfig) -> Result<String> {
    let mut text = tex.to_string();

    for env in &config.unwrap_environments {
        let pattern = format!(r"\\(begin|end)\{{{}\}}", regex::escape(env));
        text = compile(&pattern)?.replace_all(&text, "").into_owned();
    }

    for section in &config.hoisted_sections {
        text = hoist(&text, section)?;
    }

    if !config.unstar_environments.is_empty() {
        let names: Vec<String> = config
            .unstar_environments
            .iter()
            .map(|e| regex::escape(e))
            .collect();
        let pattern = format!(r"({})\*", names.join("|"));
        text = compile(&pattern)?.replace_all(&text, "$1").into_owned();
    }

    Ok(text)
}

/// Move a custom environment to the start of the document body as a section.
fn hoist(tex: &str, section: &HoistedSection) -> Result<String> {
    let env = regex::escape(&section.environment);
    let pattern = format!(
        r"(?s)(.*?\\begin\{{document\}}\n)(.*?)\\begin\{{{env}\}}(.*?)\\end\{{{env}\}}"
    );
    let re = compile(&pattern)?;
    if !re.is_match(tex) {
        return Ok(tex.to_string());
    }
    log::debug!("hoisting {} into section {:?}", section.environment, section.title);
    let hoisted = re.replace(tex, |caps: &Captures| {
        let mut out = format!("{}\\section{{{}}}\n\n{}\n\n", &caps[1], section.title, &caps[3]);
        if let Some(introduction) = &section.introduction {
            out.push_str(&format!("\\section{{{}}}\n\n", introduction));
        }
        out.push_str(&caps[2]);
        out
    });
    Ok(hoisted.into_owned())
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| ProcessorError::ParseError("pattern".to_string(), e.to_string()))
}
