/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Citation collection and citation node rewriting.

use std::sync::LazyLock;

use indexmap::IndexMap;
use pubtex_core::citation::CitationOccurrence;
use pubtex_core::reference::{Bibliography, Reference};
use pubtex_core::tree::{Fragment, Node};
use regex::Regex;

use crate::error::ProcessorError;
use crate::labels::{fix_citation, render_label, Disambiguator};
use crate::style::{CitationRequest, OutputKind, StyleFormatter};

static BIBTEX_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\w*\s*\{\s*([^,\s]+)\s*,").expect("BibTeX key regex"));

/// The key of a raw BibTeX entry such as `@article{lee2021, ...}`.
pub fn bibtex_key(entry: &str) -> Option<&str> {
    BIBTEX_KEY
        .captures(entry)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Document-scoped rendering state for one cited key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationRecord {
    pub key: String,
    /// The BibTeX entry carried by the first placeholder for this key.
    pub raw: String,
    /// The formatter's label.
    pub rendered: String,
    /// The label after disambiguation.
    pub label: String,
}

/// Citation records in first-appearance order, plus the references behind them.
#[derive(Debug, Clone, Default)]
pub struct CitationStore {
    pub records: IndexMap<String, CitationRecord>,
    pub database: Bibliography,
}

impl CitationStore {
    /// Collect every citation placeholder in `doc`.
    ///
    /// Each placeholder's entry is parsed into the database; entries that do
    /// not parse fall back to `fallback`.
    pub fn collect(doc: &Fragment, fallback: Option<&Bibliography>) -> Self {
        let mut store = Self::default();
        doc.descendants(|node, _, _| {
            if let Node::Citation(_) = node {
                store.observe(node, fallback);
            }
            true
        });
        log::debug!("collected {} citation records", store.records.len());
        store
    }

    fn observe(&mut self, node: &Node, fallback: Option<&Bibliography>) {
        let raw = node.attr_str("value").unwrap_or_default();
        let Some(key) = bibtex_key(raw) else {
            log::warn!("{}", ProcessorError::MissingBibtexKey(raw.to_string()));
            return;
        };
        if self.records.contains_key(key) {
            return;
        }

        match parse_entry(raw, key).or_else(|| fallback.and_then(|b| b.get(key)).cloned()) {
            Some(reference) => {
                self.database.insert(key.to_string(), reference);
            }
            None => log::warn!("{}", ProcessorError::ReferenceNotFound(key.to_string())),
        }
        self.records.insert(
            key.to_string(),
            CitationRecord {
                key: key.to_string(),
                raw: raw.to_string(),
                rendered: String::new(),
                label: String::new(),
            },
        );
    }

    /// Render and disambiguate one label per record, in first-appearance order.
    ///
    /// Each request sees the keys resolved so far as cited before and the
    /// remaining keys, the current one included, as cited after.
    pub fn resolve_labels(&mut self, formatter: &dyn StyleFormatter, style: &str) {
        let mut after: Vec<String> = self.records.keys().cloned().collect();
        let mut before: Vec<String> = Vec::with_capacity(after.len());
        let mut disambiguator = Disambiguator::new();

        for record in self.records.values_mut() {
            let request = CitationRequest {
                key: &record.key,
                style,
                output: OutputKind::Text,
                cited_before: &before,
                cited_after: &after,
            };
            record.rendered = render_label(formatter, &self.database, &request);
            record.label = disambiguator.assign(
                &record.key,
                self.database.get(&record.key),
                &record.rendered,
            );
            if !after.is_empty() {
                before.push(after.remove(0));
            }
        }
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.records.get(key).map(|r| r.label.as_str())
    }
}

fn parse_entry(raw: &str, key: &str) -> Option<Reference> {
    match biblatex::Bibliography::parse(raw) {
        Ok(parsed) => parsed.get(key).map(Reference::from_biblatex),
        Err(e) => {
            log::warn!("{}", ProcessorError::BibliographyParse(format!("{}: {}", key, e)));
            None
        }
    }
}

/// Walk state for the citation rewrite.
///
/// Tree citations are matched to markup occurrences by position: the n-th
/// placeholder with a key takes the n-th occurrence.
pub struct CitationRewriter<'a> {
    store: &'a CitationStore,
    occurrences: &'a [CitationOccurrence],
    index: usize,
}

impl<'a> CitationRewriter<'a> {
    pub fn new(store: &'a CitationStore, occurrences: &'a [CitationOccurrence]) -> Self {
        Self {
            store,
            occurrences,
            index: 0,
        }
    }

    /// Occurrences consumed so far.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn rewrite_fragment(&mut self, doc: Fragment) -> Fragment {
        doc.into_iter().map(|node| self.rewrite(node)).collect()
    }

    /// Rebuild `node` bottom-up with every citation placeholder labelled.
    pub fn rewrite(&mut self, node: Node) -> Node {
        match node {
            Node::Citation(_) => self.label_citation(node),
            Node::Text(_) => node,
            _ => node.map_children(|child| self.rewrite(child)),
        }
    }

    fn label_citation(&mut self, node: Node) -> Node {
        let Some(key) = node.attr_str("value").and_then(bibtex_key).map(str::to_string) else {
            log::warn!(
                "{}",
                ProcessorError::MissingBibtexKey(node.attr_str("value").unwrap_or_default().to_string())
            );
            return node;
        };

        let occurrence = match self.occurrences.get(self.index) {
            Some(occurrence) => {
                if occurrence.key != key {
                    log::warn!(
                        "citation {} in the tree lines up with {} in the markup",
                        key,
                        occurrence.key
                    );
                }
                occurrence.clone()
            }
            None => {
                log::warn!("no markup citation left for {}", key);
                CitationOccurrence::simple(&key)
            }
        };
        self.index += 1;

        let fallback = format!("({})", key);
        let label = self.store.label(&key).unwrap_or(fallback.as_str());
        node.with_attr("customLabel", fix_citation(&occurrence, label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pubtex_core::citation::{CitationPosition, CitationType};
    use pubtex_core::tree::Attrs;
    use serde_json::Value;

    fn citation(entry: &str) -> Node {
        let mut attrs = Attrs::new();
        attrs.insert("value".to_string(), Value::from(entry));
        Node::citation(attrs)
    }

    #[test]
    fn test_bibtex_key() {
        assert_eq!(bibtex_key("@article{lee2021,\n  year = {2021}}"), Some("lee2021"));
        assert_eq!(bibtex_key("@book{ k , title={A, B}}"), Some("k"));
        assert_eq!(bibtex_key("no entry"), None);
    }

    #[test]
    fn test_collect_dedups_and_keeps_order() {
        let doc = Fragment::new(vec![Node::paragraph(vec![
            citation("@misc{b, author={Bee, B}, year={2001}}"),
            citation("@misc{a, author={Ay, A}, year={2000}}"),
            citation("@misc{b, author={Bee, B}, year={2001}}"),
            citation("not bibtex"),
        ])]);
        let store = CitationStore::collect(&doc, None);
        let keys: Vec<&str> = store.records.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(store.database["a"].year.as_deref(), Some("2000"));
    }

    #[test]
    fn test_collect_falls_back_to_bibliography() {
        let mut fallback = Bibliography::new();
        fallback.insert(
            "x".to_string(),
            Reference {
                id: "x".to_string(),
                year: Some("1990".to_string()),
                ..Default::default()
            },
        );
        let doc = Fragment::new(vec![citation("@misc{x, title = {unterminated")]);
        let store = CitationStore::collect(&doc, Some(&fallback));
        assert_eq!(store.database["x"].year.as_deref(), Some("1990"));
    }

    #[test]
    fn test_rewrite_keeps_attributes_and_skips_keyless() {
        let doc = Fragment::new(vec![Node::paragraph(vec![
            citation("@misc{a, author={Ay, Ann}, year={2000}}").with_attr("unstructuredValue", ""),
            citation("garbage"),
        ])]);
        let mut store = CitationStore::collect(&doc, None);
        store.resolve_labels(&crate::style::AuthorDateFormatter, "apa-7");

        let occurrences = vec![CitationOccurrence {
            kind: CitationType::Text,
            position: CitationPosition::Alone,
            ..CitationOccurrence::simple("a")
        }];
        let mut rewriter = CitationRewriter::new(&store, &occurrences);
        let out = rewriter.rewrite_fragment(doc);

        let paragraph = out.get(0).unwrap();
        let labelled = &paragraph.content()[0];
        assert_eq!(labelled.attr_str("customLabel"), Some("Ay (2000)"));
        assert_eq!(labelled.attr_str("unstructuredValue"), Some(""));
        assert!(labelled.attr_str("value").is_some());
        assert_eq!(paragraph.content()[1].attr("customLabel"), None);
        assert_eq!(rewriter.index(), 1);
    }
}
