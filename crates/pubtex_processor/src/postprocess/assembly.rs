/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Front matter and reference list assembly.

use std::sync::LazyLock;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use pubtex_core::options::{CrossmarkConfig, HeadingsConfig};
use pubtex_core::tree::{Attrs, Fragment, Mark, Node};
use regex::Regex;
use serde_json::Value;

use crate::error::Result;
use crate::html::{html_to_fragment, html_to_node};

/// Characters left alone by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

static OUTER_DIV: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<div[^>]*>(.*)</div>").expect("outer div regex"));
static DIV_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(/?)div\b").expect("div tag regex"));

/// Turn formatted bibliography HTML into one paragraph per entry.
///
/// The outer container is unwrapped, entry `div`s become paragraphs and each
/// line is imported on its own.
pub fn bibliography_nodes(html: &str) -> Result<Vec<Node>> {
    let inner = OUTER_DIV.replace(html, "$1");
    let paragraphs = DIV_TAG.replace_all(&inner, "<${1}p");
    paragraphs
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(html_to_node)
        .collect()
}

/// `References` heading followed by the entries; nothing when there are none.
pub fn references_section(headings: &HeadingsConfig, entries: Vec<Node>) -> Fragment {
    if entries.is_empty() {
        return Fragment::empty();
    }
    let mut nodes = Vec::with_capacity(entries.len() + 1);
    nodes.push(Node::heading(
        1,
        Attrs::new(),
        vec![Node::text(&headings.references_title)],
    ));
    nodes.extend(entries);
    Fragment::new(nodes)
}

/// Crossmark dialog link for `doi`.
pub fn crossmark_href(config: &CrossmarkConfig, doi: &str) -> String {
    format!(
        "{}?doi={}&domain={}&uri_scheme=https%3A&cm_version=v2.0",
        config.dialog_url,
        utf8_percent_encode(doi, URI_COMPONENT),
        config.domain
    )
}

/// Abstract, keywords and DOI badge, in that order, each only when given.
pub struct FrontMatter<'a> {
    pub abstract_html: Option<&'a str>,
    pub keywords: Option<&'a str>,
    pub doi: Option<&'a str>,
}

impl FrontMatter<'_> {
    pub fn build(&self, headings: &HeadingsConfig, crossmark: &CrossmarkConfig) -> Result<Fragment> {
        let mut front = Fragment::empty();

        if let Some(html) = self.abstract_html {
            let mut attrs = Attrs::new();
            attrs.insert("id".to_string(), Value::from(headings.abstract_id.as_str()));
            attrs.insert("fixedId".to_string(), Value::from(headings.abstract_id.as_str()));
            front = front
                .add_to_end(Node::heading(
                    1,
                    attrs,
                    vec![Node::text(&headings.abstract_title)],
                ))
                .append(html_to_fragment(html)?);
        }

        if let Some(keywords) = self.keywords {
            front = front.add_to_end(Node::paragraph(vec![
                Node::marked_text(&headings.keywords_label, vec![Mark::Strong]),
                Node::marked_text(keywords, vec![Mark::Em]),
            ]));
        }

        if let Some(doi) = self.doi {
            let mut attrs = Attrs::new();
            attrs.insert("url".to_string(), Value::from(crossmark.logo_url.as_str()));
            attrs.insert("size".to_string(), Value::from(crossmark.size));
            attrs.insert("align".to_string(), Value::from(crossmark.align.as_str()));
            attrs.insert("hideLabel".to_string(), Value::Bool(true));
            attrs.insert("href".to_string(), Value::from(crossmark_href(crossmark, doi)));
            front = front
                .add_to_end(Node::image(attrs))
                .add_to_end(Node::empty_paragraph())
                .add_to_end(Node::empty_paragraph());
        }

        Ok(front)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crossmark_href_encodes_doi() {
        assert_eq!(
            crossmark_href(&CrossmarkConfig::default(), "10.36850/e3"),
            "https://crossmark.crossref.org/dialog?doi=10.36850%2Fe3&domain=journal.trialanderror.org&uri_scheme=https%3A&cm_version=v2.0"
        );
    }

    #[test]
    fn test_bibliography_nodes() {
        let html = "<div class=\"csl-bib-body\">\n  <div class=\"csl-entry\">Abe, K. (2018). <i>Divided</i>.</div>\n  <div class=\"csl-entry\">Zed, A. (2020).</div>\n</div>";
        let nodes = bibliography_nodes(html).unwrap();
        assert_eq!(nodes.len(), 2);
        assert!(nodes.iter().all(|n| n.kind() == "paragraph"));
        assert_eq!(nodes[0].text_content(), "Abe, K. (2018). Divided.");
        assert_eq!(nodes[0].content()[1], Node::marked_text("Divided", vec![Mark::Em]));
    }

    #[test]
    fn test_empty_front_matter() {
        let front = FrontMatter {
            abstract_html: None,
            keywords: None,
            doi: None,
        }
        .build(&HeadingsConfig::default(), &CrossmarkConfig::default())
        .unwrap();
        assert!(front.is_empty());
        assert!(references_section(&HeadingsConfig::default(), Vec::new()).is_empty());
    }
}
