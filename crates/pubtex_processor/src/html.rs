/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! HTML fragment import into document tree nodes.
//!
//! Formatted bibliography entries and abstracts arrive as HTML. Only a small
//! subset maps onto the tree: paragraphs, emphasis, strong emphasis and
//! links. Everything else is dropped.

use std::sync::LazyLock;

use kuchikikiki::NodeRef;
use pubtex_core::tree::{Fragment, Mark, Node};
use regex::Regex;
use tendril::TendrilSink;
use url::Url;

use crate::error::{ProcessorError, Result};

static BARE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s]+").expect("bare URL regex"));

/// What a single HTML element converts to.
enum Imported {
    Node(Node),
    /// An anchor: a mark for its text, not a node of its own.
    Mark(Mark),
}

/// Convert an HTML fragment whose first element is a paragraph into a node.
///
/// Fails with [`ProcessorError::InvalidFragment`] when the fragment's root does
/// not map to a node.
pub fn html_to_node(html: &str) -> Result<Node> {
    let body = parse_body(html)?;
    let root = body
        .children()
        .find(|child| !is_blank_text(child))
        .ok_or_else(|| ProcessorError::InvalidFragment(html.to_string()))?;
    match import_element(&root) {
        Some(Imported::Node(node)) => Ok(node),
        _ => Err(ProcessorError::InvalidFragment(html.to_string())),
    }
}

/// Convert an HTML fragment of any number of blocks into top-level nodes.
///
/// Inline content outside a paragraph is gathered into paragraphs of its own;
/// `div`-like containers are flattened.
pub fn html_to_fragment(html: &str) -> Result<Fragment> {
    let body = parse_body(html)?;
    let mut blocks = Vec::new();
    collect_blocks(&body, &mut blocks);
    Ok(Fragment::new(blocks))
}

fn parse_body(html: &str) -> Result<NodeRef> {
    let document = kuchikikiki::parse_html().one(html);
    let body = document
        .select_first("body")
        .map_err(|_| ProcessorError::InvalidFragment(html.to_string()))?;
    Ok(body.as_node().clone())
}

fn is_blank_text(node: &NodeRef) -> bool {
    node.as_text()
        .is_some_and(|text| text.borrow().trim().is_empty())
}

fn tag_name(node: &NodeRef) -> Option<String> {
    node.as_element()
        .map(|element| element.name.local.as_ref().to_ascii_lowercase())
}

fn import_element(node: &NodeRef) -> Option<Imported> {
    let tag = tag_name(node)?;
    let text = node.text_contents();
    if matches!(tag.as_str(), "em" | "i" | "strong" | "b" | "a") && text.is_empty() {
        return None;
    }

    match tag.as_str() {
        "p" => Some(Imported::Node(Node::paragraph(inline_content(node)))),
        "em" | "i" => Some(Imported::Node(Node::marked_text(text, vec![Mark::Em]))),
        "strong" | "b" => Some(Imported::Node(Node::marked_text(text, vec![Mark::Strong]))),
        "a" => {
            let element = node.as_element()?;
            let href = element.attributes.borrow().get("href").map(str::to_string)?;
            is_web_url(&href).then(|| Imported::Mark(Mark::external_link(&href)))
        }
        _ => None,
    }
}

fn is_web_url(href: &str) -> bool {
    Url::parse(href).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

fn inline_content(parent: &NodeRef) -> Vec<Node> {
    let mut nodes = Vec::new();
    for child in parent.children() {
        push_inline(&child, &mut nodes);
    }
    nodes
}

fn push_inline(child: &NodeRef, nodes: &mut Vec<Node>) {
    if let Some(text) = child.as_text() {
        push_text(&text.borrow(), nodes);
        return;
    }
    match import_element(child) {
        Some(Imported::Node(node)) => nodes.push(node),
        Some(Imported::Mark(mark)) => nodes.push(Node::marked_text(child.text_contents(), vec![mark])),
        None => {}
    }
}

/// Push a text run, linking the first bare URL in it.
fn push_text(text: &str, nodes: &mut Vec<Node>) {
    let Some(found) = BARE_URL.find(text) else {
        if !text.is_empty() {
            nodes.push(Node::text(text));
        }
        return;
    };
    let before = &text[..found.start()];
    let after = &text[found.end()..];
    if !before.is_empty() {
        nodes.push(Node::text(before));
    }
    nodes.push(Node::marked_text(found.as_str(), vec![Mark::link(found.as_str())]));
    if !after.is_empty() {
        nodes.push(Node::text(after));
    }
}

fn collect_blocks(parent: &NodeRef, blocks: &mut Vec<Node>) {
    let mut pending: Vec<Node> = Vec::new();
    for child in parent.children() {
        match tag_name(&child).as_deref() {
            Some("p") => {
                flush_inline(&mut pending, blocks);
                if let Some(Imported::Node(node)) = import_element(&child) {
                    blocks.push(node);
                }
            }
            Some("div" | "section" | "article" | "blockquote") => {
                flush_inline(&mut pending, blocks);
                collect_blocks(&child, blocks);
            }
            _ => push_inline(&child, &mut pending),
        }
    }
    flush_inline(&mut pending, blocks);
}

fn flush_inline(pending: &mut Vec<Node>, blocks: &mut Vec<Node>) {
    let content = std::mem::take(pending);
    if content.iter().any(|n| !n.text_content().trim().is_empty()) {
        blocks.push(Node::paragraph(content));
    }
}
