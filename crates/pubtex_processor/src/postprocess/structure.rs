/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Structural passes over the top-level nodes.

use pubtex_core::options::{HeadingsConfig, TableConfig};
use pubtex_core::tree::{Fragment, Mark, Node};

use crate::error::ProcessorError;
use crate::markup::TableCaption;

/// Blank level-1 "Abstract" headings that duplicate the supplied abstract.
///
/// Without a supplied abstract only headings lacking the abstract id are
/// blanked. Blanked headings become empty paragraphs so positions are kept.
pub fn blank_duplicate_abstracts(
    doc: Fragment,
    headings: &HeadingsConfig,
    abstract_supplied: bool,
) -> Fragment {
    let mut blanked = 0;
    let doc = doc
        .into_iter()
        .map(|node| {
            let duplicate = matches!(node, Node::Heading(_))
                && node.level() == Some(1)
                && node.text_content() == headings.abstract_title
                && (abstract_supplied || node.attr_str("id") != Some(headings.abstract_id.as_str()));
            if duplicate {
                blanked += 1;
                Node::empty_paragraph()
            } else {
                node
            }
        })
        .collect();
    if blanked > 0 {
        log::debug!("blanked {} abstract heading(s)", blanked);
    }
    doc
}

/// The `Table N. caption` paragraph.
pub fn caption_paragraph(config: &TableConfig, number: usize, caption: &str) -> Node {
    Node::paragraph(vec![
        Node::marked_text(format!("{} {}. ", config.label, number), vec![Mark::Strong]),
        Node::marked_text(caption, vec![Mark::Em]),
    ])
}

/// Table styling attributes, sized by the column count of the last row.
fn styled_table(table: Node, config: &TableConfig) -> Node {
    let columns = table.last_child().map(Node::child_count).unwrap_or(0);
    let size = if columns > config.wide_threshold {
        &config.wide_size
    } else {
        &config.narrow_size
    };
    table
        .with_attr("size", size.as_str())
        .with_attr("align", config.align.as_str())
        .with_attr("smallerFont", config.smaller_font)
}

/// Caption and style every top-level table.
///
/// The n-th table takes the n-th caption entry. A table whose entry has no
/// caption, or that has no entry at all, is left unmodified. When the
/// paragraph right after a table repeats its caption, that paragraph is
/// dropped.
pub fn caption_tables(doc: Fragment, captions: &[TableCaption], config: &TableConfig) -> Fragment {
    let mut out = Vec::with_capacity(doc.len() + captions.len());
    let mut tables = 0;
    let mut captioned = 0;
    let mut nodes = doc.into_iter().peekable();

    while let Some(node) = nodes.next() {
        if !matches!(node, Node::Table(_)) {
            out.push(node);
            continue;
        }
        tables += 1;
        let Some(caption) = captions.get(tables - 1).and_then(TableCaption::plain) else {
            log::warn!("{}", ProcessorError::MissingTableCaption(tables));
            out.push(node);
            continue;
        };

        captioned += 1;
        out.push(caption_paragraph(config, tables, &caption));
        out.push(styled_table(node, config));

        if nodes
            .peek()
            .is_some_and(|next| matches!(next, Node::Paragraph(_)) && next.text_content().trim() == caption)
        {
            nodes.next();
        }
    }

    if tables > 0 {
        log::debug!("captioned {} of {} table(s)", captioned, tables);
    }
    Fragment::new(out)
}
