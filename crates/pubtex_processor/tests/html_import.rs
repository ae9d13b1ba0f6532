/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

use pubtex_core::tree::{Mark, Node};
use pubtex_processor::{html_to_fragment, html_to_node, ProcessorError};

#[test]
fn test_bare_url_splits_text_into_three_runs() {
    let node = html_to_node("<p>see https://example.com for more</p>").unwrap();
    assert_eq!(node.kind(), "paragraph");
    assert_eq!(
        node.content(),
        &[
            Node::text("see "),
            Node::marked_text("https://example.com", vec![Mark::link("https://example.com")]),
            Node::text(" for more"),
        ]
    );
}

#[test]
fn test_text_without_url_stays_one_run() {
    let node = html_to_node("<p>no links here</p>").unwrap();
    assert_eq!(node.content(), &[Node::text("no links here")]);
}

#[test]
fn test_only_first_url_in_a_text_node_is_linked() {
    let node = html_to_node("<p>https://a.org and https://b.org</p>").unwrap();
    let content = node.content();
    assert_eq!(content.len(), 2);
    assert_eq!(content[0].text_content(), "https://a.org");
    assert_eq!(content[1], Node::text(" and https://b.org"));
}

#[test]
fn test_entry_anchor_opens_externally() {
    let node = html_to_node(
        r#"<p>Lee. <a href="https://doi.org/10.1/x">https://doi.org/10.1/x</a></p>"#,
    )
    .unwrap();
    assert_eq!(
        node.content()[1],
        Node::marked_text(
            "https://doi.org/10.1/x",
            vec![Mark::external_link("https://doi.org/10.1/x")]
        )
    );
}

#[test]
fn test_unsupported_root_is_invalid() {
    let err = html_to_node("<ul><li>item</li></ul>").unwrap_err();
    assert!(matches!(err, ProcessorError::InvalidFragment(_)));
}

#[test]
fn test_abstract_fragment_keeps_paragraphs() {
    let fragment = html_to_fragment("<p>One.</p>\n<p>Two <strong>bold</strong>.</p>").unwrap();
    assert_eq!(fragment.len(), 2);
    assert_eq!(fragment.get(1).unwrap().text_content(), "Two bold.");
}
