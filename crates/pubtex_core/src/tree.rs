/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Rich document tree model.
//!
//! Trees arrive from the external tree builder as ProseMirror-style JSON
//! (`{"type": ..., "attrs": ..., "content": [...]}` for elements and
//! `{"type": "text", "text": ..., "marks": [...]}` for text runs). The node kinds
//! the pipeline acts on get their own variant; everything else round-trips
//! untouched through [`Node::Other`].
//!
//! Trees are treated as values: the editing operations on [`Fragment`] consume
//! the fragment and return the edited one.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attribute map of a node or mark.
pub type Attrs = IndexMap<String, Value>;

/// The attributes and children shared by every element node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub attrs: Attrs,
    pub content: Vec<Node>,
}

impl Element {
    pub fn new(attrs: Attrs, content: Vec<Node>) -> Self {
        Self { attrs, content }
    }
}

/// A run of text with its inline marks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Text {
    pub text: String,
    pub marks: Vec<Mark>,
}

/// A document tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNode", into = "RawNode")]
pub enum Node {
    Paragraph(Element),
    Heading(Element),
    Table(Element),
    Image(Element),
    /// An inline citation; its `value` attribute holds the raw BibTeX entry.
    Citation(Element),
    Text(Text),
    /// Any node kind the pipeline does not rewrite.
    Other { kind: String, element: Element },
}

/// An inline mark applied to a text run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMark", into = "RawMark")]
pub enum Mark {
    Strong,
    Em,
    /// Hyperlink; attributes include at least `href`.
    Link(Attrs),
    Other { kind: String, attrs: Attrs },
}

impl Mark {
    /// A plain hyperlink.
    pub fn link(href: &str) -> Self {
        let mut attrs = Attrs::new();
        attrs.insert("href".to_string(), Value::from(href));
        Mark::Link(attrs)
    }

    /// A hyperlink that opens in a new browsing context.
    pub fn external_link(href: &str) -> Self {
        let mut attrs = Attrs::new();
        attrs.insert("href".to_string(), Value::from(href));
        attrs.insert("target".to_string(), Value::from("_blank"));
        Mark::Link(attrs)
    }

    pub fn kind(&self) -> &str {
        match self {
            Mark::Strong => "strong",
            Mark::Em => "em",
            Mark::Link(_) => "link",
            Mark::Other { kind, .. } => kind,
        }
    }

    /// The link target, for link marks.
    pub fn href(&self) -> Option<&str> {
        match self {
            Mark::Link(attrs) => attrs.get("href").and_then(Value::as_str),
            _ => None,
        }
    }
}

impl Node {
    /// Build an element node by type name, as a schema node factory would.
    pub fn element(kind: &str, attrs: Attrs, content: Vec<Node>) -> Self {
        let element = Element::new(attrs, content);
        match kind {
            "paragraph" => Node::Paragraph(element),
            "heading" => Node::Heading(element),
            "table" => Node::Table(element),
            "image" => Node::Image(element),
            "citation" => Node::Citation(element),
            _ => Node::Other {
                kind: kind.to_string(),
                element,
            },
        }
    }

    pub fn paragraph(content: Vec<Node>) -> Self {
        Node::Paragraph(Element::new(Attrs::new(), content))
    }

    pub fn empty_paragraph() -> Self {
        Node::paragraph(Vec::new())
    }

    /// A heading; `level` is stored alongside any extra attributes.
    pub fn heading(level: u8, mut attrs: Attrs, content: Vec<Node>) -> Self {
        attrs.insert("level".to_string(), Value::from(level));
        Node::Heading(Element::new(attrs, content))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(Text {
            text: text.into(),
            marks: Vec::new(),
        })
    }

    pub fn marked_text(text: impl Into<String>, marks: Vec<Mark>) -> Self {
        Node::Text(Text {
            text: text.into(),
            marks,
        })
    }

    pub fn image(attrs: Attrs) -> Self {
        Node::Image(Element::new(attrs, Vec::new()))
    }

    pub fn table(attrs: Attrs, content: Vec<Node>) -> Self {
        Node::Table(Element::new(attrs, content))
    }

    pub fn citation(attrs: Attrs) -> Self {
        Node::Citation(Element::new(attrs, Vec::new()))
    }

    /// The schema type name of this node.
    pub fn kind(&self) -> &str {
        match self {
            Node::Paragraph(_) => "paragraph",
            Node::Heading(_) => "heading",
            Node::Table(_) => "table",
            Node::Image(_) => "image",
            Node::Citation(_) => "citation",
            Node::Text(_) => "text",
            Node::Other { kind, .. } => kind,
        }
    }

    fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Paragraph(e)
            | Node::Heading(e)
            | Node::Table(e)
            | Node::Image(e)
            | Node::Citation(e)
            | Node::Other { element: e, .. } => Some(e),
            Node::Text(_) => None,
        }
    }

    fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Paragraph(e)
            | Node::Heading(e)
            | Node::Table(e)
            | Node::Image(e)
            | Node::Citation(e)
            | Node::Other { element: e, .. } => Some(e),
            Node::Text(_) => None,
        }
    }

    /// Node attributes; text runs have none.
    pub fn attrs(&self) -> Option<&Attrs> {
        self.as_element().map(|e| &e.attrs)
    }

    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attrs().and_then(|attrs| attrs.get(name))
    }

    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attr(name).and_then(Value::as_str)
    }

    /// Heading level, if present.
    pub fn level(&self) -> Option<u64> {
        self.attr("level").and_then(Value::as_u64)
    }

    /// Direct children.
    pub fn content(&self) -> &[Node] {
        self.as_element()
            .map(|e| e.content.as_slice())
            .unwrap_or_default()
    }

    pub fn child_count(&self) -> usize {
        self.content().len()
    }

    pub fn last_child(&self) -> Option<&Node> {
        self.content().last()
    }

    /// Concatenated text of this node and all its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(&t.text),
            _ => {
                for child in self.content() {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Return this node with attribute `name` set to `value`.
    ///
    /// Text runs are returned unchanged.
    pub fn with_attr(mut self, name: &str, value: impl Into<Value>) -> Self {
        if let Some(element) = self.as_element_mut() {
            element.attrs.insert(name.to_string(), value.into());
        }
        self
    }

    /// Return this node with every child passed through `f`, left to right.
    pub fn map_children<F>(mut self, f: F) -> Self
    where
        F: FnMut(Node) -> Node,
    {
        if let Some(element) = self.as_element_mut() {
            let content = std::mem::take(&mut element.content);
            element.content = content.into_iter().map(f).collect();
        }
        self
    }

    /// Pre-order walk over the descendants of this node (not the node itself).
    ///
    /// The callback receives the node, its parent and its index in the parent;
    /// returning `false` skips that node's children.
    pub fn descendants<F>(&self, f: &mut F)
    where
        F: FnMut(&Node, Option<&Node>, usize) -> bool,
    {
        for (index, child) in self.content().iter().enumerate() {
            if f(child, Some(self), index) {
                child.descendants(f);
            }
        }
    }
}

/// An ordered sequence of sibling nodes, typically the top level of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fragment {
    nodes: Vec<Node>,
}

impl Fragment {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Take the children of a `doc` node, or wrap any other node on its own.
    pub fn from_doc(doc: Node) -> Self {
        match doc {
            Node::Other { kind, element } if kind == "doc" => Self::new(element.content),
            other => Self::new(vec![other]),
        }
    }

    /// Wrap this fragment in a `doc` node.
    pub fn into_doc(self) -> Node {
        Node::element("doc", Attrs::new(), self.nodes)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    /// Replace the child at `index`. Out-of-range indices leave the fragment as is.
    pub fn replace_child(mut self, index: usize, node: Node) -> Self {
        if let Some(slot) = self.nodes.get_mut(index) {
            *slot = node;
        }
        self
    }

    /// Insert `node` before position `index` (clamped to the end).
    pub fn insert(mut self, index: usize, node: Node) -> Self {
        let index = index.min(self.nodes.len());
        self.nodes.insert(index, node);
        self
    }

    /// Concatenate another fragment after this one.
    pub fn append(mut self, other: Fragment) -> Self {
        self.nodes.extend(other.nodes);
        self
    }

    pub fn add_to_end(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Pre-order walk over every node in the fragment.
    ///
    /// Top-level nodes are reported with no parent. Returning `false` from the
    /// callback skips that node's children.
    pub fn descendants<F>(&self, mut f: F)
    where
        F: FnMut(&Node, Option<&Node>, usize) -> bool,
    {
        for (index, node) in self.nodes.iter().enumerate() {
            if f(node, None, index) {
                node.descendants(&mut f);
            }
        }
    }

    pub fn text_content(&self) -> String {
        self.nodes.iter().map(Node::text_content).collect()
    }
}

impl From<Vec<Node>> for Fragment {
    fn from(nodes: Vec<Node>) -> Self {
        Self::new(nodes)
    }
}

impl FromIterator<Node> for Fragment {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Fragment {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a> IntoIterator for &'a Fragment {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

// --- JSON representation ---

#[derive(Serialize, Deserialize)]
struct RawNode {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    attrs: Attrs,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    content: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    marks: Vec<Mark>,
}

impl From<RawNode> for Node {
    fn from(raw: RawNode) -> Self {
        if raw.kind == "text" {
            return Node::Text(Text {
                text: raw.text.unwrap_or_default(),
                marks: raw.marks,
            });
        }
        Node::element(&raw.kind, raw.attrs, raw.content)
    }
}

impl From<Node> for RawNode {
    fn from(node: Node) -> Self {
        let kind = node.kind().to_string();
        match node {
            Node::Text(t) => RawNode {
                kind,
                attrs: Attrs::new(),
                content: Vec::new(),
                text: Some(t.text),
                marks: t.marks,
            },
            Node::Paragraph(e)
            | Node::Heading(e)
            | Node::Table(e)
            | Node::Image(e)
            | Node::Citation(e)
            | Node::Other { element: e, .. } => RawNode {
                kind,
                attrs: e.attrs,
                content: e.content,
                text: None,
                marks: Vec::new(),
            },
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawMark {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    attrs: Attrs,
}

impl From<RawMark> for Mark {
    fn from(raw: RawMark) -> Self {
        match raw.kind.as_str() {
            "strong" => Mark::Strong,
            "em" => Mark::Em,
            "link" => Mark::Link(raw.attrs),
            _ => Mark::Other {
                kind: raw.kind,
                attrs: raw.attrs,
            },
        }
    }
}

impl From<Mark> for RawMark {
    fn from(mark: Mark) -> Self {
        let kind = mark.kind().to_string();
        let attrs = match mark {
            Mark::Link(attrs) | Mark::Other { attrs, .. } => attrs,
            Mark::Strong | Mark::Em => Attrs::new(),
        };
        RawMark { kind, attrs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Fragment {
        Fragment::new(vec![
            Node::heading(1, Attrs::new(), vec![Node::text("Intro")]),
            Node::paragraph(vec![
                Node::text("As shown by "),
                Node::citation(Attrs::new()),
                Node::marked_text(" here", vec![Mark::Em]),
            ]),
        ])
    }

    #[test]
    fn test_descendants_is_pre_order_with_parent() {
        let mut seen = Vec::new();
        sample().descendants(|node, parent, index| {
            seen.push((node.kind().to_string(), parent.map(|p| p.kind().to_string()), index));
            true
        });
        let kinds: Vec<&str> = seen.iter().map(|(k, _, _)| k.as_str()).collect();
        assert_eq!(
            kinds,
            vec!["heading", "text", "paragraph", "text", "citation", "text"]
        );
        assert_eq!(seen[4].1.as_deref(), Some("paragraph"));
        assert_eq!(seen[4].2, 1);
        assert_eq!(seen[0].1, None);
    }

    #[test]
    fn test_descendants_can_skip_children() {
        let mut count = 0;
        sample().descendants(|node, _, _| {
            count += 1;
            node.kind() != "paragraph"
        });
        assert_eq!(count, 3);
    }

    #[test]
    fn test_fragment_edits_return_new_values() {
        let original = sample();
        let edited = original
            .clone()
            .replace_child(0, Node::empty_paragraph())
            .add_to_end(Node::text("end"))
            .insert(1, Node::text("mid"))
            .insert(99, Node::text("!"));
        assert_eq!(original.len(), 2);
        assert_eq!(original.get(0).map(Node::kind), Some("heading"));
        assert_eq!(edited.len(), 5);
        assert_eq!(edited.get(0).map(Node::kind), Some("paragraph"));
        assert_eq!(edited.text_content(), "midAs shown by  hereend!");
    }

    #[test]
    fn test_map_children_rebuilds_in_order() {
        let paragraph = sample().into_nodes().remove(1);
        let mut order = Vec::new();
        let rebuilt = paragraph.map_children(|child| {
            order.push(child.kind().to_string());
            child.with_attr("seen", true)
        });
        assert_eq!(order, vec!["text", "citation", "text"]);
        assert_eq!(rebuilt.content()[1].attr("seen"), Some(&Value::Bool(true)));
        // Text runs have no attributes to set.
        assert_eq!(rebuilt.content()[0], Node::text("As shown by "));
    }

    #[test]
    fn test_json_shape_and_passthrough() {
        let json = json!({
            "type": "doc",
            "content": [
                {"type": "heading", "attrs": {"level": 1, "id": "abstract"},
                 "content": [{"type": "text", "text": "Abstract"}]},
                {"type": "blockquote", "content": [
                    {"type": "paragraph", "content": [
                        {"type": "text", "text": "x", "marks": [
                            {"type": "link", "attrs": {"href": "https://a.org", "title": null}},
                            {"type": "sub"}
                        ]}
                    ]}
                ]}
            ]
        });
        let doc: Node = serde_json::from_value(json.clone()).unwrap();
        let fragment = Fragment::from_doc(doc);
        assert_eq!(fragment.len(), 2);
        assert_eq!(fragment.get(0).and_then(Node::level), Some(1));
        assert_eq!(fragment.get(1).map(Node::kind), Some("blockquote"));

        let back = serde_json::to_value(fragment.into_doc()).unwrap();
        assert_eq!(back, json);
    }
}
