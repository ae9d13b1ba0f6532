/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Table caption extraction.

use std::sync::LazyLock;

use regex::Regex;

use super::regions::extract_regions;

static TABLE_BEGIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\begin\{table(\*)?\}").expect("table begin regex"));
static TABLE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\end\{table\*?\}").expect("table end regex"));
static ONE_ARG_COMMAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\[A-Za-z]+\*?\{([^{}]*)\}").expect("formatting command regex")
});
static ESCAPED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\([%&_#$])").expect("escaped character regex"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// The caption entry of one `table` environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCaption {
    /// Caption body as written in the markup; `None` for an uncaptioned table.
    pub caption: Option<String>,
    /// Whether the environment was `table*`.
    ///
    /// Informational: captions always come from the markup, starred or not,
    /// since pre-cleaning folds `table*` into `table` before tree building.
    pub starred: bool,
}

impl TableCaption {
    /// The caption reduced to plain text, if there is one.
    pub fn plain(&self) -> Option<String> {
        self.caption
            .as_deref()
            .map(plain_caption)
            .filter(|caption| !caption.is_empty())
    }
}

/// One entry per `table` and `table*` environment, in document order.
///
/// Only the first `\caption{...}` of each environment counts. Entry `i`
/// always belongs to the `i`-th table, captioned or not.
pub fn extract_table_captions(tex: &str) -> Vec<TableCaption> {
    let mut captions = Vec::new();
    let mut cursor = 0;

    while let Some(begin) = TABLE_BEGIN.captures_at(tex, cursor) {
        let Some(whole) = begin.get(0) else { break };
        let starred = begin.get(1).is_some();
        let body_start = whole.end();
        let body_end = TABLE_END
            .find_at(tex, body_start)
            .map_or(tex.len(), |m| m.start());
        cursor = body_end.max(body_start);

        let caption = extract_regions(&tex[body_start..body_end])
            .captions
            .into_iter()
            .next()
            .map(|region| region.text);
        if caption.is_none() {
            log::debug!("table environment at byte {} has no caption", whole.start());
        }
        captions.push(TableCaption { caption, starred });
    }

    captions
}

/// Reduce caption markup to display text.
///
/// Single-argument commands are unwrapped from the inside out, escaped
/// specials lose their backslash, ties become spaces and whitespace runs
/// collapse.
pub fn plain_caption(caption: &str) -> String {
    let mut text = caption.to_string();
    loop {
        let next = ONE_ARG_COMMAND.replace_all(&text, "$1").into_owned();
        if next == text {
            break;
        }
        text = next;
    }
    let text = ESCAPED.replace_all(&text, "$1").replace('~', " ");
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captions_in_document_order() {
        let tex = r"
\begin{table}
\centering
\caption{Alpha}
\begin{tabular}{ll} a & b \end{tabular}
\end{table}
Some text \caption{not a table caption}
\begin{table*}[t]
\caption{Beta with \emph{style}}
\end{table*}
";
        let captions = extract_table_captions(tex);
        assert_eq!(
            captions,
            vec![
                TableCaption {
                    caption: Some("Alpha".to_string()),
                    starred: false
                },
                TableCaption {
                    caption: Some(r"Beta with \emph{style}".to_string()),
                    starred: true
                },
            ]
        );
        assert_eq!(captions[1].plain().as_deref(), Some("Beta with style"));
    }

    #[test]
    fn test_only_first_caption_counts() {
        let tex = r"\begin{table}\caption{One}\caption{Two}\end{table}";
        let captions = extract_table_captions(tex);
        assert_eq!(captions.len(), 1);
        assert_eq!(captions[0].caption.as_deref(), Some("One"));
    }

    #[test]
    fn test_uncaptioned_table_keeps_its_slot() {
        let tex = r"\begin{table}x\end{table}\begin{table}\caption{Only}\end{table}";
        let captions = extract_table_captions(tex);
        assert_eq!(captions.len(), 2);
        assert_eq!(captions[0].caption, None);
        assert_eq!(captions[0].plain(), None);
        assert_eq!(captions[1].caption.as_deref(), Some("Only"));
    }

    #[test]
    fn test_caption_with_nested_braces() {
        let tex = r"\begin{table}\caption{Rates for {$n = 3$} groups}\end{table}";
        assert_eq!(
            extract_table_captions(tex)[0].caption.as_deref(),
            Some(r"Rates for {$n = 3$} groups")
        );
    }

    #[test]
    fn test_plain_caption() {
        assert_eq!(
            plain_caption(r"\textbf{\emph{Effect}} sizes (50\%) \&~more"),
            "Effect sizes (50%) & more"
        );
        assert_eq!(plain_caption("  spaced\n  out "), "spaced out");
    }
}
