/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! HTML output format.
//!
//! Mirrors the markup citeproc engines emit: a `csl-bib-body` container
//! holding one `csl-entry` block per reference.

use super::format::OutputFormat;

#[derive(Debug, Default, Clone)]
pub struct Html;

impl OutputFormat for Html {
    type Output = String;

    fn text(&self, s: &str) -> Self::Output {
        html_escape::encode_text(s).into_owned()
    }

    fn join(&self, items: Vec<Self::Output>, delimiter: &str) -> Self::Output {
        items.join(delimiter)
    }

    fn finish(&self, output: Self::Output) -> String {
        output
    }

    fn emph(&self, content: Self::Output) -> Self::Output {
        if content.is_empty() {
            return content;
        }
        format!("<i>{}</i>", content)
    }

    fn affix(&self, prefix: &str, content: Self::Output, suffix: &str) -> Self::Output {
        format!("{}{}{}", prefix, content, suffix)
    }

    fn link(&self, url: &str, content: Self::Output) -> Self::Output {
        if content.is_empty() {
            return content;
        }
        format!(
            r#"<a href="{}">{}</a>"#,
            html_escape::encode_double_quoted_attribute(url),
            content
        )
    }

    fn entry(&self, _id: &str, content: Self::Output) -> Self::Output {
        format!(r#"  <div class="csl-entry">{}</div>"#, content)
    }

    fn bibliography(&self, entries: Vec<Self::Output>) -> Self::Output {
        format!(
            "<div class=\"csl-bib-body\">\n{}\n</div>",
            self.join(entries, "\n")
        )
    }
}
