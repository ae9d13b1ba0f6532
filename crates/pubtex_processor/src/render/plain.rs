/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Plain text output format.

use super::format::OutputFormat;

#[derive(Debug, Default, Clone)]
pub struct PlainText;

impl OutputFormat for PlainText {
    type Output = String;

    fn text(&self, s: &str) -> Self::Output {
        s.to_string()
    }

    fn join(&self, items: Vec<Self::Output>, delimiter: &str) -> Self::Output {
        items.join(delimiter)
    }

    fn finish(&self, output: Self::Output) -> String {
        output
    }

    fn emph(&self, content: Self::Output) -> Self::Output {
        // Plain text has no emphasis.
        content
    }

    fn affix(&self, prefix: &str, content: Self::Output, suffix: &str) -> Self::Output {
        format!("{}{}{}", prefix, content, suffix)
    }

    fn link(&self, _url: &str, content: Self::Output) -> Self::Output {
        // Plain text just renders the text content of the link
        content
    }

    fn entry(&self, _id: &str, content: Self::Output) -> Self::Output {
        content
    }

    fn bibliography(&self, entries: Vec<Self::Output>) -> Self::Output {
        self.join(entries, "\n")
    }
}
