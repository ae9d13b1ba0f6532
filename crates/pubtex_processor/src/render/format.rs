/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Output format trait for pluggable renderers.

/// Trait for defining how rendered reference parts map to a specific format.
///
/// Implementations translate formatting instructions (emphasis, links,
/// entry and list wrappers) into concrete markup or text.
pub trait OutputFormat: Default + Clone {
    /// The type used for intermediate rendered content.
    type Output;

    /// Convert a raw string into the format's output type.
    ///
    /// The implementation should handle any character escaping required by
    /// the target format.
    fn text(&self, s: &str) -> Self::Output;

    /// Join multiple outputs into a single output using a delimiter.
    fn join(&self, items: Vec<Self::Output>, delimiter: &str) -> Self::Output;

    /// Convert the intermediate output into the final result string.
    fn finish(&self, output: Self::Output) -> String;

    /// Render content with emphasis (typically italics).
    fn emph(&self, content: Self::Output) -> Self::Output;

    /// Apply prefix and suffix strings to the content.
    fn affix(&self, prefix: &str, content: Self::Output, suffix: &str) -> Self::Output;

    /// Hyperlink the content to a URL.
    fn link(&self, url: &str, content: Self::Output) -> Self::Output;

    /// Wrap one complete bibliography entry.
    fn entry(&self, id: &str, content: Self::Output) -> Self::Output;

    /// Wrap the list of entries; entries go one per line.
    fn bibliography(&self, entries: Vec<Self::Output>) -> Self::Output;
}
