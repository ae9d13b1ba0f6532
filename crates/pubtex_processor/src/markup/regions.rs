/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Footnote and caption region extraction.
//!
//! A single left-to-right scan tracks brace depth and whether it is inside a
//! `\footnote{...}` or `\caption{...}` argument. Region bodies are returned with
//! their outer braces stripped and with the byte span they occupy in the
//! source, so callers can splice rewritten bodies back in place.

use std::ops::Range;

const FOOTNOTE: &str = "\\footnote";
const CAPTION: &str = "\\caption";

/// The command a region was carved out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    Footnote,
    Caption,
}

/// The argument of one footnote or caption command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub kind: RegionKind,
    /// Argument text without the outer braces; nested braces kept verbatim.
    pub text: String,
    /// Byte range of `text` in the scanned source.
    pub span: Range<usize>,
}

/// Result of [`extract_regions`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Regions {
    /// Everything outside footnote and caption commands.
    pub body: String,
    pub footnotes: Vec<Region>,
    pub captions: Vec<Region>,
}

impl Regions {
    /// Footnotes and captions together, in source order.
    pub fn in_source_order(&self) -> Vec<&Region> {
        let mut all: Vec<&Region> = self.footnotes.iter().chain(&self.captions).collect();
        all.sort_by_key(|r| r.span.start);
        all
    }
}

fn region_command_at(rest: &str) -> Option<(RegionKind, usize)> {
    let (kind, token) = if rest.starts_with(FOOTNOTE) {
        (RegionKind::Footnote, FOOTNOTE)
    } else if rest.starts_with(CAPTION) {
        (RegionKind::Caption, CAPTION)
    } else {
        return None;
    };
    // `\footnotemark`, `\captionsetup` and friends are different control words.
    match rest[token.len()..].chars().next() {
        Some(c) if c.is_ascii_alphabetic() => None,
        _ => Some((kind, token.len())),
    }
}

struct Scanner {
    regions: Regions,
    mode: Option<RegionKind>,
    depth: usize,
    buffer: String,
    start: usize,
}

impl Scanner {
    fn flush(&mut self, end: usize) {
        let text = std::mem::take(&mut self.buffer);
        match self.mode {
            None => self.regions.body.push_str(&text),
            Some(kind) => {
                let region = Region {
                    kind,
                    text,
                    span: self.start..end,
                };
                match kind {
                    RegionKind::Footnote => self.regions.footnotes.push(region),
                    RegionKind::Caption => self.regions.captions.push(region),
                }
            }
        }
    }
}

/// Split markup into body text, footnote bodies and caption bodies.
///
/// Unbalanced braces never fail the scan: whatever is buffered at the end of
/// input is flushed to the region that is still open.
pub fn extract_regions(source: &str) -> Regions {
    let mut scanner = Scanner {
        regions: Regions::default(),
        mode: None,
        depth: 0,
        buffer: String::new(),
        start: 0,
    };

    let mut i = 0;
    while i < source.len() {
        let rest = &source[i..];

        if let Some((kind, token_len)) = region_command_at(rest) {
            scanner.flush(i);
            scanner.mode = Some(kind);
            scanner.depth = 0;
            i += token_len;
            scanner.start = i;
            continue;
        }

        let mut chars = rest.chars();
        let Some(c) = chars.next() else { break };

        // Escaped braces are literal text, not grouping.
        if c == '\\' {
            if let Some(next @ ('{' | '}')) = chars.next() {
                scanner.buffer.push(c);
                scanner.buffer.push(next);
                i += 2;
                continue;
            }
        }

        match (scanner.mode, c) {
            (Some(_), '{') => {
                scanner.depth += 1;
                if scanner.depth == 1 {
                    // Optional arguments before the body are not part of it.
                    scanner.buffer.clear();
                    scanner.start = i + 1;
                } else {
                    scanner.buffer.push(c);
                }
            }
            (Some(_), '}') if scanner.depth > 0 => {
                scanner.depth -= 1;
                if scanner.depth == 0 {
                    scanner.flush(i);
                    scanner.mode = None;
                } else {
                    scanner.buffer.push(c);
                }
            }
            _ => scanner.buffer.push(c),
        }
        i += c.len_utf8();
    }

    scanner.flush(source.len());
    scanner.regions
}
