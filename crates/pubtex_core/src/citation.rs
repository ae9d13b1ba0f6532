/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Citation occurrence model.
//!
//! A citation occurrence is one inline use-site of a bibliographic key in the
//! manuscript markup, together with the command family it came from and its
//! place inside a grouped citation command.

use serde::{Deserialize, Serialize};

/// The citation command family an occurrence was written with.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum CitationType {
    /// Parenthetical: "(Smith, 2020)".
    #[default]
    Paren,
    /// Narrative: "Smith (2020)".
    Text,
    /// Author name only.
    Author,
    /// Year only.
    Year,
}

impl CitationType {
    /// Map a command name such as `parencites` or `citeyear` to its family.
    pub fn from_command(command: &str) -> Option<Self> {
        match command {
            "parencite" | "parencites" => Some(Self::Paren),
            "textcite" | "textcites" => Some(Self::Text),
            "citeauthor" => Some(Self::Author),
            "citeyear" => Some(Self::Year),
            _ => None,
        }
    }
}

/// Position of an occurrence inside its command group.
///
/// Positions are group-relative: a command citing a single work is `Alone`,
/// otherwise the first entry is `First`, the last is `Last`, and everything in
/// between is `Middle`.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum CitationPosition {
    #[default]
    Alone,
    First,
    Middle,
    Last,
}

impl CitationPosition {
    /// Position of entry `index` in a group of `len` entries.
    pub fn in_group(index: usize, len: usize) -> Self {
        if len <= 1 {
            Self::Alone
        } else if index == 0 {
            Self::First
        } else if index + 1 == len {
            Self::Last
        } else {
            Self::Middle
        }
    }
}

/// One inline citation use-site.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct CitationOccurrence {
    /// The bibliographic key being cited.
    pub key: String,
    /// Command family.
    #[serde(rename = "type")]
    pub kind: CitationType,
    /// Group-relative position.
    pub position: CitationPosition,
    /// Note placed before the label ("see").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Note placed after the label ("p. 4").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl CitationOccurrence {
    /// Create a lone parenthetical occurrence for a single key.
    pub fn simple(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_in_group() {
        assert_eq!(CitationPosition::in_group(0, 1), CitationPosition::Alone);
        assert_eq!(CitationPosition::in_group(0, 3), CitationPosition::First);
        assert_eq!(CitationPosition::in_group(1, 3), CitationPosition::Middle);
        assert_eq!(CitationPosition::in_group(2, 3), CitationPosition::Last);
        assert_eq!(CitationPosition::in_group(1, 2), CitationPosition::Last);
    }

    #[test]
    fn test_command_families() {
        assert_eq!(CitationType::from_command("parencites"), Some(CitationType::Paren));
        assert_eq!(CitationType::from_command("textcite"), Some(CitationType::Text));
        assert_eq!(CitationType::from_command("citeauthor"), Some(CitationType::Author));
        assert_eq!(CitationType::from_command("citeyear"), Some(CitationType::Year));
        assert_eq!(CitationType::from_command("cite"), None);
    }

    #[test]
    fn test_occurrence_json_shape() {
        let occurrence = CitationOccurrence {
            suffix: Some("p. 4".to_string()),
            ..CitationOccurrence::simple("Smith2020")
        };
        let json = serde_json::to_value(&occurrence).unwrap();
        assert_eq!(json["key"], "Smith2020");
        assert_eq!(json["type"], "paren");
        assert_eq!(json["position"], "alone");
        assert_eq!(json["suffix"], "p. 4");
        assert!(json.get("prefix").is_none());
    }
}
