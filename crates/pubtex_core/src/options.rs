/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Pipeline configuration.
//!
//! Every field has a default matching the journal house style, so an empty
//! YAML document is a valid configuration.

use serde::{Deserialize, Serialize};

/// Top-level pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PipelineConfig {
    /// Citation style name handed to the style formatter.
    pub style: String,
    /// Locale handed to the style formatter.
    pub locale: String,
    pub headings: HeadingsConfig,
    pub tables: TableConfig,
    pub crossmark: CrossmarkConfig,
    pub preclean: PrecleanConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            style: "apa-7".to_string(),
            locale: "en-US".to_string(),
            headings: HeadingsConfig::default(),
            tables: TableConfig::default(),
            crossmark: CrossmarkConfig::default(),
            preclean: PrecleanConfig::default(),
        }
    }
}

/// Fixed heading and label texts inserted into the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HeadingsConfig {
    pub abstract_title: String,
    /// Stable identifier given to the generated abstract heading.
    pub abstract_id: String,
    pub references_title: String,
    pub keywords_label: String,
}

impl Default for HeadingsConfig {
    fn default() -> Self {
        Self {
            abstract_title: "Abstract".to_string(),
            abstract_id: "abstract".to_string(),
            references_title: "References".to_string(),
            keywords_label: "Keywords: ".to_string(),
        }
    }
}

/// Table captioning and styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TableConfig {
    /// Tables with more columns than this get `wide-size`.
    pub wide_threshold: usize,
    pub narrow_size: String,
    pub wide_size: String,
    pub align: String,
    pub smaller_font: bool,
    /// Caption label, rendered as "{label} {n}. ".
    pub label: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            wide_threshold: 5,
            narrow_size: "50".to_string(),
            wide_size: "75".to_string(),
            align: "breakout".to_string(),
            smaller_font: true,
            label: "Table".to_string(),
        }
    }
}

/// Crossref Crossmark badge placed at the top of documents with a DOI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrossmarkConfig {
    pub logo_url: String,
    pub dialog_url: String,
    /// Journal domain reported to the Crossmark dialog.
    pub domain: String,
    pub size: u32,
    pub align: String,
}

impl Default for CrossmarkConfig {
    fn default() -> Self {
        Self {
            logo_url: "https://crossmark-cdn.crossref.org/widget/v2.0/logos/CROSSMARK_Color_horizontal.svg"
                .to_string(),
            dialog_url: "https://crossmark.crossref.org/dialog".to_string(),
            domain: "journal.trialanderror.org".to_string(),
            size: 22,
            align: "left".to_string(),
        }
    }
}

/// Structural rewrites applied to raw markup before extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PrecleanConfig {
    /// Environments whose begin/end commands are erased, keeping the content.
    pub unwrap_environments: Vec<String>,
    /// Environments hoisted out of the body into sections of their own, in order.
    pub hoisted_sections: Vec<HoistedSection>,
    /// Environments whose starred variant is folded into the plain one.
    pub unstar_environments: Vec<String>,
}

impl Default for PrecleanConfig {
    fn default() -> Self {
        Self {
            unwrap_environments: vec!["fullwidth".to_string()],
            hoisted_sections: vec![
                HoistedSection {
                    environment: "originalPurpose".to_string(),
                    title: "Original Purpose".to_string(),
                    introduction: Some("Introduction".to_string()),
                },
                HoistedSection {
                    environment: "takeHomeMessage".to_string(),
                    title: "Take Home Message".to_string(),
                    introduction: None,
                },
            ],
            unstar_environments: vec!["figure".to_string(), "table".to_string()],
        }
    }
}

/// A custom environment moved to the top of the document body as a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HoistedSection {
    pub environment: String,
    /// Section title given to the hoisted content.
    pub title: String,
    /// When set, the remaining body text is put under a section with this title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_is_default() {
        let config: PipelineConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_partial_yaml_overrides() {
        let yaml = r#"
style: chicago-author-date
tables:
  wide-threshold: 7
crossmark:
  domain: example.org
preclean:
  hoisted-sections:
    - environment: summary
      title: Summary
"#;
        let config: PipelineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.style, "chicago-author-date");
        assert_eq!(config.tables.wide_threshold, 7);
        assert_eq!(config.tables.wide_size, "75");
        assert_eq!(config.crossmark.domain, "example.org");
        assert_eq!(config.crossmark.size, 22);
        assert_eq!(config.preclean.hoisted_sections.len(), 1);
        assert_eq!(config.preclean.hoisted_sections[0].introduction, None);
        assert_eq!(config.preclean.unwrap_environments, vec!["fullwidth"]);
    }
}
