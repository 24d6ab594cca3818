use std::fmt;
use std::str::FromStr;

use lexref_core::UnitKind;
use serde::{Deserialize, Serialize};

use crate::error::ReflectError;

/// What a reflector returns for each text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// The text with every resolved citation wrapped in a link.
    #[default]
    Markup,
    /// The resolved citations with their anchors.
    Locators,
}

impl OutputMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Markup => "markup",
            Self::Locators => "locators",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputMode {
    type Err = ReflectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markup" => Ok(Self::Markup),
            "locators" => Ok(Self::Locators),
            _ => Err(ReflectError::UnsupportedMode(s.to_string())),
        }
    }
}

/// Reflector settings as a collaborator would store them.
///
/// Codes stay strings here so that an unknown language read from a file
/// fails when the reflector is built, not when the file is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectorConfig {
    pub language: String,
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Document assumed for citations that name none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    /// Prefix for links into other documents, e.g. `https://lex.example`.
    #[serde(default)]
    pub domain: String,
    /// Citation of the provision the text sits in, e.g. "Article 5", in the
    /// configured language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    /// Citations that spell out nothing at or above this unit are dropped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_unit: Option<UnitKind>,
    /// Merge a citation into a neighbour it contains or is contained by.
    #[serde(default)]
    pub join_nested: bool,
}

fn default_mode() -> String {
    OutputMode::default().as_str().to_string()
}

impl Default for ReflectorConfig {
    fn default() -> Self {
        Self {
            language: "EN".to_string(),
            mode: default_mode(),
            document: None,
            domain: String::new(),
            container: None,
            min_unit: None,
            join_nested: false,
        }
    }
}
