use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GrammarError;

/// Languages with a built-in grammar table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Language {
    En,
    De,
    Es,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::De, Language::Es];

    pub fn code(self) -> &'static str {
        match self {
            Self::En => "EN",
            Self::De => "DE",
            Self::Es => "ES",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = GrammarError;

    /// Language codes are accepted in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GrammarError::UnsupportedLanguage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_in_any_case() {
        assert_eq!("EN".parse::<Language>().unwrap(), Language::En);
        assert_eq!("de".parse::<Language>().unwrap(), Language::De);
        assert_eq!(" Es ".parse::<Language>().unwrap(), Language::Es);
    }

    #[test]
    fn rejects_unknown_codes() {
        let err = "FR".parse::<Language>().unwrap_err();
        assert!(matches!(err, GrammarError::UnsupportedLanguage(code) if code == "FR"));
        assert!("".parse::<Language>().is_err());
    }

    #[test]
    fn serializes_as_code() {
        assert_eq!(serde_json::to_string(&Language::De).unwrap(), "\"DE\"");
        let lang: Language = serde_json::from_str("\"ES\"").unwrap();
        assert_eq!(lang, Language::Es);
    }
}
