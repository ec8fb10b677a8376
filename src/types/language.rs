//! Supported input/output languages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DhakhtarError;

/// Languages the service accepts symptoms in and answers with.
///
/// Models are trained on English text; Somali input is translated first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "som")]
    Somali,
}

impl Language {
    /// ISO 639-1 code used by translation providers.
    pub fn iso_code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Somali => "so",
        }
    }

    /// Code used in API responses and stored records.
    pub fn api_code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Somali => "som",
        }
    }

    /// Map a provider's detected ISO code to a supported language.
    pub fn from_iso(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "en" => Some(Self::English),
            "so" => Some(Self::Somali),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_code())
    }
}

impl FromStr for Language {
    type Err = DhakhtarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match LanguageHint::parse(s) {
            LanguageHint::Forced(lang) => Ok(lang),
            LanguageHint::Auto => Err(DhakhtarError::InvalidInput(format!(
                "unsupported language '{s}'"
            ))),
        }
    }
}

/// Caller-supplied language preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LanguageHint {
    /// Detect the language from the text.
    #[default]
    Auto,
    Forced(Language),
}

impl LanguageHint {
    /// Parse a request `lang` value. Unknown values fall back to `Auto`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "som" | "somali" | "so" => Self::Forced(Language::Somali),
            "en" | "english" | "eng" => Self::Forced(Language::English),
            _ => Self::Auto,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hint_aliases() {
        for raw in ["so", "som", "Somali"] {
            assert_eq!(LanguageHint::parse(raw), LanguageHint::Forced(Language::Somali));
        }
        for raw in ["en", "ENG", "english"] {
            assert_eq!(LanguageHint::parse(raw), LanguageHint::Forced(Language::English));
        }
        assert_eq!(LanguageHint::parse("auto"), LanguageHint::Auto);
        assert_eq!(LanguageHint::parse("fr"), LanguageHint::Auto);
    }

    #[test]
    fn codes() {
        assert_eq!(Language::Somali.iso_code(), "so");
        assert_eq!(Language::Somali.api_code(), "som");
        assert_eq!(Language::from_iso("SO"), Some(Language::Somali));
        assert_eq!(Language::from_iso("fr"), None);
    }

    #[test]
    fn serde_uses_api_codes() {
        assert_eq!(serde_json::to_string(&Language::Somali).unwrap(), "\"som\"");
        let lang: Language = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(lang, Language::English);
    }
}
