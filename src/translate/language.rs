use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Target languages the pipeline knows how to hand to the translation API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportedLanguage {
    Es,
    En,
    Fr,
    Ja,
}

impl SupportedLanguage {
    #[cfg(test)]
    pub const ALL: [SupportedLanguage; 4] = [Self::Es, Self::En, Self::Fr, Self::Ja];

    /// Short code as it travels in pipeline messages
    pub fn code(&self) -> &'static str {
        match self {
            Self::Es => "es",
            Self::En => "en",
            Self::Fr => "fr",
            Self::Ja => "ja",
        }
    }

    /// Language identifier sent to the translation API.
    ///
    /// Spanish maps to European Spanish, every other code is passed through.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Es => "es-ES",
            Self::En => "en",
            Self::Fr => "fr",
            Self::Ja => "ja",
        }
    }

    pub fn parse(code: &str) -> Result<Self, PipelineError> {
        match code {
            "es" => Ok(Self::Es),
            "en" => Ok(Self::En),
            "fr" => Ok(Self::Fr),
            "ja" => Ok(Self::Ja),
            other => Err(PipelineError::UnsupportedLanguage(other.to_string())),
        }
    }
}

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
