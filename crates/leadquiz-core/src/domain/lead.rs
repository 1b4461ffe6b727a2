use crate::domain::phone::PhoneNumber;
use crate::domain::quiz::UserAnswer;
use crate::error::CoreError;
use crate::rules::phone::PhoneRules;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreferredLanguage {
    #[default]
    English,
    Hindi,
    Malayalam,
    Tamil,
    Kannada,
    Telugu,
    Other,
}

impl PreferredLanguage {
    pub const ALL: [Self; 7] = [
        Self::English,
        Self::Hindi,
        Self::Malayalam,
        Self::Tamil,
        Self::Kannada,
        Self::Telugu,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Hindi => "Hindi",
            Self::Malayalam => "Malayalam",
            Self::Tamil => "Tamil",
            Self::Kannada => "Kannada",
            Self::Telugu => "Telugu",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for PreferredLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreferredLanguage {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|language| language.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CoreError::InvalidLanguage(trimmed.to_string()))
    }
}

/// Contact details plus the completed quiz, ready to hand to a lead sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lead {
    pub name: String,
    pub phone: PhoneNumber,
    pub language: PreferredLanguage,
    pub answers: Vec<UserAnswer>,
}

impl Lead {
    pub fn new(
        name: &str,
        phone: &str,
        language: PreferredLanguage,
        answers: Vec<UserAnswer>,
    ) -> Result<Self, CoreError> {
        Self::with_rules(name, phone, language, answers, &PhoneRules::default())
    }

    pub fn with_rules(
        name: &str,
        phone: &str,
        language: PreferredLanguage,
        answers: Vec<UserAnswer>,
        rules: &PhoneRules,
    ) -> Result<Self, CoreError> {
        let name = normalize_name(name)?;
        let phone = rules.accept(phone)?;
        if answers.is_empty() {
            return Err(CoreError::NoAnswers);
        }
        Ok(Self {
            name,
            phone,
            language,
            answers,
        })
    }
}

pub fn normalize_name(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::EmptyName);
    }
    Ok(trimmed.to_string())
}
