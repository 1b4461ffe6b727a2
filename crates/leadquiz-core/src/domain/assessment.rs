use crate::error::CoreError;
use serde::{Deserialize, Serialize};

pub const MAX_ABILITY_SCORE: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EligibilityStatus {
    High,
    Moderate,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eligibility {
    pub status: EligibilityStatus,
    pub title: String,
    pub description: String,
    pub key_factors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ability {
    pub score: i64,
    pub financial_analysis: String,
    pub language_analysis: String,
    pub academic_analysis: String,
    pub recommendation: String,
}

/// Narrative returned by the assessment provider, in its camelCase wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub eligibility: Eligibility,
    pub ability: Ability,
}

impl AssessmentResult {
    pub fn validate(self) -> Result<Self, CoreError> {
        let score = self.ability.score;
        if !(0..=MAX_ABILITY_SCORE).contains(&score) {
            return Err(CoreError::ScoreOutOfRange(score));
        }
        Ok(self)
    }
}
