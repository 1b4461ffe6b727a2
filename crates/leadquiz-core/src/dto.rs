use crate::domain::lead::Lead;
use crate::domain::phone::{PhoneRejection, PhoneVerdict};
use crate::domain::quiz::UserAnswer;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Row appended to the lead spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadPayload {
    pub timestamp: String,
    pub name: String,
    pub phone: String,
    pub language: String,
    pub answers: String,
}

impl LeadPayload {
    pub fn from_lead(lead: &Lead, now: DateTime<Utc>) -> Self {
        Self {
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            name: lead.name.clone(),
            phone: lead.phone.as_str().to_string(),
            language: lead.language.as_str().to_string(),
            answers: format_answers(&lead.answers),
        }
    }
}

pub fn format_answers(answers: &[UserAnswer]) -> String {
    answers
        .iter()
        .map(|answer| format!("{}: {}", answer.question_text, answer.selected_option.label))
        .collect::<Vec<_>>()
        .join(" | ")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhoneCheckDto {
    pub input: String,
    pub valid: bool,
    pub reason: Option<PhoneRejection>,
    pub message: Option<String>,
}

impl PhoneCheckDto {
    pub fn new(input: &str, verdict: PhoneVerdict) -> Self {
        let reason = verdict.rejection();
        Self {
            input: input.to_string(),
            valid: verdict.is_valid(),
            reason,
            message: reason.map(|reason| reason.to_string()),
        }
    }
}
