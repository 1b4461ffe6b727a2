use crate::error::CoreError;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerOption {
    pub id: &'static str,
    pub label: &'static str,
    pub value: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: u32,
    pub text: &'static str,
    pub description: Option<&'static str>,
    pub options: &'static [AnswerOption],
}

impl Question {
    /// Resolves a choice given either as an option id or as a 1-based position.
    pub fn select(&self, choice: &str) -> Result<AnswerOption, CoreError> {
        let trimmed = choice.trim();
        if let Some(option) = self
            .options
            .iter()
            .find(|option| option.id.eq_ignore_ascii_case(trimmed))
        {
            return Ok(*option);
        }

        trimmed
            .parse::<usize>()
            .ok()
            .and_then(|position| position.checked_sub(1))
            .and_then(|index| self.options.get(index))
            .copied()
            .ok_or_else(|| CoreError::UnknownOption {
                question_id: self.id,
                choice: trimmed.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnswer {
    pub question_id: u32,
    pub question_text: &'static str,
    pub selected_option: AnswerOption,
}

static QUESTIONS: [Question; 5] = [
    Question {
        id: 1,
        text: "What is your highest academic qualification?",
        description: Some(
            "This helps determine your HZB (Higher Education Entrance Qualification).",
        ),
        options: &[
            AnswerOption {
                id: "h_school",
                label: "High School Diploma (12th Grade)",
                value: "high_school",
            },
            AnswerOption {
                id: "bachelor",
                label: "Bachelor’s Degree",
                value: "bachelor",
            },
            AnswerOption {
                id: "master",
                label: "Master’s Degree",
                value: "master",
            },
        ],
    },
    Question {
        id: 2,
        text: "What is your approximate Grade/GPA?",
        description: None,
        options: &[
            AnswerOption {
                id: "excellent",
                label: "Excellent (Top 10% / >90% / GPA 3.7+)",
                value: "excellent",
            },
            AnswerOption {
                id: "good",
                label: "Good (Top 25% / 75-90% / GPA 3.0+)",
                value: "good",
            },
            AnswerOption {
                id: "average",
                label: "Average (60-75% / GPA 2.5+)",
                value: "average",
            },
            AnswerOption {
                id: "low",
                label: "Below Average (<60% / GPA <2.5)",
                value: "low",
            },
        ],
    },
    Question {
        id: 3,
        text: "What is your current German language proficiency?",
        description: Some("Language skills are crucial for admission and daily life."),
        options: &[
            AnswerOption {
                id: "none",
                label: "None / Absolute Beginner",
                value: "none",
            },
            AnswerOption {
                id: "a1_a2",
                label: "Beginner (A1 - A2)",
                value: "A1/A2",
            },
            AnswerOption {
                id: "b1_b2",
                label: "Intermediate (B1 - B2)",
                value: "B1/B2",
            },
            AnswerOption {
                id: "c1_c2",
                label: "Advanced (C1 - C2)",
                value: "C1/C2",
            },
        ],
    },
    Question {
        id: 4,
        text: "What is your intended field of study?",
        description: Some("Admission criteria vary significantly by faculty."),
        options: &[
            AnswerOption {
                id: "stem",
                label: "Engineering / IT / Math",
                value: "STEM",
            },
            AnswerOption {
                id: "med",
                label: "Medicine / Health",
                value: "Medicine",
            },
            AnswerOption {
                id: "business",
                label: "Business / Economics",
                value: "Business",
            },
            AnswerOption {
                id: "arts",
                label: "Arts / Humanities / Social Sciences",
                value: "Arts",
            },
            AnswerOption {
                id: "other",
                label: "Other Programs",
                value: "Other",
            },
        ],
    },
    Question {
        id: 5,
        text: "What is your estimated yearly budget for living expenses?",
        description: Some("A 'Blocked Account' (~€11,208) is often required for visas."),
        options: &[
            AnswerOption {
                id: "secure",
                label: "€12,000+ (Fully Secured)",
                value: "high_budget",
            },
            AnswerOption {
                id: "part_secure",
                label: "€8,000 - €12,000 (Tight)",
                value: "mid_budget",
            },
            AnswerOption {
                id: "rely_work",
                label: "< €8,000 (Relying on Part-time Work)",
                value: "low_budget",
            },
        ],
    },
];

pub fn questions() -> &'static [Question] {
    &QUESTIONS
}

pub fn question(id: u32) -> Option<&'static Question> {
    QUESTIONS.iter().find(|question| question.id == id)
}

/// Answers chosen up front, keyed by question id (`"2=good"` on the command line).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selections(BTreeMap<u32, String>);

impl Selections {
    pub fn parse<S: AsRef<str>>(items: &[S]) -> Result<Self, CoreError> {
        let mut map = BTreeMap::new();
        for item in items {
            let raw = item.as_ref();
            let (id, choice) = raw
                .split_once('=')
                .ok_or_else(|| CoreError::InvalidSelection(raw.to_string()))?;
            let id: u32 = id
                .trim()
                .parse()
                .map_err(|_| CoreError::InvalidSelection(raw.to_string()))?;
            let question = question(id).ok_or(CoreError::UnknownQuestion(id))?;
            question.select(choice)?;
            if map.insert(id, choice.trim().to_string()).is_some() {
                return Err(CoreError::DuplicateAnswer(id));
            }
        }
        Ok(Self(map))
    }

    pub fn get(&self, question_id: u32) -> Option<&str> {
        self.0.get(&question_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One pass through the catalogue, answered strictly in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizSession {
    answers: Vec<UserAnswer>,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_steps(&self) -> usize {
        QUESTIONS.len()
    }

    /// 1-based step shown to the user ("Step 2 of 5").
    pub fn display_step(&self) -> usize {
        (self.answers.len() + 1).min(self.total_steps())
    }

    pub fn current_question(&self) -> Option<&'static Question> {
        QUESTIONS.get(self.answers.len())
    }

    pub fn is_complete(&self) -> bool {
        self.answers.len() >= QUESTIONS.len()
    }

    pub fn progress_percent(&self) -> u8 {
        let percent = self.display_step() * 100 / self.total_steps();
        percent.min(100) as u8
    }

    pub fn answer(&mut self, choice: &str) -> Result<&UserAnswer, CoreError> {
        let question = self.current_question().ok_or(CoreError::QuizComplete)?;
        let selected_option = question.select(choice)?;
        self.answers.push(UserAnswer {
            question_id: question.id,
            question_text: question.text,
            selected_option,
        });
        Ok(&self.answers[self.answers.len() - 1])
    }

    /// Answers as many remaining questions as `selections` covers, stopping at the
    /// first gap. Returns how many were answered.
    pub fn apply(&mut self, selections: &Selections) -> Result<usize, CoreError> {
        let mut applied = 0;
        while let Some(question) = self.current_question() {
            let Some(choice) = selections.get(question.id) else {
                break;
            };
            self.answer(choice)?;
            applied += 1;
        }
        Ok(applied)
    }

    pub fn answers(&self) -> &[UserAnswer] {
        &self.answers
    }

    pub fn into_answers(self) -> Result<Vec<UserAnswer>, CoreError> {
        if !self.is_complete() {
            return Err(CoreError::QuizIncomplete);
        }
        Ok(self.answers)
    }

    pub fn reset(&mut self) {
        self.answers.clear();
    }
}
