pub mod assessment;
pub mod lead;
pub mod phone;
pub mod quiz;

pub use assessment::{Ability, AssessmentResult, Eligibility, EligibilityStatus};
pub use lead::{normalize_name, Lead, PreferredLanguage};
pub use phone::{phone_digits, PhoneNumber, PhoneRejection, PhoneVerdict};
pub use quiz::{question, questions, AnswerOption, Question, QuizSession, Selections, UserAnswer};
