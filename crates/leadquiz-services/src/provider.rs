use crate::Result;
use leadquiz_core::domain::{AssessmentResult, UserAnswer};

pub trait AssessmentProvider {
    fn provider_name(&self) -> &'static str;
    fn assess(&self, answers: &[UserAnswer], user_name: &str) -> Result<AssessmentResult>;
}
