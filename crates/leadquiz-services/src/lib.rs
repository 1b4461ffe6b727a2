pub mod error;
pub mod gemini;
pub mod prompt;
pub mod provider;
pub mod sheet;
pub mod sink;

pub use error::{Result, ServiceError};
pub use provider::AssessmentProvider;
pub use sink::LeadSink;
