use crate::Result;
use leadquiz_core::dto::LeadPayload;

/// Somewhere a finished lead is recorded. Callers treat failures as non-fatal.
pub trait LeadSink {
    fn sink_name(&self) -> &'static str;
    fn save_lead(&self, payload: &LeadPayload) -> Result<()>;
}
