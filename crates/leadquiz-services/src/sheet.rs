use crate::sink::LeadSink;
use crate::{Result, ServiceError};
use leadquiz_core::dto::LeadPayload;
use std::time::Duration;

/// Serialized webhook body. Apps Script web apps read it from `postData.contents`.
pub fn webhook_body(payload: &LeadPayload) -> Result<String> {
    Ok(serde_json::to_string(payload)?)
}

#[cfg(feature = "remote")]
mod imp {
    use super::{webhook_body, Duration, LeadPayload, LeadSink, Result, ServiceError};
    use reqwest::blocking::Client;
    use reqwest::header::CONTENT_TYPE;
    use url::Url;

    #[derive(Debug, Clone)]
    pub struct SheetWebhook {
        url: String,
        timeout: Duration,
    }

    impl SheetWebhook {
        pub fn new(url: String, timeout: Duration) -> Self {
            Self { url, timeout }
        }
    }

    impl LeadSink for SheetWebhook {
        fn sink_name(&self) -> &'static str {
            "sheet-webhook"
        }

        fn save_lead(&self, payload: &LeadPayload) -> Result<()> {
            post_lead(&self.url, self.timeout, payload)
        }
    }

    pub fn post_lead(webhook_url: &str, timeout: Duration, payload: &LeadPayload) -> Result<()> {
        let url = Url::parse(webhook_url)?;
        if url.scheme() != "https" {
            return Err(ServiceError::Parse(
                "sheet webhook url must use https".to_string(),
            ));
        }
        let client = Client::builder()
            .user_agent("leadquiz")
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        client
            .post(url)
            .header(CONTENT_TYPE, "text/plain;charset=utf-8")
            .body(webhook_body(payload)?)
            .send()?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(not(feature = "remote"))]
mod imp {
    use super::{Duration, LeadPayload, LeadSink, Result, ServiceError};

    #[derive(Debug, Clone)]
    pub struct SheetWebhook {
        url: String,
        timeout: Duration,
    }

    impl SheetWebhook {
        pub fn new(url: String, timeout: Duration) -> Self {
            Self { url, timeout }
        }
    }

    impl LeadSink for SheetWebhook {
        fn sink_name(&self) -> &'static str {
            "sheet-webhook"
        }

        fn save_lead(&self, payload: &LeadPayload) -> Result<()> {
            post_lead(&self.url, self.timeout, payload)
        }
    }

    pub fn post_lead(_webhook_url: &str, _timeout: Duration, _payload: &LeadPayload) -> Result<()> {
        Err(ServiceError::Unavailable(
            "sheet webhook requires the remote feature".to_string(),
        ))
    }
}

pub use imp::{post_lead, SheetWebhook};

#[cfg(test)]
mod tests {
    use super::webhook_body;
    use chrono::{TimeZone, Utc};
    use leadquiz_core::domain::{Lead, PreferredLanguage, QuizSession};
    use leadquiz_core::dto::LeadPayload;

    #[test]
    fn webhook_body_has_sheet_columns() {
        let mut session = QuizSession::new();
        session.answer("h_school").unwrap();
        let lead = Lead::new(
            "Ravi",
            "+91 91234 56789",
            PreferredLanguage::Kannada,
            session.answers().to_vec(),
        )
        .unwrap();
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();

        let body = webhook_body(&LeadPayload::from_lead(&lead, now)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["timestamp"], "2026-01-02T03:04:05.000Z");
        assert_eq!(value["name"], "Ravi");
        assert_eq!(value["phone"], "+91 91234 56789");
        assert_eq!(value["language"], "Kannada");
        assert_eq!(
            value["answers"],
            "What is your highest academic qualification?: High School Diploma (12th Grade)"
        );
    }
}
