use crate::prompt::build_prompt;
use crate::provider::AssessmentProvider;
use crate::{Result, ServiceError};
use leadquiz_core::domain::{AssessmentResult, UserAnswer};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const PROVIDER_NAME: &str = "gemini";

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub api_key_env: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl GeminiSettings {
    pub fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

/// JSON schema the model must fill in, mirroring `AssessmentResult`.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "eligibility": {
                "type": "OBJECT",
                "properties": {
                    "status": { "type": "STRING", "enum": ["High", "Moderate", "Low"] },
                    "title": { "type": "STRING" },
                    "description": { "type": "STRING" },
                    "keyFactors": { "type": "ARRAY", "items": { "type": "STRING" } }
                },
                "required": ["status", "title", "description", "keyFactors"]
            },
            "ability": {
                "type": "OBJECT",
                "properties": {
                    "score": {
                        "type": "INTEGER",
                        "description": "A score from 0 to 100 representing overall ability to succeed."
                    },
                    "financialAnalysis": { "type": "STRING" },
                    "languageAnalysis": { "type": "STRING" },
                    "academicAnalysis": { "type": "STRING" },
                    "recommendation": { "type": "STRING" }
                },
                "required": [
                    "score",
                    "financialAnalysis",
                    "languageAnalysis",
                    "academicAnalysis",
                    "recommendation"
                ]
            }
        },
        "required": ["eligibility", "ability"]
    })
}

pub fn request_body(prompt: &str, temperature: f32) -> Value {
    json!({
        "contents": [
            { "role": "user", "parts": [ { "text": prompt } ] }
        ],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema(),
            "temperature": temperature
        }
    })
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Pulls the first candidate's text out of a `generateContent` reply and
/// decodes it as an assessment.
pub fn parse_generate_response(body: &str) -> Result<AssessmentResult> {
    let response: GenerateResponse = serde_json::from_str(body)?;
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ServiceError::EmptyResponse(PROVIDER_NAME));
    }

    let result: AssessmentResult = serde_json::from_str(text.trim())
        .map_err(|err| ServiceError::Parse(format!("invalid assessment json: {err}")))?;
    result
        .validate()
        .map_err(|err| ServiceError::Parse(err.to_string()))
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    settings: GeminiSettings,
}

impl GeminiClient {
    pub fn new(settings: GeminiSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &GeminiSettings {
        &self.settings
    }
}

impl AssessmentProvider for GeminiClient {
    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn assess(&self, answers: &[UserAnswer], user_name: &str) -> Result<AssessmentResult> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or_else(|| ServiceError::MissingApiKey(self.settings.api_key_env.clone()))?;
        let prompt = build_prompt(answers, user_name);
        let body = request_body(&prompt, self.settings.temperature);
        let reply = imp::generate(&self.settings, api_key, &body)?;
        parse_generate_response(&reply)
    }
}

#[cfg(feature = "remote")]
mod imp {
    use super::{Duration, GeminiSettings, Result, ServiceError, Value};
    use reqwest::blocking::Client;
    use reqwest::header::CONTENT_TYPE;
    use url::Url;

    pub fn generate(settings: &GeminiSettings, api_key: &str, body: &Value) -> Result<String> {
        let url = Url::parse(&settings.generate_url())?;
        if url.scheme() != "https" {
            return Err(ServiceError::Parse(
                "assessment endpoint must use https".to_string(),
            ));
        }
        let client = Client::builder()
            .user_agent("leadquiz")
            .timeout(settings.timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let response = client
            .post(url)
            .header("x-goog-api-key", api_key)
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(body)?)
            .send()?
            .error_for_status()?;
        Ok(response.text()?)
    }
}

#[cfg(not(feature = "remote"))]
mod imp {
    use super::{GeminiSettings, Result, ServiceError, Value};

    pub fn generate(_settings: &GeminiSettings, _api_key: &str, _body: &Value) -> Result<String> {
        Err(ServiceError::Unavailable(
            "assessment requests require the remote feature".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{
        parse_generate_response, request_body, GeminiClient, GeminiSettings, ServiceError,
    };
    use crate::provider::AssessmentProvider;
    use leadquiz_core::domain::EligibilityStatus;
    use serde_json::json;
    use std::time::Duration;

    fn settings(api_key: Option<&str>) -> GeminiSettings {
        GeminiSettings {
            endpoint: "https://generativelanguage.googleapis.com/v1beta/".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            api_key: api_key.map(str::to_string),
            api_key_env: "API_KEY".to_string(),
            temperature: 0.4,
            timeout: Duration::from_secs(5),
        }
    }

    fn reply_with_text(text: &str) -> String {
        json!({
            "candidates": [
                { "content": { "role": "model", "parts": [ { "text": text } ] } }
            ]
        })
        .to_string()
    }

    const ASSESSMENT: &str = r#"{"eligibility":{"status":"High","title":"You're on track","description":"Strong profile.","keyFactors":["Master's degree"]},"ability":{"score":88,"financialAnalysis":"Secured.","languageAnalysis":"C1 is great.","academicAnalysis":"Excellent grades.","recommendation":"Apply now."}}"#;

    #[test]
    fn generate_url_joins_endpoint_and_model() {
        assert_eq!(
            settings(None).generate_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[test]
    fn request_body_requests_json_with_schema() {
        let body = request_body("hello", 0.4);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        let config = &body["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(
            config["responseSchema"]["properties"]["eligibility"]["properties"]["status"]["enum"],
            json!(["High", "Moderate", "Low"])
        );
        assert!((config["temperature"].as_f64().unwrap() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn parses_candidate_text() {
        let result = parse_generate_response(&reply_with_text(ASSESSMENT)).unwrap();
        assert_eq!(result.eligibility.status, EligibilityStatus::High);
        assert_eq!(result.ability.score, 88);
        assert_eq!(result.ability.recommendation, "Apply now.");
    }

    #[test]
    fn joins_split_parts() {
        let (head, tail) = ASSESSMENT.split_at(40);
        let reply = json!({
            "candidates": [
                { "content": { "parts": [ { "text": head }, { "text": tail } ] } }
            ]
        })
        .to_string();
        assert!(parse_generate_response(&reply).is_ok());
    }

    #[test]
    fn empty_reply_is_an_error() {
        let err = parse_generate_response(r#"{"candidates":[]}"#).unwrap_err();
        assert!(matches!(err, ServiceError::EmptyResponse("gemini")));
        let err = parse_generate_response(&reply_with_text("  ")).unwrap_err();
        assert!(matches!(err, ServiceError::EmptyResponse(_)));
    }

    #[test]
    fn malformed_or_out_of_range_reply_is_a_parse_error() {
        let err = parse_generate_response(&reply_with_text("not json")).unwrap_err();
        assert!(matches!(err, ServiceError::Parse(_)));

        let too_high = ASSESSMENT.replace("\"score\":88", "\"score\":140");
        let err = parse_generate_response(&reply_with_text(&too_high)).unwrap_err();
        assert!(matches!(err, ServiceError::Parse(message) if message.contains("140")));
    }

    #[test]
    fn assess_without_api_key_fails_before_network() {
        let client = GeminiClient::new(settings(None));
        let err = client.assess(&[], "Alex").unwrap_err();
        assert!(matches!(err, ServiceError::MissingApiKey(name) if name == "API_KEY"));
    }
}
