use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tolk_core::LanguageCode;

use crate::{
    GatewayError, ProviderMetadata, TranslationGateway, check_status, parse_language,
};

pub const DEFAULT_ENDPOINT: &str = "https://api.mymemory.translated.net/get";

const AUTODETECT: &str = "autodetect";

/// MyMemory public API. Works without a key; an email raises the daily quota.
#[derive(Clone)]
pub struct MyMemoryGateway {
    client: reqwest::Client,
    endpoint: String,
    email: Option<String>,
}

impl MyMemoryGateway {
    pub fn new(
        endpoint: String,
        email: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint,
            email: email.filter(|e| !e.is_empty()),
        })
    }

    async fn get(&self, text: &str, langpair: &str) -> Result<Value, GatewayError> {
        let mut params = vec![("q", text), ("langpair", langpair)];
        if let Some(email) = &self.email {
            params.push(("de", email.as_str()));
        }

        tracing::debug!("GET {} (langpair {})", self.endpoint, langpair);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&params)
            .send()
            .await?;

        tracing::debug!("MyMemory responded {}", response.status());
        check_status(response.status())?;

        let json: Value = response.json().await.map_err(|e| {
            GatewayError::MalformedResponse(format!("Failed to parse response: {}", e))
        })?;

        check_response_status(&json)?;
        Ok(json)
    }
}

#[async_trait]
impl TranslationGateway for MyMemoryGateway {
    async fn translate(
        &self,
        text: &str,
        from: Option<LanguageCode>,
        to: LanguageCode,
    ) -> Result<String, GatewayError> {
        let langpair = format!("{}|{}", from.map_or(AUTODETECT, LanguageCode::code), to);
        let json = self.get(text, &langpair).await?;
        parse_translation(&json)
    }

    async fn detect_language(&self, text: &str) -> Result<LanguageCode, GatewayError> {
        let langpair = format!("{}|{}", AUTODETECT, LanguageCode::En);
        let json = self.get(text, &langpair).await?;
        parse_detection(&json)
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "MyMemory".to_string(),
            requires_api_key: false,
            free_tier_available: true,
        }
    }
}

/// The body carries its own status, sent as a number or a string
fn check_response_status(json: &Value) -> Result<(), GatewayError> {
    let status = match &json["responseStatus"] {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    };

    match status {
        Some(200) => Ok(()),
        None => Err(GatewayError::MalformedResponse(
            "Missing responseStatus".to_string(),
        )),
        Some(429) => Err(GatewayError::RateLimitExceeded),
        Some(code) => {
            let details = json["responseDetails"].as_str().unwrap_or_default();
            Err(GatewayError::ApiError(format!("status {}: {}", code, details)))
        }
    }
}

/// `responseData.translatedText`
fn parse_translation(json: &Value) -> Result<String, GatewayError> {
    json["responseData"]["translatedText"]
        .as_str()
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or_else(|| GatewayError::MalformedResponse("No translation in response".to_string()))
}

/// `responseData.detectedLanguage`, else the source side of the best match
fn parse_detection(json: &Value) -> Result<LanguageCode, GatewayError> {
    let detected = json["responseData"]["detectedLanguage"]
        .as_str()
        .or_else(|| {
            json["matches"]
                .get(0)
                .and_then(|m| m["source"].as_str())
        })
        .ok_or_else(|| GatewayError::MalformedResponse("No detected language".to_string()))?;

    parse_language(detected)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_translation() {
        let json = json!({
            "responseData": { "translatedText": "Terima kasih", "match": 1 },
            "responseStatus": 200
        });
        assert!(check_response_status(&json).is_ok());
        assert_eq!(parse_translation(&json).unwrap(), "Terima kasih");
    }

    #[test]
    fn test_response_status_as_string() {
        let json = json!({
            "responseData": { "translatedText": "INVALID LANGUAGE PAIR" },
            "responseStatus": "403",
            "responseDetails": "INVALID LANGUAGE PAIR SPECIFIED"
        });
        assert!(matches!(
            check_response_status(&json),
            Err(GatewayError::ApiError(_))
        ));
    }

    #[test]
    fn test_quota_exceeded() {
        let json = json!({ "responseStatus": 429, "responseData": {} });
        assert!(matches!(
            check_response_status(&json),
            Err(GatewayError::RateLimitExceeded)
        ));
    }

    #[test]
    fn test_missing_status_is_malformed() {
        let json = json!({ "responseData": { "translatedText": "halo" } });
        assert!(matches!(
            check_response_status(&json),
            Err(GatewayError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_detection_prefers_detected_language() {
        let json = json!({
            "responseData": { "translatedText": "hello", "detectedLanguage": "fr-FR" },
            "matches": [{ "source": "it-IT", "target": "en-GB" }]
        });
        assert_eq!(parse_detection(&json).unwrap(), LanguageCode::Fr);
    }

    #[test]
    fn test_parse_detection_from_matches() {
        let json = json!({
            "responseData": { "translatedText": "hello" },
            "matches": [{ "source": "id-ID", "target": "en-GB" }]
        });
        assert_eq!(parse_detection(&json).unwrap(), LanguageCode::Id);
    }

    #[test]
    fn test_empty_translation_is_malformed() {
        let json = json!({ "responseData": { "translatedText": "" }, "responseStatus": 200 });
        assert!(matches!(
            parse_translation(&json),
            Err(GatewayError::MalformedResponse(_))
        ));
    }
}
