use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tolk_core::LanguageCode;

use crate::{
    GatewayError, ProviderMetadata, TranslationGateway, check_status, parse_language,
};

pub const DEFAULT_ENDPOINT: &str = "https://translation.googleapis.com/language/translate/v2";

/// Google Cloud Translation v2
#[derive(Clone)]
pub struct GoogleGateway {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

#[derive(Serialize)]
struct TranslateBody<'a> {
    q: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    target: &'a str,
    format: &'a str,
}

#[derive(Serialize)]
struct DetectBody<'a> {
    q: &'a str,
}

impl GoogleGateway {
    pub fn new(api_key: String, endpoint: String, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    async fn post(&self, url: &str, body: &impl Serialize) -> Result<Value, GatewayError> {
        if self.api_key.is_empty() {
            return Err(GatewayError::AuthenticationError);
        }

        tracing::debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await?;

        tracing::debug!("Google responded {}", response.status());
        check_status(response.status())?;

        response.json().await.map_err(|e| {
            GatewayError::MalformedResponse(format!("Failed to parse response: {}", e))
        })
    }
}

#[async_trait]
impl TranslationGateway for GoogleGateway {
    async fn translate(
        &self,
        text: &str,
        from: Option<LanguageCode>,
        to: LanguageCode,
    ) -> Result<String, GatewayError> {
        let body = TranslateBody {
            q: text,
            source: from.map(LanguageCode::code),
            target: to.code(),
            format: "text",
        };

        let json = self.post(&self.endpoint, &body).await?;
        parse_translation(&json)
    }

    async fn detect_language(&self, text: &str) -> Result<LanguageCode, GatewayError> {
        let url = format!("{}/detect", self.endpoint);
        let json = self.post(&url, &DetectBody { q: text }).await?;
        parse_detection(&json)
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Google Translate".to_string(),
            requires_api_key: true,
            free_tier_available: true,
        }
    }
}

/// `data.translations[0].translatedText`
fn parse_translation(json: &Value) -> Result<String, GatewayError> {
    json["data"]["translations"]
        .get(0)
        .and_then(|t| t["translatedText"].as_str())
        .map(str::to_string)
        .ok_or_else(|| GatewayError::MalformedResponse("No translation in response".to_string()))
}

/// `data.detections[0][0].language`; confidence is ignored
fn parse_detection(json: &Value) -> Result<LanguageCode, GatewayError> {
    let detected = json["data"]["detections"]
        .get(0)
        .and_then(|d| d.get(0))
        .and_then(|d| d["language"].as_str())
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
            "data": { "translations": [{ "translatedText": "Selamat pagi" }] }
        });
        assert_eq!(parse_translation(&json).unwrap(), "Selamat pagi");
    }

    #[test]
    fn test_parse_translation_missing() {
        let json = json!({ "data": { "translations": [] } });
        assert!(matches!(
            parse_translation(&json),
            Err(GatewayError::MalformedResponse(_))
        ));

        let json = json!({ "error": { "code": 400, "message": "Bad request" } });
        assert!(parse_translation(&json).is_err());
    }

    #[test]
    fn test_parse_detection() {
        let json = json!({
            "data": { "detections": [[{ "language": "id", "confidence": 0.98, "isReliable": false }]] }
        });
        assert_eq!(parse_detection(&json).unwrap(), LanguageCode::Id);
    }

    #[test]
    fn test_parse_detection_unsupported() {
        let json = json!({
            "data": { "detections": [[{ "language": "sw", "confidence": 0.5 }]] }
        });
        assert!(matches!(
            parse_detection(&json),
            Err(GatewayError::UnsupportedLanguage(_))
        ));
    }

    #[test]
    fn test_body_omits_auto_source() {
        let body = TranslateBody {
            q: "hi",
            source: None,
            target: "id",
            format: "text",
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("source").is_none());
        assert_eq!(value["format"], "text");
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let gateway = GoogleGateway::new(
            String::new(),
            DEFAULT_ENDPOINT.to_string(),
            Duration::from_secs(1),
        )
        .unwrap();

        let result = gateway.translate("hello", None, LanguageCode::Id).await;
        assert!(matches!(result, Err(GatewayError::AuthenticationError)));
    }
}
