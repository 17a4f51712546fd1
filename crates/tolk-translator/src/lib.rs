use reqwest::StatusCode;
use tolk_core::LanguageCode;

pub mod google;
pub mod mymemory;

pub use google::GoogleGateway;
pub use mymemory::MyMemoryGateway;

/// Remote translation/detection service
#[async_trait::async_trait]
pub trait TranslationGateway: Send + Sync {
    /// Translate `text` into `to`. `from == None` lets the service detect the source.
    async fn translate(
        &self,
        text: &str,
        from: Option<LanguageCode>,
        to: LanguageCode,
    ) -> Result<String, GatewayError>;

    /// Best-guess language of `text`
    async fn detect_language(&self, text: &str) -> Result<LanguageCode, GatewayError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub requires_api_key: bool,
    pub free_tier_available: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error")]
    AuthenticationError,
}

/// Map a non-success HTTP status to an error, `Ok` otherwise
pub(crate) fn check_status(status: StatusCode) -> Result<(), GatewayError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(GatewayError::RateLimitExceeded);
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(GatewayError::AuthenticationError);
    }

    if !status.is_success() {
        return Err(GatewayError::ApiError(format!("HTTP {}", status)));
    }

    Ok(())
}

/// Parse a language code reported by a service (`en-GB`, `ZH`, ...)
pub(crate) fn parse_language(code: &str) -> Result<LanguageCode, GatewayError> {
    code.parse()
        .map_err(|_| GatewayError::UnsupportedLanguage(code.to_string()))
}
