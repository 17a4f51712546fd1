use std::sync::Arc;

use tolk_config::GatewayProvider;
use tolk_config::gateway::GatewayConfig;
use tolk_translator::{GoogleGateway, MyMemoryGateway, TranslationGateway, google, mymemory};

/// Build the configured translation backend
pub fn build_gateway(config: &GatewayConfig) -> anyhow::Result<Arc<dyn TranslationGateway>> {
    let gateway: Arc<dyn TranslationGateway> = match config.provider {
        GatewayProvider::Google => {
            if config.api_key.is_empty() {
                tracing::warn!("No API key set for Google Translate, requests will fail");
            }
            let endpoint = config
                .api_url
                .clone()
                .unwrap_or_else(|| google::DEFAULT_ENDPOINT.to_string());
            Arc::new(GoogleGateway::new(
                config.api_key.clone(),
                endpoint,
                config.timeout(),
            )?)
        }
        GatewayProvider::MyMemory => {
            let endpoint = config
                .api_url
                .clone()
                .unwrap_or_else(|| mymemory::DEFAULT_ENDPOINT.to_string());
            Arc::new(MyMemoryGateway::new(
                endpoint,
                config.email.clone(),
                config.timeout(),
            )?)
        }
    };

    let metadata = gateway.metadata();
    tracing::info!(
        "Using {} (api key required: {})",
        metadata.name,
        metadata.requires_api_key
    );

    Ok(gateway)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_each_provider() {
        let mut config = GatewayConfig::default();
        assert_eq!(build_gateway(&config).unwrap().metadata().name, "Google Translate");

        config.provider = GatewayProvider::MyMemory;
        assert_eq!(build_gateway(&config).unwrap().metadata().name, "MyMemory");
    }
}
