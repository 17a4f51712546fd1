use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tolk_config::Config;

/// Load a JSON config file. Missing fields take their defaults.
pub fn load_config_file(path: &Path) -> anyhow::Result<Config> {
    tracing::info!("Loading config from {}", path.display());
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)?;
    Ok(config)
}

/// File (if any), then `TOLK_*` environment overrides
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::new());
    };

    let mut config = load_config_file(path)?;
    config.apply_env(|key| std::env::var(key).ok());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tolk_config::GatewayProvider;
    use tolk_core::LanguageCode;

    use super::*;

    #[test]
    fn test_load_config_file() {
        let path = std::env::temp_dir().join(format!("tolk-config-{}.json", std::process::id()));
        let mut file = File::create(&path).unwrap();
        write!(
            file,
            r#"{{ "gateway": {{ "provider": "mymemory" }}, "pipeline": {{ "target": "de", "debounce_ms": 300 }} }}"#
        )
        .unwrap();

        let config = load_config_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.gateway.provider, GatewayProvider::MyMemory);
        assert_eq!(config.pipeline.target, LanguageCode::De);
        assert_eq!(config.pipeline.debounce_ms, 300);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_config_file(Path::new("/nonexistent/tolk.json")).is_err());
    }
}
