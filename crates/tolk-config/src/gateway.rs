use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::env_or;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayProvider {
    #[default]
    Google,
    MyMemory,
}

impl FromStr for GatewayProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "google" => Ok(GatewayProvider::Google),
            "mymemory" => Ok(GatewayProvider::MyMemory),
            other => Err(format!("unknown provider: {other}")),
        }
    }
}

impl fmt::Display for GatewayProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayProvider::Google => f.write_str("google"),
            GatewayProvider::MyMemory => f.write_str("mymemory"),
        }
    }
}

fn default_timeout_seconds() -> u64 {
    10
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    #[serde(default)]
    pub provider: GatewayProvider,
    /// Google API key; unused by MyMemory
    #[serde(default)]
    pub api_key: String,
    /// Overrides the provider's default endpoint
    #[serde(default)]
    pub api_url: Option<String>,
    /// MyMemory contact address, raises the anonymous quota
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            provider: GatewayProvider::default(),
            api_key: String::new(),
            api_url: None,
            email: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub(crate) fn apply_env(&mut self, lookup: &impl Fn(&str) -> Option<String>) {
        self.provider = env_or(lookup, "TOLK_PROVIDER", self.provider);
        if let Some(key) = lookup("TOLK_API_KEY") {
            self.api_key = key;
        }
        if let Some(url) = lookup("TOLK_API_URL").filter(|u| !u.is_empty()) {
            self.api_url = Some(url);
        }
        if let Some(email) = lookup("TOLK_EMAIL").filter(|e| !e.is_empty()) {
            self.email = Some(email);
        }
        self.timeout_seconds = env_or(lookup, "TOLK_TIMEOUT_SECONDS", self.timeout_seconds);
    }
}
