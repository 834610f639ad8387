use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    pub cdp: CdpSettings,
    pub log_level: String,
}

/// Where the host browser's DevTools endpoint listens
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct CdpSettings {
    pub host: String,
    pub port: u16,
}

impl CdpSettings {
    /// HTTP base of the target discovery endpoint
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cdp: CdpSettings::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for CdpSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9222,
        }
    }
}
