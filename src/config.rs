use std::{fs, path::Path};

use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG: &str = r#"server_host = "127.0.0.1"
server_port = 3000

# Object store connection
endpoint = ""
endpoint_port = 443
use_ssl = true
access_key = ""
secret_key = ""
region = "us-east-1"
bucket = "videos"

# Seconds between background catalog refreshes
refresh_interval_secs = 300

# Optional: write a JSON snapshot of the catalog after each refresh
# snapshot_path = "media-files.json"
"#;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub endpoint: String,
    #[serde(default = "default_endpoint_port")]
    pub endpoint_port: u16,
    #[serde(default = "default_use_ssl")]
    pub use_ssl: bool,
    pub access_key: String,
    pub secret_key: String,
    #[serde(default = "default_region")]
    pub region: String,
    pub bucket: String,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    #[serde(default)]
    pub snapshot_path: Option<String>,
}

fn default_endpoint_port() -> u16 {
    443
}

fn default_use_ssl() -> bool {
    true
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_refresh_interval() -> u64 {
    300
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let path = Path::new("config.toml");

        if !path.exists() {
            fs::write(path, DEFAULT_CONFIG)
                .map_err(|e| AppError::Config(format!("cannot write default config.toml: {}", e)))?;
            tracing::info!("Created default config.toml");
        }

        let config_str = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read config.toml: {}", e)))?;

        let config: Config =
            toml::from_str(&config_str).map_err(|e| AppError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Required store connection fields must be present before the server
    /// starts; a gateway without them would serve an empty catalog forever.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("endpoint", &self.endpoint),
            ("access_key", &self.access_key),
            ("secret_key", &self.secret_key),
            ("bucket", &self.bucket),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Config(format!("missing required field `{}`", field)));
            }
        }
        Ok(())
    }

    /// Full endpoint URL for the store client.
    pub fn store_url(&self) -> String {
        let scheme = if self.use_ssl { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.endpoint, self.endpoint_port)
    }

    /// Public link to an object, with the port segment omitted when it is
    /// the protocol default.
    pub fn public_object_url(&self, key: &str) -> String {
        let (scheme, default_port) = if self.use_ssl {
            ("https", 443)
        } else {
            ("http", 80)
        };

        let port_segment = if self.endpoint_port == default_port {
            String::new()
        } else {
            format!(":{}", self.endpoint_port)
        };

        format!("{}://{}{}/{}", scheme, self.endpoint, port_segment, key)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
