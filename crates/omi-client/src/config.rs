use std::path::Path;
use std::time::Duration;

use omi_crypto::SigningKey;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Connection and signing settings for an [`OmiClient`](crate::OmiClient).
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the ledger REST API.
    pub rest_url: String,
    /// Hex-encoded 32-byte secp256k1 secret used for every write.
    pub private_key: String,
    /// Page size requested by listing cursors.
    pub cursor_count: usize,
    pub request_timeout_secs: u64,
    /// Pause between status checks while a batch is pending.
    pub poll_interval_ms: u64,
    /// Overall bound for waiting on a commit.
    pub wait_timeout_secs: u64,
    /// Server-side wait hint for a single status check.
    pub check_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rest_url: "http://localhost:8080".into(),
            private_key: String::new(),
            cursor_count: 100,
            request_timeout_secs: 30,
            poll_interval_ms: 1000,
            wait_timeout_secs: 30,
            check_timeout_secs: 5,
        }
    }
}

impl ClientConfig {
    pub fn new(rest_url: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            rest_url: rest_url.into(),
            private_key: private_key.into(),
            ..Default::default()
        }
    }

    pub fn from_toml_str(s: &str) -> ClientResult<Self> {
        toml::from_str(s).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Load from a TOML file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> ClientResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// `rest_url` without trailing slashes.
    pub fn base_url(&self) -> &str {
        self.rest_url.trim_end_matches('/')
    }

    /// Parse the configured private key.
    pub fn signing_key(&self) -> ClientResult<SigningKey> {
        if self.private_key.trim().is_empty() {
            return Err(ClientError::Config("no private key configured".into()));
        }
        Ok(SigningKey::from_hex(&self.private_key)?)
    }

    pub fn validate(&self) -> ClientResult<()> {
        if self.base_url().is_empty() {
            return Err(ClientError::Config("rest_url is empty".into()));
        }
        if self.cursor_count == 0 {
            return Err(ClientError::Config("cursor_count must be positive".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout_secs)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("rest_url", &self.rest_url)
            .field("private_key", &"<redacted>")
            .field("cursor_count", &self.cursor_count)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("wait_timeout_secs", &self.wait_timeout_secs)
            .field("check_timeout_secs", &self.check_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let c = ClientConfig::default();
        assert_eq!(c.base_url(), "http://localhost:8080");
        assert_eq!(c.cursor_count, 100);
        assert_eq!(c.wait_timeout(), Duration::from_secs(30));
        assert_eq!(c.check_timeout(), Duration::from_secs(5));
        assert_eq!(c.poll_interval(), Duration::from_secs(1));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn trailing_slashes_stripped() {
        let c = ClientConfig::new("http://ledger:8008//", "");
        assert_eq!(c.base_url(), "http://ledger:8008");
    }

    #[test]
    fn toml_partial_overrides() {
        let c = ClientConfig::from_toml_str(
            r#"
            rest_url = "http://ledger:8008"
            cursor_count = 25
            "#,
        )
        .unwrap();
        assert_eq!(c.rest_url, "http://ledger:8008");
        assert_eq!(c.cursor_count, 25);
        assert_eq!(c.request_timeout_secs, 30);
    }

    #[test]
    fn toml_type_error_is_config_error() {
        let err = ClientConfig::from_toml_str("cursor_count = \"many\"").unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "rest_url = \"http://10.0.0.1:8008\"").unwrap();
        writeln!(file, "wait_timeout_secs = 90").unwrap();
        let c = ClientConfig::load(file.path()).unwrap();
        assert_eq!(c.base_url(), "http://10.0.0.1:8008");
        assert_eq!(c.wait_timeout(), Duration::from_secs(90));
    }

    #[test]
    fn signing_key_errors() {
        let missing = ClientConfig::default().signing_key().unwrap_err();
        assert!(matches!(missing, ClientError::Config(_)));
        let malformed = ClientConfig::new("http://x", "not-hex").signing_key().unwrap_err();
        assert!(matches!(malformed, ClientError::Signing(_)));
        let key = SigningKey::generate();
        let ok = ClientConfig::new("http://x", key.to_hex()).signing_key().unwrap();
        assert_eq!(ok.public_key(), key.public_key());
    }

    #[test]
    fn zero_cursor_count_invalid() {
        let c = ClientConfig {
            cursor_count: 0,
            ..Default::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn debug_redacts_key() {
        let c = ClientConfig::new("http://x", "deadbeef");
        let debug = format!("{c:?}");
        assert!(!debug.contains("deadbeef"));
        assert!(debug.contains("redacted"));
    }
}
