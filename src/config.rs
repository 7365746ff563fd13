use std::net::SocketAddr;
use std::time::Duration;

use crate::error::ConfigError;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Listen address
    pub bind_addr: String,
    /// Listen port
    pub port: u16,
    /// Where accepted uploads are kept
    pub upload_dir: String,
    /// Where a copy of every export is kept
    pub export_dir: String,
    /// TOML form templates
    pub template_dir: String,
    /// Upload body limit in bytes
    pub max_upload_bytes: usize,
    /// Title written into exported DOCX files
    pub export_title: String,
    /// Debug-level logging
    pub verbose_logging: bool,
    /// Seconds a form session may sit idle before it is dropped
    pub session_idle_secs: u64,
    /// Upper bound on live form sessions; the least recently used is evicted
    pub max_sessions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 5000,
            upload_dir: "uploads".to_string(),
            export_dir: "exports".to_string(),
            template_dir: "form_templates".to_string(),
            max_upload_bytes: 20 * 1024 * 1024,
            export_title: "Documento Editado".to_string(),
            verbose_logging: false,
            session_idle_secs: 60 * 60,
            max_sessions: 1000,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unparsable values keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(default.bind_addr),
            port: lookup("PORT").and_then(|v| v.parse().ok()).unwrap_or(default.port),
            upload_dir: lookup("UPLOAD_DIR").unwrap_or(default.upload_dir),
            export_dir: lookup("EXPORT_DIR").unwrap_or(default.export_dir),
            template_dir: lookup("FORM_TEMPLATE_DIR").unwrap_or(default.template_dir),
            max_upload_bytes: lookup("MAX_UPLOAD_BYTES").and_then(|v| v.parse().ok()).unwrap_or(default.max_upload_bytes),
            export_title: lookup("EXPORT_TITLE").unwrap_or(default.export_title),
            verbose_logging: lookup("VERBOSE_LOGGING").and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            session_idle_secs: lookup("SESSION_IDLE_SECS").and_then(|v| v.parse().ok()).unwrap_or(default.session_idle_secs),
            max_sessions: lookup("MAX_SESSIONS")
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(default.max_sessions),
        }
    }

    /// `bind_addr:port`
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Parses `bind_addr:port` into a socket address
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let value = self.listen_address();
        value
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress { value })
    }

    pub fn session_idle_ttl(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }
}
