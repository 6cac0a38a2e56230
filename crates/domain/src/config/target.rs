use serde::{Deserialize, Serialize};
use std::path::Path;

/// One AdGuard Home instance to scrape
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TargetConfig {
    /// `host:port` or a full URL
    pub address: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Value of the `server` label (default: the address)
    #[serde(default)]
    pub name: Option<String>,
}

impl TargetConfig {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.address)
    }

    /// Base URL of the appliance, `http://` assumed when no scheme is given.
    pub fn base_url(&self) -> String {
        let address = self.address.trim().trim_end_matches('/');
        if address.starts_with("http://") || address.starts_with("https://") {
            address.to_string()
        } else {
            format!("http://{}", address)
        }
    }

    /// Replaces address and credentials that name a readable file with the
    /// file's trimmed contents (Docker/Kubernetes secrets).
    pub fn resolve_secrets(mut self) -> Self {
        self.address = read_if_file(self.address);
        self.username = read_if_file(self.username);
        self.password = read_if_file(self.password);
        self
    }
}

fn read_if_file(value: String) -> String {
    if value.is_empty() || !Path::new(&value).is_file() {
        return value;
    }
    match std::fs::read_to_string(&value) {
        Ok(contents) => contents.trim().to_string(),
        Err(_) => value,
    }
}
