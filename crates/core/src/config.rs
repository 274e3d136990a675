use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::paths::Paths;

/// 传输层配置：execute 的 prompt 通过哪条通道送达后端
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportConfig {
    /// "http"（默认）或 "agent"（本地子进程，stdio JSON-RPC）
    #[serde(default = "default_transport_kind")]
    pub kind: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub agent: AgentConfig,
}

fn default_transport_kind() -> String {
    "http".to_string()
}

fn default_endpoint() -> String {
    "http://localhost:8000/chat".to_string()
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            kind: default_transport_kind(),
            endpoint: default_endpoint(),
            agent: AgentConfig::default(),
        }
    }
}

/// Agent 子进程配置。command 为空时 agent 传输不可用。
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KernelConfig {
    #[serde(default = "default_spec_name")]
    pub spec_name: String,
    #[serde(default = "default_display_name")]
    pub display_name: String,
}

fn default_spec_name() -> String {
    "http-chat".to_string()
}

fn default_display_name() -> String {
    "HTTP Chat (promptcell)".to_string()
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            spec_name: default_spec_name(),
            display_name: default_display_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub kernel: KernelConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn load_or_default(paths: &Paths) -> Result<Self> {
        let config_path = paths.config_file();
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Effective endpoint: CLI flag wins over the configured value.
    pub fn endpoint_with_override(&self, flag: Option<&str>) -> String {
        match flag {
            Some(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => self.transport.endpoint.clone(),
        }
    }
}
