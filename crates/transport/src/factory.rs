use promptcell_core::{Config, Error, Result};
use tracing::info;

use crate::{AgentProcessTransport, ChatTransport, HttpChatTransport};

/// Build the transport selected by config. Unknown kinds are config errors.
pub async fn create_transport(config: &Config) -> Result<Box<dyn ChatTransport>> {
    match config.transport.kind.as_str() {
        "http" => {
            info!(endpoint = %config.transport.endpoint, "using HTTP chat transport");
            Ok(Box::new(HttpChatTransport::new(&config.transport.endpoint)))
        }
        "agent" => {
            let agent = &config.transport.agent;
            if agent.command.is_empty() {
                return Err(Error::Config(
                    "agent transport requires transport.agent.command".to_string(),
                ));
            }
            let transport = AgentProcessTransport::spawn(&agent.command, &agent.args).await?;
            Ok(Box::new(transport))
        }
        other => Err(Error::Config(format!("unknown transport kind: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_http_is_default_kind() {
        let config = Config::default();
        let transport = create_transport(&config).await.unwrap();
        assert_eq!(transport.name(), "http");
        assert_eq!(transport.describe(), "http://localhost:8000/chat");
    }

    #[tokio::test]
    async fn test_unknown_kind_is_config_error() {
        let mut config = Config::default();
        config.transport.kind = "carrier-pigeon".to_string();
        let err = create_transport(&config).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_agent_kind_requires_command() {
        let mut config = Config::default();
        config.transport.kind = "agent".to_string();
        let err = create_transport(&config).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
