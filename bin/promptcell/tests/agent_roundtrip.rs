//! End-to-end exchange against the binary's own mock-agent subcommand.

use promptcell_core::Config;
use promptcell_transport::{create_transport, AgentProcessTransport, ChatTransport};

fn mock_agent_config() -> Config {
    let mut config = Config::default();
    config.transport.kind = "agent".to_string();
    config.transport.agent.command = env!("CARGO_BIN_EXE_promptcell").to_string();
    config.transport.agent.args = vec!["mock-agent".to_string()];
    config
}

#[tokio::test]
async fn test_agent_roundtrip_through_binary() {
    let transport = AgentProcessTransport::spawn(
        env!("CARGO_BIN_EXE_promptcell"),
        &["mock-agent".to_string()],
    )
    .await
    .unwrap();

    let reply = transport.send("hello agent").await.unwrap();
    assert!(reply.contains("Mock agent received: 'hello agent'"));

    // Sequential requests keep their ids matched.
    let reply2 = transport.send("second prompt").await.unwrap();
    assert!(reply2.contains("second prompt"));
}

#[tokio::test]
async fn test_factory_builds_agent_transport_from_config() {
    let config = mock_agent_config();
    let transport = create_transport(&config).await.unwrap();
    assert_eq!(transport.name(), "agent");

    let reply = transport.send("via factory").await.unwrap();
    assert!(reply.contains("via factory"));
}
