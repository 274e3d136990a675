use promptcell_core::{Config, Paths};
use promptcell_kernel::DisplayShim;
use promptcell_transport::{create_transport, ChatTransport};
use tracing::debug;

/// Send one prompt through the configured transport and print the reply.
pub async fn run(message: &str, endpoint: Option<&str>) -> anyhow::Result<()> {
    let paths = Paths::new();
    let mut config = Config::load_or_default(&paths)?;
    config.transport.endpoint = config.endpoint_with_override(endpoint);

    let transport = create_transport(&config).await?;
    debug!(transport = transport.name(), "sending prompt");

    let shim = DisplayShim::new(transport);
    let bundle = shim.execute(message).await?;
    if let Some(text) = bundle.get("text/plain").and_then(|v| v.as_str()) {
        println!("{}", text);
    }
    Ok(())
}
