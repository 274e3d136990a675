use promptcell_core::kernelspec::DEFAULT_SPEC_NAME;
use promptcell_core::protocol::ExecuteRequest;
use promptcell_core::{Config, ExecuteReply, IopubContent, MessageHeader, Paths};
use promptcell_federation::{
    AmbientRegistry, FederationContainer, HostContext, SharedEntry, SharedModule, SharedScope,
    KERNEL_SPECS, MODULE_INDEX,
};
use promptcell_kernel::{Kernel, KernelOptions, KernelSpecRegistry};
use std::sync::Arc;
use tokio::sync::mpsc;

struct DemoHost;

impl HostContext for DemoHost {
    fn kernel_specs(&self) -> Option<Arc<KernelSpecRegistry>> {
        None
    }
}

/// 单进程里走一遍完整的发现流程：init → get → load → activate →
/// create → execute，把每一步和最终的消息打出来。
pub async fn run(prompt: &str, endpoint: Option<&str>) -> anyhow::Result<()> {
    let paths = Paths::new();
    let config = Config::load_or_default(&paths)?;
    let endpoint = config.endpoint_with_override(endpoint);

    println!("promptcell demo");
    println!("===============");
    println!();

    // Host side: a kernel-spec registry exposed through the shared scope.
    let registry = Arc::new(KernelSpecRegistry::new());
    let mut scope = SharedScope::new();
    scope.insert(
        KERNEL_SPECS,
        "1.0.0",
        SharedEntry::ready(registry.clone() as SharedModule),
    );

    let container = FederationContainer::with_ambient(Arc::new(AmbientRegistry::new()));
    container.init(Arc::new(scope)).await;
    println!("1. container initialized");

    let exports = container.get(MODULE_INDEX)?.load().await?;
    println!(
        "2. module \"{}\" loaded, {} plugin(s)",
        MODULE_INDEX,
        exports.default.len()
    );

    for plugin in &exports.default {
        plugin.activate(&DemoHost, &exports.resolved).await?;
        println!("3. plugin {} activated", plugin.id);
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let kernel = registry
        .create(
            DEFAULT_SPEC_NAME,
            KernelOptions {
                endpoint: Some(endpoint.clone()),
                iopub: Some(tx),
            },
        )
        .await?;
    println!(
        "4. kernel \"{}\" created, endpoint {}",
        DEFAULT_SPEC_NAME, endpoint
    );
    println!();

    println!("> {}", prompt);
    let parent = MessageHeader::new("execute_request");
    let reply = kernel.execute(ExecuteRequest::new(prompt), parent).await;

    while let Ok(msg) = rx.try_recv() {
        match msg.content {
            IopubContent::ExecuteResult {
                execution_count,
                data,
                ..
            } => {
                let text = data
                    .get("text/plain")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                println!("[{}] {}", execution_count, text);
            }
            IopubContent::Error(err) => {
                println!("{}: {}", err.ename, err.evalue);
            }
        }
    }

    println!();
    match &reply {
        ExecuteReply::Ok {
            execution_count, ..
        } => println!("execute_reply: ok (execution_count {})", execution_count),
        ExecuteReply::Error { ename, evalue, .. } => {
            println!("execute_reply: error ({}: {})", ename, evalue)
        }
    }

    Ok(())
}
