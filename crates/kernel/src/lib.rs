pub mod chat;
pub mod registry;
pub mod shim;

use async_trait::async_trait;
use futures::future::BoxFuture;
use promptcell_core::protocol::{
    CommClose, CommInfoReply, CommInfoRequest, CommMsg, CommOpen, CompleteReply, CompleteRequest,
    ExecuteReply, ExecuteRequest, HistoryReply, InputReply, InspectReply, InspectRequest,
    IsCompleteReply, IsCompleteRequest, KernelInfoReply, ShutdownReply, ShutdownRequest,
};
use promptcell_core::{IopubMessage, MessageHeader, Result};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// 内核协议的操作面。宿主只通过这组操作驱动内核。
///
/// 除 execute 外全部是全函数：不挂起、不失败、无副作用。
#[async_trait]
pub trait Kernel: Send + Sync {
    /// Current execution counter value.
    fn execution_count(&self) -> u64;

    /// Forward the cell as a prompt. Exactly one reply and exactly one
    /// published message per call; failures become the protocol's error
    /// shapes, they never escape as Err.
    async fn execute(&self, request: ExecuteRequest, parent: MessageHeader) -> ExecuteReply;

    fn kernel_info(&self) -> KernelInfoReply;
    fn complete(&self, request: CompleteRequest) -> CompleteReply;
    fn inspect(&self, request: InspectRequest) -> InspectReply;
    fn is_complete(&self, request: IsCompleteRequest) -> IsCompleteReply;
    fn comm_info(&self, request: CommInfoRequest) -> CommInfoReply;
    fn history(&self) -> HistoryReply;
    fn shutdown(&self, request: ShutdownRequest) -> ShutdownReply;

    // Accepted no-ops.
    fn input_reply(&self, reply: InputReply);
    fn comm_open(&self, comm: CommOpen);
    fn comm_msg(&self, comm: CommMsg);
    fn comm_close(&self, comm: CommClose);
}

impl std::fmt::Debug for dyn Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kernel").finish_non_exhaustive()
    }
}

/// Options a host passes when instantiating a kernel from a registered spec.
#[derive(Default)]
pub struct KernelOptions {
    /// Chat endpoint override; absent → transport default.
    pub endpoint: Option<String>,
    /// Sink for published messages. Absent → messages are dropped.
    pub iopub: Option<UnboundedSender<IopubMessage>>,
}

/// Factory a plugin registers alongside its spec.
pub type KernelFactory =
    Arc<dyn Fn(KernelOptions) -> BoxFuture<'static, Result<Box<dyn Kernel>>> + Send + Sync>;

pub use chat::ChatKernel;
pub use registry::KernelSpecRegistry;
pub use shim::DisplayShim;
