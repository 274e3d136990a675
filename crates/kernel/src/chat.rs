use async_trait::async_trait;
use promptcell_core::kernelspec;
use promptcell_core::protocol::{
    CommClose, CommInfoReply, CommInfoRequest, CommMsg, CommOpen, CompleteReply, CompleteRequest,
    ErrorContent, ExecuteReply, ExecuteRequest, HistoryReply, InputReply, InspectReply,
    InspectRequest, IsCompleteReply, IsCompleteRequest, IsCompleteStatus, KernelInfoReply,
    MimeBundle, ReplyStatus, ShutdownReply, ShutdownRequest,
};
use promptcell_core::{IopubMessage, MessageHeader};
use promptcell_transport::{ChatTransport, HttpChatTransport};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::Kernel;

/// ename carried by every failed execute; the evalue holds the cause.
const EXECUTE_ENAME: &str = "Error";

/// 把 cell 当作 prompt 转发给聊天后端的内核。
/// 不在本地执行任何代码；每个 execute 对应一次网络交换。
pub struct ChatKernel {
    transport: Box<dyn ChatTransport>,
    execution_count: AtomicU64,
    iopub: Option<UnboundedSender<IopubMessage>>,
}

impl ChatKernel {
    pub fn new(
        transport: Box<dyn ChatTransport>,
        iopub: Option<UnboundedSender<IopubMessage>>,
    ) -> Self {
        Self {
            transport,
            execution_count: AtomicU64::new(0),
            iopub,
        }
    }

    /// 使用默认 HTTP 传输的内核；endpoint 为 None 时走内置默认地址。
    pub fn from_endpoint(
        endpoint: Option<&str>,
        iopub: Option<UnboundedSender<IopubMessage>>,
    ) -> Self {
        Self::new(Box::new(HttpChatTransport::from_options(endpoint)), iopub)
    }

    fn publish(&self, message: IopubMessage) {
        match &self.iopub {
            // A dropped receiver means the host went away; nothing to do.
            Some(tx) => {
                let _ = tx.send(message);
            }
            None => debug!("no iopub sink attached, dropping published message"),
        }
    }
}

#[async_trait]
impl Kernel for ChatKernel {
    fn execution_count(&self) -> u64 {
        self.execution_count.load(Ordering::SeqCst)
    }

    async fn execute(&self, request: ExecuteRequest, parent: MessageHeader) -> ExecuteReply {
        // 计数在网络交换之前递增：失败的 execute 同样占一个序号。
        // 单次原子步进，挂起点之前完成，交错请求不会撞号。
        let count = self.execution_count.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(execution_count = count, "execute request accepted");

        match self.transport.send(&request.code).await {
            Ok(reply) => {
                self.publish(IopubMessage::execute_result(
                    &parent,
                    count,
                    MimeBundle::text_plain(&reply),
                ));
                ExecuteReply::ok(count)
            }
            Err(e) => {
                warn!(execution_count = count, error = %e, "prompt exchange failed");
                let content = ErrorContent::new(EXECUTE_ENAME, &e.to_string());
                self.publish(IopubMessage::error(&parent, content.clone()));
                ExecuteReply::error(count, content)
            }
        }
    }

    fn kernel_info(&self) -> KernelInfoReply {
        kernelspec::kernel_info()
    }

    fn complete(&self, request: CompleteRequest) -> CompleteReply {
        let pos = request.cursor_pos.unwrap_or(0);
        CompleteReply {
            status: ReplyStatus::Ok,
            matches: Vec::new(),
            cursor_start: pos,
            cursor_end: pos,
            metadata: serde_json::Map::new(),
        }
    }

    fn inspect(&self, _request: InspectRequest) -> InspectReply {
        InspectReply {
            status: ReplyStatus::Ok,
            found: false,
            data: MimeBundle::default(),
            metadata: serde_json::Map::new(),
        }
    }

    fn is_complete(&self, _request: IsCompleteRequest) -> IsCompleteReply {
        IsCompleteReply {
            status: IsCompleteStatus::Complete,
            indent: String::new(),
        }
    }

    fn comm_info(&self, _request: CommInfoRequest) -> CommInfoReply {
        CommInfoReply {
            status: ReplyStatus::Ok,
            comms: serde_json::Map::new(),
        }
    }

    fn history(&self) -> HistoryReply {
        HistoryReply {
            status: ReplyStatus::Ok,
            history: Vec::new(),
        }
    }

    fn shutdown(&self, _request: ShutdownRequest) -> ShutdownReply {
        ShutdownReply {
            status: ReplyStatus::Ok,
            restart: false,
        }
    }

    fn input_reply(&self, _reply: InputReply) {}

    fn comm_open(&self, _comm: CommOpen) {}

    fn comm_msg(&self, _comm: CommMsg) {}

    fn comm_close(&self, _comm: CommClose) {}
}
