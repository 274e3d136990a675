use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::protocol::{ErrorContent, MimeBundle, PROTOCOL_VERSION};

/// 消息头：id / 会话 / 类型 / 协议版本。iopub 消息通过 parent_header
/// 与触发它的请求关联。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageHeader {
    pub msg_id: String,
    pub session: String,
    pub username: String,
    pub date: DateTime<Utc>,
    pub msg_type: String,
    pub version: String,
}

impl MessageHeader {
    pub fn new(msg_type: &str) -> Self {
        Self {
            msg_id: Uuid::new_v4().to_string(),
            session: Uuid::new_v4().to_string(),
            username: "kernel".to_string(),
            date: Utc::now(),
            msg_type: msg_type.to_string(),
            version: PROTOCOL_VERSION.to_string(),
        }
    }

    /// New header in the same session, for messages answering `parent`.
    pub fn child_of(parent: &MessageHeader, msg_type: &str) -> Self {
        Self {
            msg_id: Uuid::new_v4().to_string(),
            session: parent.session.clone(),
            username: parent.username.clone(),
            date: Utc::now(),
            msg_type: msg_type.to_string(),
            version: PROTOCOL_VERSION.to_string(),
        }
    }
}

/// A message published on the broadcast stream while handling a request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IopubMessage {
    pub header: MessageHeader,
    pub parent_header: MessageHeader,
    pub content: IopubContent,
}

/// Content variants; the discriminant travels in `header.msg_type`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum IopubContent {
    ExecuteResult {
        execution_count: u64,
        data: MimeBundle,
        metadata: serde_json::Map<String, serde_json::Value>,
    },
    Error(ErrorContent),
}

impl IopubMessage {
    pub fn execute_result(parent: &MessageHeader, execution_count: u64, data: MimeBundle) -> Self {
        Self {
            header: MessageHeader::child_of(parent, "execute_result"),
            parent_header: parent.clone(),
            content: IopubContent::ExecuteResult {
                execution_count,
                data,
                metadata: serde_json::Map::new(),
            },
        }
    }

    pub fn error(parent: &MessageHeader, content: ErrorContent) -> Self {
        Self {
            header: MessageHeader::child_of(parent, "error"),
            parent_header: parent.clone(),
            content: IopubContent::Error(content),
        }
    }
}
