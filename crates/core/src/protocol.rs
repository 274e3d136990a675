//! Kernel 协议的请求 / 应答内容类型。
//!
//! 字段名与线上格式一致（snake_case），宿主侧序列化后即为协议报文的
//! `content` 部分。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Protocol revision implemented by this kernel.
pub const PROTOCOL_VERSION: &str = "5.3";

/// MIME type → display payload, as published with execution results.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MimeBundle(pub HashMap<String, serde_json::Value>);

impl MimeBundle {
    pub fn text_plain(text: &str) -> Self {
        let mut data = HashMap::new();
        data.insert(
            "text/plain".to_string(),
            serde_json::Value::String(text.to_string()),
        );
        Self(data)
    }

    pub fn get(&self, mime: &str) -> Option<&serde_json::Value> {
        self.0.get(mime)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStatus {
    #[default]
    Ok,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteRequest {
    pub code: String,
    #[serde(default)]
    pub silent: bool,
    #[serde(default = "default_true")]
    pub store_history: bool,
    #[serde(default)]
    pub allow_stdin: bool,
    #[serde(default)]
    pub stop_on_error: bool,
}

fn default_true() -> bool {
    true
}

impl ExecuteRequest {
    pub fn new(code: &str) -> Self {
        Self {
            code: code.to_string(),
            silent: false,
            store_history: true,
            allow_stdin: false,
            stop_on_error: false,
        }
    }
}

/// execute_reply content. `status` discriminates the two shapes on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExecuteReply {
    Ok {
        execution_count: u64,
        payload: Vec<serde_json::Value>,
        user_expressions: serde_json::Map<String, serde_json::Value>,
    },
    Error {
        execution_count: u64,
        ename: String,
        evalue: String,
        traceback: Vec<String>,
    },
}

impl ExecuteReply {
    pub fn ok(execution_count: u64) -> Self {
        Self::Ok {
            execution_count,
            payload: Vec::new(),
            user_expressions: serde_json::Map::new(),
        }
    }

    pub fn error(execution_count: u64, content: ErrorContent) -> Self {
        Self::Error {
            execution_count,
            ename: content.ename,
            evalue: content.evalue,
            traceback: content.traceback,
        }
    }

    pub fn execution_count(&self) -> u64 {
        match self {
            Self::Ok {
                execution_count, ..
            }
            | Self::Error {
                execution_count, ..
            } => *execution_count,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}

/// Error content, shared by the error reply and the published error message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorContent {
    pub ename: String,
    pub evalue: String,
    #[serde(default)]
    pub traceback: Vec<String>,
}

impl ErrorContent {
    pub fn new(ename: &str, evalue: &str) -> Self {
        Self {
            ename: ename.to_string(),
            evalue: evalue.to_string(),
            traceback: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelInfoReply {
    pub status: ReplyStatus,
    pub protocol_version: String,
    pub implementation: String,
    pub implementation_version: String,
    pub language_info: LanguageInfo,
    pub banner: String,
    pub help_links: Vec<HelpLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LanguageInfo {
    pub name: String,
    pub version: String,
    pub mimetype: String,
    pub file_extension: String,
}

impl LanguageInfo {
    /// Cells are prose sent to a model, not runnable code; advertise markdown.
    pub fn markdown() -> Self {
        Self {
            name: "markdown".to_string(),
            version: "0.0.0".to_string(),
            mimetype: "text/markdown".to_string(),
            file_extension: ".md".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HelpLink {
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteRequest {
    pub code: String,
    #[serde(default)]
    pub cursor_pos: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompleteReply {
    pub status: ReplyStatus,
    pub matches: Vec<String>,
    pub cursor_start: u64,
    pub cursor_end: u64,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectRequest {
    pub code: String,
    #[serde(default)]
    pub cursor_pos: Option<u64>,
    #[serde(default)]
    pub detail_level: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InspectReply {
    pub status: ReplyStatus,
    pub found: bool,
    pub data: MimeBundle,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsCompleteRequest {
    pub code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IsCompleteStatus {
    Complete,
    Incomplete,
    Invalid,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IsCompleteReply {
    pub status: IsCompleteStatus,
    pub indent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CommInfoRequest {
    #[serde(default)]
    pub target_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommInfoReply {
    pub status: ReplyStatus,
    pub comms: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryReply {
    pub status: ReplyStatus,
    pub history: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ShutdownRequest {
    #[serde(default)]
    pub restart: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShutdownReply {
    pub status: ReplyStatus,
    pub restart: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputReply {
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommOpen {
    pub comm_id: String,
    pub target_name: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommMsg {
    pub comm_id: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommClose {
    pub comm_id: String,
    #[serde(default)]
    pub data: serde_json::Value,
}
