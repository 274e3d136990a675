use async_trait::async_trait;
use promptcell_core::{Error, Result};
use serde_json::Value;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::ChatTransport;

/// Agent 子进程传输：通过 stdin/stdout 行分隔 JSON-RPC 2.0 通信。
/// 每个 prompt 对应一次 `chat/send` 调用，按 id 匹配应答。
pub struct AgentProcessTransport {
    command: String,
    inner: Mutex<AgentProcess>,
}

impl std::fmt::Debug for AgentProcessTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentProcessTransport")
            .field("command", &self.command)
            .finish_non_exhaustive()
    }
}

struct AgentProcess {
    // Held so the child lives as long as the transport; kill_on_drop
    // handles shutdown.
    _child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    next_id: u64,
}

impl AgentProcessTransport {
    pub async fn spawn(command: &str, args: &[String]) -> Result<Self> {
        info!(command = %command, "spawning agent process");

        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::Transport(format!("failed to spawn agent '{}': {}", command, e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Transport("agent stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .map(BufReader::new)
            .ok_or_else(|| Error::Transport("agent stdout unavailable".to_string()))?;

        Ok(Self {
            command: command.to_string(),
            inner: Mutex::new(AgentProcess {
                _child: child,
                stdin,
                stdout,
                next_id: 1,
            }),
        })
    }
}

#[async_trait]
impl ChatTransport for AgentProcessTransport {
    fn name(&self) -> &str {
        "agent"
    }

    fn describe(&self) -> String {
        self.command.clone()
    }

    async fn send(&self, prompt: &str) -> Result<String> {
        // 协议是严格的请求/应答，同一时间只允许一笔在途交换
        let mut agent = self.inner.lock().await;

        let id = agent.next_id;
        agent.next_id += 1;

        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "chat/send",
            "params": { "message": prompt },
        });
        let mut line = serde_json::to_string(&request)?;
        line.push('\n');

        debug!(id = id, "sending chat/send to agent");
        agent
            .stdin
            .write_all(line.as_bytes())
            .await
            .map_err(|e| Error::Transport(format!("agent stdin closed: {}", e)))?;
        agent
            .stdin
            .flush()
            .await
            .map_err(|e| Error::Transport(format!("agent stdin closed: {}", e)))?;

        let mut buf = String::new();
        loop {
            buf.clear();
            let n = agent
                .stdout
                .read_line(&mut buf)
                .await
                .map_err(|e| Error::Transport(format!("agent stdout read failed: {}", e)))?;
            if n == 0 {
                return Err(Error::Transport("agent closed stdout".to_string()));
            }

            let trimmed = buf.trim();
            if trimmed.is_empty() {
                continue;
            }
            // Non-JSON lines are agent chatter, not protocol traffic.
            let message: Value = match serde_json::from_str(trimmed) {
                Ok(v) => v,
                Err(_) => {
                    debug!(line = %trimmed, "skipping non-JSON agent output");
                    continue;
                }
            };
            if message.get("id").and_then(Value::as_u64) != Some(id) {
                continue;
            }

            if let Some(err) = message.get("error") {
                let error = err
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("agent error")
                    .to_string();
                let detail = err.get("data").map(|d| match d.as_str() {
                    Some(s) => s.to_string(),
                    None => d.to_string(),
                });
                warn!(id = id, error = %error, "agent returned an error");
                return Err(Error::Remote { error, detail });
            }

            let result = message.get("result").cloned().unwrap_or(Value::Null);
            let reply = match result.get("text").and_then(Value::as_str) {
                Some(text) => text.to_string(),
                // Agents may return structured results; dump them as-is.
                None => serde_json::to_string(&result)?,
            };
            debug!(id = id, reply_len = reply.len(), "agent reply received");
            return Ok(reply);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn spawn_sh(script: &str) -> AgentProcessTransport {
        AgentProcessTransport::spawn("sh", &["-c".to_string(), script.to_string()])
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_send_and_receive() {
        let script =
            r#"read line; printf '{"jsonrpc":"2.0","id":1,"result":{"text":"pong"}}\n'"#;
        let transport = spawn_sh(script).await;
        let reply = transport.send("ping").await.unwrap();
        assert_eq!(reply, "pong");
    }

    #[tokio::test]
    async fn test_chatter_lines_are_skipped() {
        let script = r#"read line; echo "agent booting"; printf '{"jsonrpc":"2.0","id":1,"result":{"text":"ready"}}\n'"#;
        let transport = spawn_sh(script).await;
        let reply = transport.send("hello").await.unwrap();
        assert_eq!(reply, "ready");
    }

    #[tokio::test]
    async fn test_rpc_error_maps_to_remote() {
        let script = r#"read line; printf '{"jsonrpc":"2.0","id":1,"error":{"code":-32601,"message":"Method not found"}}\n'"#;
        let transport = spawn_sh(script).await;
        let err = transport.send("hello").await.unwrap_err();
        match err {
            Error::Remote { error, detail } => {
                assert_eq!(error, "Method not found");
                assert!(detail.is_none());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_structured_result_is_dumped() {
        let script =
            r#"read line; printf '{"jsonrpc":"2.0","id":1,"result":{"items":[1,2]}}\n'"#;
        let transport = spawn_sh(script).await;
        let reply = transport.send("list").await.unwrap();
        assert_eq!(reply, r#"{"items":[1,2]}"#);
    }

    #[tokio::test]
    async fn test_agent_exit_maps_to_transport_error() {
        let script = "read line; exit 0";
        let transport = spawn_sh(script).await;
        let err = transport.send("hello").await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[tokio::test]
    async fn test_spawn_missing_binary() {
        let err = AgentProcessTransport::spawn("definitely-not-a-real-binary", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }
}
