use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// stdio JSON-RPC 测试替身：chat/send 回一条固定格式的 echo。stdout 上
/// 只有协议行，其余输出全走 stderr。
pub async fn run() -> anyhow::Result<()> {
    eprintln!("Mock agent started");

    let stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(stdin).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(line) {
            Ok(request) => respond(&request),
            Err(e) => json!({
                "jsonrpc": "2.0",
                "id": null,
                "error": { "code": -32700, "message": "Parse error", "data": e.to_string() }
            }),
        };

        let mut out = serde_json::to_string(&response)?;
        out.push('\n');
        stdout.write_all(out.as_bytes()).await?;
        stdout.flush().await?;
    }

    Ok(())
}

fn respond(request: &Value) -> Value {
    let id = request.get("id").cloned().unwrap_or(Value::Null);
    let method = request
        .get("method")
        .and_then(|m| m.as_str())
        .unwrap_or_default();

    match method {
        "chat/send" => {
            let message = request
                .pointer("/params/message")
                .and_then(|m| m.as_str())
                .unwrap_or_default();
            json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "text": format!(
                        "Mock agent received: '{}'\nThis is a test response from the mock agent.",
                        message
                    )
                }
            })
        }
        "initialize" => json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": {
                "capabilities": { "chat": true },
                "serverInfo": { "name": "mock-agent", "version": env!("CARGO_PKG_VERSION") }
            }
        }),
        other => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": -32601, "message": format!("Method not found: {}", other) }
        }),
    }
}
