//! Line-delimited stdio transport
//!
//! Reads one JSON-RPC message per line and writes one response per line.
//! Requests are handled one at a time, in arrival order. Stdout carries only
//! protocol frames; logging goes to stderr.

use crate::errors::Result;
use crate::server::protocol::ProtocolHandler;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, trace};

/// Serve until `reader` reaches EOF; returns the number of responses written
pub async fn serve<R, W>(handler: &ProtocolHandler, mut reader: R, mut writer: W) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();
    let mut responses = 0;

    loop {
        line.clear();
        let read = reader.read_line(&mut line).await?;
        if read == 0 {
            debug!("Transport reached EOF");
            break;
        }

        let frame = line.trim();
        if frame.is_empty() {
            continue;
        }
        trace!(frame, "Frame received");

        if let Some(response) = handler.handle_line(frame) {
            let encoded = serde_json::to_string(&response)?;
            writer.write_all(encoded.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
            responses += 1;
        }
    }

    Ok(responses)
}

/// Serve over the process's stdin/stdout
pub async fn serve_stdio(handler: &ProtocolHandler) -> Result<()> {
    info!(
        tools = handler.runtime().tool_names().len(),
        "Serving JSON-RPC over stdio"
    );
    let reader = BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();
    let responses = serve(handler, reader, writer).await?;
    info!(responses, "Stdio session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PersonaCatalog, PersonaRecord, RuleCatalog, SkillCatalog};
    use crate::engine::RetrievalEngine;
    use crate::server::protocol::ServerInfo;
    use crate::session::SessionState;
    use crate::tools::ToolRuntime;
    use crate::types::ModuleName;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn handler() -> ProtocolHandler {
        let persona = PersonaRecord::new("p1", "Ann")
            .with_module(ModuleName::Health, json!({"insurance": "none"}));
        let engine = RetrievalEngine::new(
            Arc::new(PersonaCatalog::from_records(vec![persona])),
            Arc::new(SkillCatalog::default()),
            Arc::new(RuleCatalog::default()),
            Arc::new(SessionState::new()),
        );
        ProtocolHandler::new(
            ToolRuntime::new(engine),
            ServerInfo {
                name: "test".to_string(),
                version: "0.0.1".to_string(),
                instructions: String::new(),
            },
        )
    }

    #[tokio::test]
    async fn test_serve_session_in_order() {
        let call = |id: u64, name: &str, arguments: Value| {
            json!({
                "jsonrpc": "2.0",
                "id": id,
                "method": "tools/call",
                "params": {"name": name, "arguments": arguments}
            })
            .to_string()
        };
        let input = [
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#.to_string(),
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#.to_string(),
            String::new(),
            call(2, "set_active_persona", json!({"persona_id": "p1"})),
            call(3, "get_persona_modules", json!({"modules": ["health"]})),
        ]
        .join("\n")
            + "\n";

        let handler = handler();
        let mut output = Vec::new();
        let written = serve(&handler, input.as_bytes(), &mut output).await.unwrap();
        assert_eq!(written, 3);

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["id"], 1);
        assert_eq!(lines[1]["id"], 2);
        assert_eq!(lines[2]["result"]["isError"], false);
        assert_eq!(
            lines[2]["result"]["structuredContent"]["sequence_number"],
            1
        );
        assert_eq!(handler.runtime().engine().session().log_len(), 1);
    }

    #[tokio::test]
    async fn test_serve_empty_input() {
        let handler = handler();
        let mut output = Vec::new();
        let written = serve(&handler, &b""[..], &mut output).await.unwrap();
        assert_eq!(written, 0);
        assert!(output.is_empty());
    }
}
