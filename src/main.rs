mod calc;
mod ipc;
mod logging;
mod notice;
mod rows;

use std::io::{self, BufRead, Write};

use anyhow::Context;
use serde_json::json;

fn write_line(out: &mut impl Write, value: &serde_json::Value) -> anyhow::Result<()> {
    let text = serde_json::to_string(value).unwrap_or_else(|_| "{\"ok\":false}".to_string());
    writeln!(out, "{text}").context("write response")?;
    out.flush().context("flush response")?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let log_cfg = logging::LogConfig::from_env();
    if let Err(e) = logging::init_tracing(&log_cfg) {
        // Stdout is reserved for responses.
        eprintln!("gradecalcd: logging disabled: {e}");
    }

    let mut state = ipc::AppState::default();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "gradecalcd ready");

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(error = %e, "failed to read request line; shutting down");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply without id.
                tracing::warn!(error = %e, "malformed request");
                write_line(
                    &mut stdout,
                    &json!({
                        "ok": false,
                        "error": { "code": "bad_json", "message": e.to_string() }
                    }),
                )?;
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        write_line(&mut stdout, &resp)?;
    }

    Ok(())
}
