use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::notice::DismissVia;
use serde_json::json;

fn notice_json(state: &AppState) -> serde_json::Value {
    json!({
        "visible": state.notice.is_visible(),
        "message": state.notice.message(),
    })
}

fn handle_notice_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, notice_json(state))
}

fn handle_notice_dismiss(state: &mut AppState, req: &Request) -> serde_json::Value {
    let via = req
        .params
        .get("via")
        .and_then(|v| v.as_str())
        .unwrap_or("close");
    let Some(via) = DismissVia::parse(via) else {
        return err(
            &req.id,
            "bad_params",
            "via must be one of: close, backdrop, escape",
            Some(json!({ "via": via })),
        );
    };
    let dismissed = state.notice.dismiss(via);
    let mut result = notice_json(state);
    result["dismissed"] = json!(dismissed);
    ok(&req.id, result)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "notice.get" => Some(handle_notice_get(state, req)),
        "notice.dismiss" => Some(handle_notice_dismiss(state, req)),
        _ => None,
    }
}
