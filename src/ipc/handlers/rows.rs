use crate::calc::sanitize_digits;
use crate::ipc::error::{err, ok, user_err};
use crate::ipc::handlers::grade::display_json;
use crate::ipc::types::{AppState, Request};
use crate::rows::{placeholder_label, EntryEdit, RowSet, RowSetError, MAX_ROWS};
use serde_json::json;

pub(crate) struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

/// Reads a score/weight field from params.
///
/// Absent means "leave unchanged" (`None`), `null` clears the field, strings
/// are taken as typed and numbers are rendered back to text so that the
/// evaluator sees exactly what was sent.
pub(crate) fn field_text(
    params: &serde_json::Value,
    key: &str,
) -> Result<Option<Option<String>>, HandlerErr> {
    match params.get(key) {
        None => Ok(None),
        Some(serde_json::Value::Null) => Ok(Some(None)),
        Some(serde_json::Value::String(s)) => Ok(Some(Some(s.clone()))),
        Some(serde_json::Value::Number(n)) => Ok(Some(Some(n.to_string()))),
        Some(other) => Err(HandlerErr {
            code: "bad_params",
            message: format!("{key} must be a string, number or null"),
            details: Some(json!({ key: other })),
        }),
    }
}

fn parse_index(params: &serde_json::Value) -> Result<usize, HandlerErr> {
    params
        .get("index")
        .and_then(|v| v.as_u64())
        .map(|v| v as usize)
        .ok_or_else(|| HandlerErr {
            code: "bad_params",
            message: "missing or invalid index".to_string(),
            details: params.get("index").map(|v| json!({ "index": v })),
        })
}

fn filtered(field: Option<Option<String>>) -> Option<Option<String>> {
    field.map(|v| {
        v.map(|s| sanitize_digits(&s))
            .filter(|s| !s.is_empty())
    })
}

pub(crate) fn rows_json(rows: &RowSet) -> serde_json::Value {
    let items: Vec<serde_json::Value> = rows
        .entries()
        .iter()
        .enumerate()
        .map(|(i, e)| {
            json!({
                "index": i,
                "id": e.id,
                "label": e.label,
                "score": e.score,
                "weight": e.weight,
                "placeholder": placeholder_label(i),
                "removable": i != 0,
            })
        })
        .collect();
    json!({
        "rows": items,
        "rowCount": rows.len(),
        "maxRows": MAX_ROWS,
    })
}

fn row_set_err(state: &mut AppState, id: &str, e: RowSetError) -> serde_json::Value {
    match e {
        RowSetError::IndexOutOfRange { index, len } => err(
            id,
            e.code(),
            e.to_string(),
            Some(json!({ "index": index, "rowCount": len })),
        ),
        RowSetError::CapacityExceeded => user_err(
            &mut state.notice,
            id,
            e.code(),
            e.to_string(),
            Some(json!({ "maxRows": MAX_ROWS })),
        ),
        RowSetError::ProtectedRow => user_err(
            &mut state.notice,
            id,
            e.code(),
            e.to_string(),
            Some(json!({ "index": 0 })),
        ),
    }
}

fn handle_rows_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, rows_json(&state.rows))
}

fn handle_rows_add(state: &mut AppState, req: &Request) -> serde_json::Value {
    match state.rows.add_entry() {
        Ok(entry) => {
            tracing::debug!(entry_id = %entry.id, "row added");
            ok(&req.id, rows_json(&state.rows))
        }
        Err(e) => row_set_err(state, &req.id, e),
    }
}

fn handle_rows_remove(state: &mut AppState, req: &Request) -> serde_json::Value {
    let index = match parse_index(&req.params) {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    match state.rows.remove_entry(index) {
        Ok(entry) => {
            tracing::debug!(index, entry_id = %entry.id, "row removed");
            ok(&req.id, rows_json(&state.rows))
        }
        Err(e) => row_set_err(state, &req.id, e),
    }
}

fn handle_rows_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let index = match parse_index(&req.params) {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let label = match req.params.get("label") {
        None => None,
        Some(serde_json::Value::Null) => Some(String::new()),
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(other) => {
            return err(
                &req.id,
                "bad_params",
                "label must be a string or null",
                Some(json!({ "label": other })),
            )
        }
    };
    let score = match field_text(&req.params, "score") {
        Ok(v) => filtered(v),
        Err(e) => return e.response(&req.id),
    };
    let weight = match field_text(&req.params, "weight") {
        Ok(v) => filtered(v),
        Err(e) => return e.response(&req.id),
    };

    let edit = EntryEdit {
        label,
        score,
        weight,
    };
    match state.rows.update_entry(index, edit) {
        Ok(_) => ok(&req.id, rows_json(&state.rows)),
        Err(e) => row_set_err(state, &req.id, e),
    }
}

fn handle_rows_clear(state: &mut AppState, req: &Request) -> serde_json::Value {
    state.rows.clear();
    state.report = None;
    let mut result = rows_json(&state.rows);
    result["display"] = display_json(state.report.as_ref());
    ok(&req.id, result)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "rows.list" => Some(handle_rows_list(state, req)),
        "rows.add" => Some(handle_rows_add(state, req)),
        "rows.remove" => Some(handle_rows_remove(state, req)),
        "rows.update" => Some(handle_rows_update(state, req)),
        "rows.clear" => Some(handle_rows_clear(state, req)),
        _ => None,
    }
}
