use crate::calc::{self, GradeReport};
use crate::ipc::error::{err, ok, user_err};
use crate::ipc::handlers::rows::{field_text, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::rows::AssignmentEntry;
use serde_json::json;

/// What the UI should currently show. Before any successful calculation (and
/// after a clear) the percentage reads "0" with no grade.
pub(crate) fn display_json(report: Option<&GradeReport>) -> serde_json::Value {
    match report {
        Some(r) => json!({
            "percentage": r.percentage.to_string(),
            "grade": {
                "letter": r.classification.letter,
                "description": r.classification.description,
                "styleTag": r.classification.style_tag,
                "text": r.classification.text(),
            },
        }),
        None => json!({
            "percentage": "0",
            "grade": null,
        }),
    }
}

fn handle_grade_calculate(state: &mut AppState, req: &Request) -> serde_json::Value {
    // Snapshot first; evaluation never sees a partially edited set.
    let snapshot: Vec<AssignmentEntry> = state.rows.entries().to_vec();
    match calc::evaluate(&snapshot) {
        Ok(report) => {
            tracing::debug!(
                percentage = report.percentage,
                letter = ?report.classification.letter,
                "grade calculated"
            );
            let result = json!({
                "report": report,
                "display": display_json(Some(&report)),
            });
            state.report = Some(report);
            ok(&req.id, result)
        }
        Err(e) => user_err(
            &mut state.notice,
            &req.id,
            e.code(),
            e.to_string(),
            Some(e.details()),
        ),
    }
}

fn entries_from_params(params: &serde_json::Value) -> Result<Vec<AssignmentEntry>, HandlerErr> {
    let Some(items) = params.get("entries").and_then(|v| v.as_array()) else {
        return Err(HandlerErr {
            code: "bad_params",
            message: "missing entries array".to_string(),
            details: None,
        });
    };
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        if !item.is_object() {
            return Err(HandlerErr {
                code: "bad_params",
                message: "entries must be objects".to_string(),
                details: Some(json!({ "index": i })),
            });
        }
        let with_index = |mut e: HandlerErr| {
            e.details = Some(json!({ "index": i }));
            e
        };
        let score = field_text(item, "score").map_err(with_index)?;
        let weight = field_text(item, "weight").map_err(with_index)?;
        let mut entry = AssignmentEntry::empty();
        entry.label = item
            .get("label")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        entry.score = score.flatten();
        entry.weight = weight.flatten();
        out.push(entry);
    }
    Ok(out)
}

fn handle_grade_evaluate(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let entries = match entries_from_params(&req.params) {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    match calc::evaluate(&entries) {
        Ok(report) => {
            let display = display_json(Some(&report));
            ok(&req.id, json!({ "report": report, "display": display }))
        }
        Err(e) => err(&req.id, e.code(), e.to_string(), Some(e.details())),
    }
}

fn handle_grade_display(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, display_json(state.report.as_ref()))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "grade.calculate" => Some(handle_grade_calculate(state, req)),
        "grade.evaluate" => Some(handle_grade_evaluate(state, req)),
        "grade.display" => Some(handle_grade_display(state, req)),
        _ => None,
    }
}
