use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_gradecalcd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn gradecalcd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn error_code(value: &serde_json::Value) -> &str {
    value
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
        .unwrap_or("")
}

fn fill_rows(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    rows: &[(i64, i64)],
) {
    for (i, (score, weight)) in rows.iter().enumerate() {
        if i > 0 {
            let _ = request_ok(stdin, reader, &format!("add-{i}"), "rows.add", json!({}));
        }
        let _ = request_ok(
            stdin,
            reader,
            &format!("set-{i}"),
            "rows.update",
            json!({ "index": i, "score": score, "weight": weight }),
        );
    }
}

#[test]
fn calculate_rounds_up_and_classifies() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    fill_rows(&mut stdin, &mut reader, &[(81, 50), (60, 50)]);

    let res = request_ok(&mut stdin, &mut reader, "c", "grade.calculate", json!({}));
    assert_eq!(res["report"]["percentage"], json!(71));
    assert_eq!(res["report"]["rawPercentage"], json!(70.5));
    assert_eq!(res["report"]["weightedSum"], json!(7050));
    assert_eq!(res["report"]["totalWeight"], json!(100));
    assert_eq!(res["display"]["percentage"], json!("71"));
    assert_eq!(res["display"]["grade"]["letter"], json!("C"));
    assert_eq!(res["display"]["grade"]["styleTag"], json!("grade-C"));
    assert_eq!(res["display"]["grade"]["text"], json!("C \u{2013} Good"));

    let notice = request_ok(&mut stdin, &mut reader, "n", "notice.get", json!({}));
    assert_eq!(notice["visible"], json!(false));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn failed_calculate_keeps_previous_display() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    fill_rows(&mut stdin, &mut reader, &[(100, 30), (0, 70)]);

    let res = request_ok(&mut stdin, &mut reader, "c1", "grade.calculate", json!({}));
    assert_eq!(res["display"]["percentage"], json!("30"));
    assert_eq!(
        res["display"]["grade"]["text"],
        json!("U \u{2013} Ungraded (Not Achieved)")
    );

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "w",
        "rows.update",
        json!({ "index": 1, "weight": 60 }),
    );
    let failed = request(&mut stdin, &mut reader, "c2", "grade.calculate", json!({}));
    assert_eq!(error_code(&failed), "weight_sum_mismatch");
    assert_eq!(
        failed["error"]["message"],
        json!("Total weight for all assignments must equal 100%.")
    );
    assert_eq!(failed["error"]["details"]["totalWeight"], json!(90));

    let display = request_ok(&mut stdin, &mut reader, "d", "grade.display", json!({}));
    assert_eq!(display["percentage"], json!("30"));
    assert_eq!(display["grade"]["letter"], json!("U"));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn blank_rows_report_score_then_weight() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let res = request(&mut stdin, &mut reader, "1", "grade.calculate", json!({}));
    assert_eq!(error_code(&res), "invalid_score");
    assert_eq!(
        res["error"]["message"],
        json!("Please enter a valid whole number score (0-100).")
    );

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "rows.update",
        json!({ "index": 0, "score": 75 }),
    );
    let res = request(&mut stdin, &mut reader, "3", "grade.calculate", json!({}));
    assert_eq!(error_code(&res), "invalid_weight");
    assert_eq!(res["error"]["details"]["index"], json!(0));

    let notice = request_ok(&mut stdin, &mut reader, "4", "notice.get", json!({}));
    assert_eq!(
        notice["message"],
        json!("Please enter a valid whole number weight (>0).")
    );

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn over_range_score_is_rejected() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    fill_rows(&mut stdin, &mut reader, &[(50, 50), (101, 50)]);

    let res = request(&mut stdin, &mut reader, "c", "grade.calculate", json!({}));
    assert_eq!(error_code(&res), "invalid_score");
    assert_eq!(res["error"]["details"]["index"], json!(1));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn stateless_evaluate_rechecks_integers() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let res = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "grade.evaluate",
        json!({ "entries": [
            { "label": "Exam", "score": "80", "weight": 50 },
            { "score": 60, "weight": "50" }
        ] }),
    );
    assert_eq!(res["report"]["percentage"], json!(70));
    assert_eq!(res["report"]["classification"]["letter"], json!("C"));
    assert_eq!(res["report"]["classification"]["description"], json!("Good"));

    let frac = request(
        &mut stdin,
        &mut reader,
        "2",
        "grade.evaluate",
        json!({ "entries": [{ "score": 7.5, "weight": 100 }] }),
    );
    assert_eq!(error_code(&frac), "invalid_score");

    let neg = request(
        &mut stdin,
        &mut reader,
        "3",
        "grade.evaluate",
        json!({ "entries": [{ "score": "-1", "weight": 100 }] }),
    );
    assert_eq!(error_code(&neg), "invalid_score");

    let missing = request(&mut stdin, &mut reader, "4", "grade.evaluate", json!({}));
    assert_eq!(error_code(&missing), "bad_params");

    // Stateless: no notice and no change to the displayed result.
    let notice = request_ok(&mut stdin, &mut reader, "5", "notice.get", json!({}));
    assert_eq!(notice["visible"], json!(false));
    let display = request_ok(&mut stdin, &mut reader, "6", "grade.display", json!({}));
    assert_eq!(display["percentage"], json!("0"));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn oversized_weight_reports_weight_total() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    fill_rows(&mut stdin, &mut reader, &[(50, 50), (50, 50)]);

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "big",
        "rows.update",
        json!({ "index": 0, "weight": "99999999999999999999" }),
    );
    let res = request(&mut stdin, &mut reader, "c", "grade.calculate", json!({}));
    assert_eq!(error_code(&res), "weight_sum_mismatch");
    assert_eq!(
        res["error"]["message"],
        json!("Total weight for all assignments must equal 100%.")
    );

    let res = request(
        &mut stdin,
        &mut reader,
        "e",
        "grade.evaluate",
        json!({ "entries": [{ "score": "99999999999999999999", "weight": 100 }] }),
    );
    assert_eq!(error_code(&res), "invalid_score");

    drop(stdin);
    let _ = child.wait();
}
