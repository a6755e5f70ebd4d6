use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_flightd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn flightd");
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

#[test]
fn short_activity_period_fails_with_minimum_violation() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "flight.validateAll",
        json!({
            "departureDate": "2025-03-01",
            "returnDate": "2025-09-01",
            "actualArrivalDate": "2025-03-02",
            "actualWorkEndDate": "2025-08-25",
            "today": "2025-02-01"
        }),
    );

    assert_eq!(result.get("valid").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(result.get("activityDays").and_then(|v| v.as_i64()), Some(176));
    assert_eq!(
        result.get("exceedsMaximum").and_then(|v| v.as_bool()),
        Some(false)
    );

    let errors = result
        .get("errors")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].get("kind").and_then(|v| v.as_str()),
        Some("range_violation")
    );
    let text = errors[0].get("message").and_then(|v| v.as_str()).unwrap_or("");
    assert!(text.contains("176"), "message names the count: {}", text);
    assert!(text.contains("180"), "message names the minimum: {}", text);
}

#[test]
fn overlong_activity_period_reports_the_stable_code() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "flight.validateAll",
        json!({
            "departureDate": "2025-03-01",
            "returnDate": "2025-10-01",
            "actualArrivalDate": "2025-03-02",
            "actualWorkEndDate": "2025-09-29",
            "today": "2025-03-01"
        }),
    );

    assert_eq!(result.get("valid").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(result.get("activityDays").and_then(|v| v.as_i64()), Some(211));
    assert_eq!(
        result.get("exceedsMaximum").and_then(|v| v.as_bool()),
        Some(true)
    );

    let errors = result
        .get("errors")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();
    assert!(errors.iter().any(|e| {
        e.get("code").and_then(|v| v.as_str()) == Some("MAXIMUM_ACTIVITY_DAYS_EXCEEDED")
            && e.pointer("/details/overage").and_then(|v| v.as_i64()) == Some(1)
    }));
}

#[test]
fn work_end_after_return_is_an_order_violation() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "flight.validateActivityDates",
        json!({
            "departureDate": "2025-03-01",
            "actualArrivalDate": "2025-03-02",
            "actualWorkEndDate": "2025-09-10",
            "returnDate": "2025-09-01"
        }),
    );

    assert_eq!(result.get("valid").and_then(|v| v.as_bool()), Some(false));
    let errors = result
        .get("errors")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].get("kind").and_then(|v| v.as_str()),
        Some("order_violation")
    );
    assert!(errors[0]
        .get("message")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .contains("return"));
}

#[test]
fn garbage_input_is_answered_not_crashed() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "flight.validateAll",
        json!({
            "departureDate": "soon",
            "returnDate": "later",
            "actualArrivalDate": "eventually",
            "actualWorkEndDate": "someday",
            "today": "2025-02-01"
        }),
    );

    assert_eq!(result.get("valid").and_then(|v| v.as_bool()), Some(false));
    let errors = result
        .get("errors")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();
    let format_errors = errors
        .iter()
        .filter(|e| e.get("kind").and_then(|v| v.as_str()) == Some("invalid_format"))
        .count();
    assert_eq!(format_errors, 1, "one generic format error: {:?}", errors);
}

#[test]
fn non_string_date_fields_are_bad_params() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let raw = request(
        &mut stdin,
        &mut reader,
        "1",
        "flight.validateAll",
        json!({ "departureDate": 20250301, "today": "2025-02-01" }),
    );
    assert_eq!(raw.get("ok").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(
        raw.pointer("/error/code").and_then(|v| v.as_str()),
        Some("bad_params")
    );
}

#[test]
fn bad_today_param_is_rejected() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let raw = request(
        &mut stdin,
        &mut reader,
        "1",
        "flight.validateAll",
        json!({ "today": "yesterday-ish" }),
    );
    assert_eq!(raw.get("ok").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(
        raw.pointer("/error/code").and_then(|v| v.as_str()),
        Some("bad_params")
    );
}

#[test]
fn return_on_deadline_warns_but_passes() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "flight.validateRequiredReturn",
        json!({
            "returnDate": "2025-09-15",
            "requiredReturnDate": "2025-09-15"
        }),
    );

    assert_eq!(result.get("valid").and_then(|v| v.as_bool()), Some(true));
    assert!(result.get("code").map(|v| v.is_null()).unwrap_or(true));
    let warning = result.get("warning").cloned().unwrap_or_default();
    assert_eq!(
        warning.get("kind").and_then(|v| v.as_str()),
        Some("advisory")
    );

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "flight.validateRequiredReturn",
        json!({
            "returnDate": "2025-09-16",
            "requiredReturnDate": "2025-09-15"
        }),
    );
    assert_eq!(result.get("valid").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(
        result.get("code").and_then(|v| v.as_str()),
        Some("REQUIRED_RETURN_DATE_EXCEEDED")
    );
}

#[test]
fn trip_summary_reports_derived_metrics() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "flight.tripSummary",
        json!({
            "departureDate": "2025-03-01",
            "returnDate": "2025-09-01",
            "actualArrivalDate": "2025-03-02",
            "actualWorkEndDate": "2025-08-29",
            "requiredReturnDate": "2025-09-05",
            "today": "2025-02-01"
        }),
    );

    assert_eq!(result.get("tripDays").and_then(|v| v.as_i64()), Some(184));
    assert_eq!(result.get("activityDays").and_then(|v| v.as_i64()), Some(180));
    assert_eq!(
        result.get("daysUntilDeparture").and_then(|v| v.as_i64()),
        Some(28)
    );
    assert_eq!(
        result.get("requiredReturnMargin").and_then(|v| v.as_i64()),
        Some(4)
    );
    assert_eq!(
        result.get("inValidRange").and_then(|v| v.as_bool()),
        Some(true)
    );
}
