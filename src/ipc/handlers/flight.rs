use chrono::NaiveDate;
use serde_json::json;

use crate::dates::{format_iso_date, parse_iso_date};
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::messages::ValidationMessage;
use crate::policy::PolicyBounds;
use crate::summary;
use crate::validate;
use crate::validate::DateInputs;

/// Wire form of a validation message: the same envelope shape the response
/// errors use, so the frontend renders both with one code path.
fn message_json(m: &ValidationMessage) -> serde_json::Value {
    let mut out = json!({
        "kind": m.kind().as_str(),
        "message": m.render(),
    });
    if let Some(code) = m.code() {
        out["code"] = json!(code.as_str());
    }
    if let Some(details) = m.details() {
        out["details"] = details;
    }
    out
}

fn messages_json(list: &[ValidationMessage]) -> serde_json::Value {
    json!(list.iter().map(message_json).collect::<Vec<_>>())
}

fn opt_param_str(req: &Request, key: &str) -> Option<String> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

/// The validation clock. Requests may pin `today` (the tests do); live
/// requests fall back to the local calendar date at the boundary, keeping
/// the engine itself clock-free.
fn resolve_today(req: &Request) -> Result<NaiveDate, serde_json::Value> {
    match req.params.get("today").and_then(|v| v.as_str()) {
        Some(raw) => parse_iso_date(raw).ok_or_else(|| {
            err(
                &req.id,
                "bad_params",
                "today must be a YYYY-MM-DD date",
                None,
            )
        }),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Per-request bound overrides win over the loaded profile, which wins
/// over the policy defaults.
fn resolve_bounds(state: &AppState, req: &Request) -> Result<PolicyBounds, serde_json::Value> {
    let base = state
        .profile
        .as_ref()
        .map(|p| p.effective_bounds())
        .unwrap_or_default();

    let read = |key: &str, fallback: i64| -> Result<i64, serde_json::Value> {
        match req.params.get(key) {
            None => Ok(fallback),
            Some(v) if v.is_null() => Ok(fallback),
            Some(v) => v.as_i64().filter(|n| *n >= 0).ok_or_else(|| {
                err(
                    &req.id,
                    "bad_params",
                    format!("{} must be a non-negative integer", key),
                    None,
                )
            }),
        }
    };

    let minimum = read("minimumRequiredDays", base.minimum_required_days)?;
    let maximum = read("maximumAllowedDays", base.maximum_allowed_days)?;
    if maximum < minimum {
        return Err(err(
            &req.id,
            "bad_params",
            "maximumAllowedDays must not be below minimumRequiredDays",
            Some(json!({ "minimumRequiredDays": minimum, "maximumAllowedDays": maximum })),
        ));
    }
    Ok(PolicyBounds::new(minimum, maximum))
}

/// Form fields from params, with the profile's deadline as fallback when
/// the request does not carry one.
fn resolve_inputs(state: &AppState, req: &Request) -> Result<DateInputs, serde_json::Value> {
    let mut inputs: DateInputs = if req.params.is_null() {
        DateInputs::default()
    } else {
        serde_json::from_value(req.params.clone()).map_err(|e| {
            err(
                &req.id,
                "bad_params",
                format!("date fields must be strings: {}", e),
                None,
            )
        })?
    };
    if inputs.required_return_date.is_none() {
        inputs.required_return_date = state
            .profile
            .as_ref()
            .and_then(|p| p.required_return_date)
            .map(format_iso_date);
    }
    Ok(inputs)
}

fn handle_validate_date_range(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let today = match resolve_today(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let departure = opt_param_str(req, "departureDate");
    let return_date = opt_param_str(req, "returnDate");

    let check = validate::validate_date_range(departure.as_deref(), return_date.as_deref(), today);
    ok(
        &req.id,
        json!({
            "valid": check.valid,
            "message": check.message.as_ref().map(message_json),
        }),
    )
}

fn handle_activity_days(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let arrival = opt_param_str(req, "actualArrivalDate");
    let work_end = opt_param_str(req, "actualWorkEndDate");
    let days = validate::calculate_activity_days(arrival.as_deref(), work_end.as_deref());
    ok(&req.id, json!({ "activityDays": days }))
}

fn handle_validate_activity_dates(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let departure = opt_param_str(req, "departureDate");
    let arrival = opt_param_str(req, "actualArrivalDate");
    let work_end = opt_param_str(req, "actualWorkEndDate");
    let return_date = opt_param_str(req, "returnDate");

    let check = validate::validate_activity_dates(
        departure.as_deref(),
        arrival.as_deref(),
        work_end.as_deref(),
        return_date.as_deref(),
    );
    ok(
        &req.id,
        json!({
            "valid": check.valid,
            "errors": messages_json(&check.errors),
            "activityDays": check.activity_days,
        }),
    )
}

fn handle_validate_range(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(activity_days) = req.params.get("activityDays").and_then(|v| v.as_i64()) else {
        return err(&req.id, "bad_params", "missing activityDays", None);
    };
    if activity_days < 0 {
        return err(&req.id, "bad_params", "activityDays must not be negative", None);
    }
    let bounds = match resolve_bounds(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let check = validate::validate_activity_days_range(activity_days, bounds);
    ok(
        &req.id,
        json!({
            "valid": check.valid,
            "errors": messages_json(&check.errors),
            "warnings": messages_json(&check.warnings),
            "inValidRange": check.in_valid_range,
        }),
    )
}

fn handle_validate_required_return(state: &mut AppState, req: &Request) -> serde_json::Value {
    let return_date = opt_param_str(req, "returnDate");
    let deadline = opt_param_str(req, "requiredReturnDate").or_else(|| {
        state
            .profile
            .as_ref()
            .and_then(|p| p.required_return_date)
            .map(format_iso_date)
    });

    let check =
        validate::validate_required_return_date(return_date.as_deref(), deadline.as_deref());
    ok(
        &req.id,
        json!({
            "valid": check.valid,
            "message": check.message.as_ref().map(message_json),
            "warning": check.warning.as_ref().map(message_json),
            "code": check.message.as_ref().and_then(|m| m.code()).map(|c| c.as_str()),
        }),
    )
}

fn handle_validate_all(state: &mut AppState, req: &Request) -> serde_json::Value {
    let today = match resolve_today(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let bounds = match resolve_bounds(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let inputs = match resolve_inputs(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let result = validate::validate_all_dates(&inputs, bounds, today);
    ok(
        &req.id,
        json!({
            "valid": result.valid,
            "errors": messages_json(&result.errors),
            "warnings": messages_json(&result.warnings),
            "activityDays": result.activity_days,
            "exceedsMaximum": result.exceeds_maximum,
            "requiredReturn": result.required_return.as_ref().map(|check| json!({
                "valid": check.valid,
                "message": check.message.as_ref().map(message_json),
                "warning": check.warning.as_ref().map(message_json),
                "code": check.message.as_ref().and_then(|m| m.code()).map(|c| c.as_str()),
            })),
        }),
    )
}

fn handle_trip_summary(state: &mut AppState, req: &Request) -> serde_json::Value {
    let today = match resolve_today(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let bounds = match resolve_bounds(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let inputs = match resolve_inputs(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let s = summary::trip_summary(&inputs, bounds, today);
    ok(
        &req.id,
        json!({
            "tripDays": s.trip_days,
            "activityDays": s.activity_days,
            "daysUntilDeparture": s.days_until_departure,
            "remainingToMinimum": s.remaining_to_minimum,
            "remainingToMaximum": s.remaining_to_maximum,
            "requiredReturnMargin": s.required_return_margin,
            "inValidRange": s.in_valid_range,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "flight.validateDateRange" => Some(handle_validate_date_range(state, req)),
        "flight.activityDays" => Some(handle_activity_days(state, req)),
        "flight.validateActivityDates" => Some(handle_validate_activity_dates(state, req)),
        "flight.validateRange" => Some(handle_validate_range(state, req)),
        "flight.validateRequiredReturn" => Some(handle_validate_required_return(state, req)),
        "flight.validateAll" => Some(handle_validate_all(state, req)),
        "flight.tripSummary" => Some(handle_trip_summary(state, req)),
        _ => None,
    }
}
