use crate::dates::{format_iso_date, parse_iso_date};
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::policy::{PolicyBounds, PolicyProfile};
use serde_json::json;

fn read_bound(req: &Request, key: &str, default: i64) -> Result<i64, serde_json::Value> {
    match req.params.get(key) {
        None => Ok(default),
        Some(v) if v.is_null() => Ok(default),
        Some(v) => v.as_i64().filter(|n| *n >= 0).ok_or_else(|| {
            err(
                &req.id,
                "bad_params",
                format!("{} must be a non-negative integer", key),
                None,
            )
        }),
    }
}

fn profile_json(state: &AppState) -> serde_json::Value {
    let profile = state.profile.clone().unwrap_or_default();
    let bounds = profile.effective_bounds();
    json!({
        "loaded": state.profile.is_some(),
        "userId": profile.user_id,
        "minimumRequiredDays": bounds.minimum_required_days,
        "maximumAllowedDays": bounds.maximum_allowed_days,
        "requiredReturnDate": profile.required_return_date.map(format_iso_date),
    })
}

fn handle_profile_set(state: &mut AppState, req: &Request) -> serde_json::Value {
    let defaults = PolicyBounds::default();
    let minimum = match read_bound(req, "minimumRequiredDays", defaults.minimum_required_days) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let maximum = match read_bound(req, "maximumAllowedDays", defaults.maximum_allowed_days) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if maximum < minimum {
        return err(
            &req.id,
            "bad_params",
            "maximumAllowedDays must not be below minimumRequiredDays",
            Some(json!({ "minimumRequiredDays": minimum, "maximumAllowedDays": maximum })),
        );
    }

    let required_return_date = match req.params.get("requiredReturnDate") {
        None => None,
        Some(v) if v.is_null() => None,
        Some(v) => {
            let parsed = v.as_str().and_then(parse_iso_date);
            let Some(date) = parsed else {
                return err(
                    &req.id,
                    "bad_params",
                    "requiredReturnDate must be a YYYY-MM-DD date",
                    None,
                );
            };
            Some(date)
        }
    };

    let user_id = req
        .params
        .get("userId")
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    state.profile = Some(PolicyProfile {
        user_id,
        bounds: Some(PolicyBounds::new(minimum, maximum)),
        required_return_date,
    });
    log::info!(
        "profile loaded: bounds {}..={} days, deadline {}",
        minimum,
        maximum,
        required_return_date
            .map(format_iso_date)
            .unwrap_or_else(|| "unset".to_string())
    );

    ok(&req.id, profile_json(state))
}

fn handle_profile_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, profile_json(state))
}

fn handle_profile_clear(state: &mut AppState, req: &Request) -> serde_json::Value {
    state.profile = None;
    ok(&req.id, profile_json(state))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "profile.set" => Some(handle_profile_set(state, req)),
        "profile.get" => Some(handle_profile_get(state, req)),
        "profile.clear" => Some(handle_profile_clear(state, req)),
        _ => None,
    }
}
