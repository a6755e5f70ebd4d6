use chrono::{Duration, NaiveDate};
use serde::Deserialize;

use crate::dates::{days_between, read_date_field, DateField};
use crate::messages::ValidationMessage;
use crate::policy::{
    PolicyBounds, ARRIVAL_SLACK_DAYS, DEADLINE_WARNING_WINDOW_DAYS, NEAR_MAXIMUM_WINDOW_DAYS,
    NEAR_MINIMUM_WINDOW_DAYS, RETURN_SLACK_DAYS,
};

/// Raw form field values as submitted by the frontend. Empty strings count
/// as unset; unset fields skip the checks that depend on them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DateInputs {
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
    pub actual_arrival_date: Option<String>,
    pub actual_work_end_date: Option<String>,
    pub required_return_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRangeCheck {
    pub valid: bool,
    pub message: Option<ValidationMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityDatesCheck {
    pub valid: bool,
    pub errors: Vec<ValidationMessage>,
    pub activity_days: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundCheck {
    pub valid: bool,
    pub message: Option<ValidationMessage>,
    pub warning: Option<ValidationMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeCheck {
    pub valid: bool,
    pub errors: Vec<ValidationMessage>,
    pub warnings: Vec<ValidationMessage>,
    pub in_valid_range: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadlineCheck {
    pub valid: bool,
    pub message: Option<ValidationMessage>,
    pub warning: Option<ValidationMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationMessage>,
    pub warnings: Vec<ValidationMessage>,
    pub activity_days: i64,
    pub exceeds_maximum: bool,
    pub required_return: Option<DeadlineCheck>,
}

fn valid_bound() -> BoundCheck {
    BoundCheck {
        valid: true,
        message: None,
        warning: None,
    }
}

/// Departure/return sanity check. First failing rule wins; `today` is
/// injected by the caller so the check stays deterministic.
pub fn validate_date_range(
    departure: Option<&str>,
    return_date: Option<&str>,
    today: NaiveDate,
) -> DateRangeCheck {
    let fail = |message: ValidationMessage| DateRangeCheck {
        valid: false,
        message: Some(message),
    };

    let dep = read_date_field(departure);
    let ret = read_date_field(return_date);
    if dep == DateField::Unset || ret == DateField::Unset {
        return fail(ValidationMessage::DepartureAndReturnRequired);
    }
    let (Some(dep), Some(ret)) = (dep.as_parsed(), ret.as_parsed()) else {
        return fail(ValidationMessage::InvalidFormat);
    };

    if dep < today {
        return fail(ValidationMessage::DepartureInPast {
            departure: dep,
            today,
        });
    }
    if dep >= ret {
        return fail(ValidationMessage::ReturnNotAfterDeparture);
    }

    DateRangeCheck {
        valid: true,
        message: None,
    }
}

/// Calendar days between local arrival and work end. Degenerate spans
/// (unset, unparseable, or reversed) count as 0; the relationship checks
/// report those separately.
pub fn calculate_activity_days(arrival: Option<&str>, work_end: Option<&str>) -> i64 {
    let (Some(arrival), Some(work_end)) = (
        read_date_field(arrival).as_parsed(),
        read_date_field(work_end).as_parsed(),
    ) else {
        return 0;
    };
    if arrival >= work_end {
        return 0;
    }
    days_between(arrival, work_end)
}

/// Ordered relationship rules across the four flight dates. All rules are
/// evaluated in one pass so the user sees every violation at once; a rule
/// is skipped when either of its operands is unset. Any present but
/// unparseable date collapses the check to a single format error.
pub fn validate_activity_dates(
    departure: Option<&str>,
    arrival: Option<&str>,
    work_end: Option<&str>,
    return_date: Option<&str>,
) -> ActivityDatesCheck {
    let dep = read_date_field(departure);
    let arr = read_date_field(arrival);
    let end = read_date_field(work_end);
    let ret = read_date_field(return_date);

    if dep.is_invalid() || arr.is_invalid() || end.is_invalid() || ret.is_invalid() {
        return ActivityDatesCheck {
            valid: false,
            errors: vec![ValidationMessage::InvalidFormat],
            activity_days: 0,
        };
    }

    let (dep, arr, end, ret) = (
        dep.as_parsed(),
        arr.as_parsed(),
        end.as_parsed(),
        ret.as_parsed(),
    );
    let mut errors = Vec::new();

    if let (Some(dep), Some(arr)) = (dep, arr) {
        if arr < dep {
            errors.push(ValidationMessage::ArrivalBeforeDeparture);
        } else if arr > dep + Duration::days(ARRIVAL_SLACK_DAYS) {
            errors.push(ValidationMessage::ArrivalTooLateAfterDeparture {
                slack_days: ARRIVAL_SLACK_DAYS,
            });
        }
    }
    if let (Some(arr), Some(end)) = (arr, end) {
        if end <= arr {
            errors.push(ValidationMessage::WorkEndNotAfterArrival);
        }
    }
    if let (Some(end), Some(ret)) = (end, ret) {
        if end > ret {
            errors.push(ValidationMessage::WorkEndAfterReturn);
        }
        if ret > end + Duration::days(RETURN_SLACK_DAYS) {
            errors.push(ValidationMessage::ReturnTooLateAfterWorkEnd {
                slack_days: RETURN_SLACK_DAYS,
            });
        }
    }

    let activity_days = match (arr, end) {
        (Some(arr), Some(end)) if arr < end => days_between(arr, end),
        _ => 0,
    };

    ActivityDatesCheck {
        valid: errors.is_empty(),
        errors,
        activity_days,
    }
}

pub fn validate_minimum_activity_days(activity_days: i64, minimum_days: i64) -> BoundCheck {
    if activity_days < minimum_days {
        return BoundCheck {
            valid: false,
            message: Some(ValidationMessage::BelowMinimumDays {
                actual: activity_days,
                minimum: minimum_days,
            }),
            warning: None,
        };
    }
    if activity_days < minimum_days + NEAR_MINIMUM_WINDOW_DAYS {
        return BoundCheck {
            warning: Some(ValidationMessage::NearMinimumDays {
                actual: activity_days,
                minimum: minimum_days,
            }),
            ..valid_bound()
        };
    }
    valid_bound()
}

pub fn validate_maximum_activity_days(activity_days: i64, maximum_days: i64) -> BoundCheck {
    if activity_days > maximum_days {
        return BoundCheck {
            valid: false,
            message: Some(ValidationMessage::AboveMaximumDays {
                actual: activity_days,
                maximum: maximum_days,
            }),
            warning: None,
        };
    }
    if activity_days > maximum_days - NEAR_MAXIMUM_WINDOW_DAYS {
        return BoundCheck {
            warning: Some(ValidationMessage::NearMaximumDays {
                actual: activity_days,
                maximum: maximum_days,
            }),
            ..valid_bound()
        };
    }
    valid_bound()
}

/// Both bound checks, always run together so the caller sees every
/// applicable message.
pub fn validate_activity_days_range(activity_days: i64, bounds: PolicyBounds) -> RangeCheck {
    let min = validate_minimum_activity_days(activity_days, bounds.minimum_required_days);
    let max = validate_maximum_activity_days(activity_days, bounds.maximum_allowed_days);

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    for check in [min, max] {
        if let Some(m) = check.message {
            errors.push(m);
        }
        if let Some(w) = check.warning {
            warnings.push(w);
        }
    }

    RangeCheck {
        valid: errors.is_empty(),
        errors,
        warnings,
        in_valid_range: bounds.contains(activity_days),
    }
}

/// Required-return deadline check. A user without a configured deadline
/// passes trivially.
pub fn validate_required_return_date(
    return_date: Option<&str>,
    required_return: Option<&str>,
) -> DeadlineCheck {
    let fail = |message: ValidationMessage| DeadlineCheck {
        valid: false,
        message: Some(message),
        warning: None,
    };
    let pass = |warning: Option<ValidationMessage>| DeadlineCheck {
        valid: true,
        message: None,
        warning,
    };

    let ret = read_date_field(return_date);
    if ret == DateField::Unset {
        return fail(ValidationMessage::ReturnDateRequired);
    }
    let deadline = read_date_field(required_return);
    if deadline == DateField::Unset {
        return pass(None);
    }
    let (Some(ret), Some(deadline)) = (ret.as_parsed(), deadline.as_parsed()) else {
        return fail(ValidationMessage::InvalidFormat);
    };

    if ret > deadline {
        return fail(ValidationMessage::RequiredReturnExceeded { deadline });
    }
    if ret == deadline {
        return pass(Some(ValidationMessage::ReturnOnDeadline { deadline }));
    }
    let days_remaining = days_between(ret, deadline);
    if days_remaining <= DEADLINE_WARNING_WINDOW_DAYS {
        return pass(Some(ValidationMessage::ReturnNearDeadline {
            deadline,
            days_remaining,
        }));
    }
    pass(None)
}

/// Full-form verdict. Stages accumulate rather than short-circuit, except
/// where an unset field makes a later stage meaningless; a malformed form
/// yields a single generic format error.
pub fn validate_all_dates(
    inputs: &DateInputs,
    bounds: PolicyBounds,
    today: NaiveDate,
) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut exceeds_maximum = false;

    let departure = inputs.departure_date.as_deref();
    let return_date = inputs.return_date.as_deref();
    let arrival = inputs.actual_arrival_date.as_deref();
    let work_end = inputs.actual_work_end_date.as_deref();
    let required_return = inputs.required_return_date.as_deref();

    let range = validate_date_range(departure, return_date, today);
    if let Some(m) = range.message {
        errors.push(m);
    }

    let mut required_return_check = None;
    if read_date_field(required_return) != DateField::Unset
        && read_date_field(return_date) != DateField::Unset
    {
        let check = validate_required_return_date(return_date, required_return);
        if let Some(m) = check.message.clone() {
            errors.push(m);
        }
        if let Some(w) = check.warning.clone() {
            warnings.push(w);
        }
        required_return_check = Some(check);
    }

    let mut activity_days = 0;
    if read_date_field(arrival) != DateField::Unset && read_date_field(work_end) != DateField::Unset
    {
        let check = validate_activity_dates(departure, arrival, work_end, return_date);
        activity_days = check.activity_days;
        if check.valid {
            let range = validate_activity_days_range(activity_days, bounds);
            exceeds_maximum = range
                .errors
                .iter()
                .any(|m| matches!(m, ValidationMessage::AboveMaximumDays { .. }));
            errors.extend(range.errors);
            warnings.extend(range.warnings);
        } else {
            errors.extend(check.errors);
        }
    }

    // Several malformed fields collapse to one generic format error.
    let mut format_seen = false;
    errors.retain(|m| {
        if matches!(m, ValidationMessage::InvalidFormat) {
            if format_seen {
                return false;
            }
            format_seen = true;
        }
        true
    });

    ValidationResult {
        valid: errors.is_empty(),
        errors,
        warnings,
        activity_days,
        exceeds_maximum,
        required_return: required_return_check,
    }
}
