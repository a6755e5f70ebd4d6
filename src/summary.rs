use chrono::NaiveDate;

use crate::dates::{days_between, read_date_field};
use crate::policy::PolicyBounds;
use crate::validate::{calculate_activity_days, DateInputs};

/// Derived quantities the frontend shows alongside the validation verdict.
/// Optional fields are absent when their operand dates are unset or
/// unparseable; this never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripSummary {
    /// Departure to return, signed.
    pub trip_days: Option<i64>,
    pub activity_days: i64,
    pub days_until_departure: Option<i64>,
    /// Days still missing to reach the minimum (0 once reached).
    pub remaining_to_minimum: i64,
    /// Days left below the ceiling; negative when exceeded.
    pub remaining_to_maximum: i64,
    /// Days between the return flight and the required-return deadline.
    pub required_return_margin: Option<i64>,
    pub in_valid_range: bool,
}

pub fn trip_summary(inputs: &DateInputs, bounds: PolicyBounds, today: NaiveDate) -> TripSummary {
    let departure = read_date_field(inputs.departure_date.as_deref()).as_parsed();
    let return_date = read_date_field(inputs.return_date.as_deref()).as_parsed();
    let deadline = read_date_field(inputs.required_return_date.as_deref()).as_parsed();

    let activity_days = calculate_activity_days(
        inputs.actual_arrival_date.as_deref(),
        inputs.actual_work_end_date.as_deref(),
    );

    TripSummary {
        trip_days: match (departure, return_date) {
            (Some(dep), Some(ret)) => Some(days_between(dep, ret)),
            _ => None,
        },
        activity_days,
        days_until_departure: departure.map(|dep| days_between(today, dep)),
        remaining_to_minimum: (bounds.minimum_required_days - activity_days).max(0),
        remaining_to_maximum: bounds.maximum_allowed_days - activity_days,
        required_return_margin: match (return_date, deadline) {
            (Some(ret), Some(deadline)) => Some(days_between(ret, deadline)),
            _ => None,
        },
        in_valid_range: bounds.contains(activity_days),
    }
}
