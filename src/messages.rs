use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::dates::format_iso_date;

/// Taxonomy of validation feedback. Errors carry one of the first five
/// kinds; advisories never make a verdict invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    MissingField,
    InvalidFormat,
    OrderViolation,
    RangeViolation,
    DeadlineExceeded,
    Advisory,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::MissingField => "missing_field",
            MessageKind::InvalidFormat => "invalid_format",
            MessageKind::OrderViolation => "order_violation",
            MessageKind::RangeViolation => "range_violation",
            MessageKind::DeadlineExceeded => "deadline_exceeded",
            MessageKind::Advisory => "advisory",
        }
    }
}

/// Stable rule codes the frontend branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleCode {
    MaximumActivityDaysExceeded,
    RequiredReturnDateExceeded,
}

impl RuleCode {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleCode::MaximumActivityDaysExceeded => "MAXIMUM_ACTIVITY_DAYS_EXCEEDED",
            RuleCode::RequiredReturnDateExceeded => "REQUIRED_RETURN_DATE_EXCEEDED",
        }
    }
}

/// One piece of validation feedback, tagged with the rule that produced it
/// and carrying its parameters. Display text is rendered at the IPC
/// boundary so the engine itself stays locale-agnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationMessage {
    ReturnDateRequired,
    DepartureAndReturnRequired,
    InvalidFormat,
    DepartureInPast {
        departure: NaiveDate,
        today: NaiveDate,
    },
    ReturnNotAfterDeparture,
    ArrivalBeforeDeparture,
    ArrivalTooLateAfterDeparture {
        slack_days: i64,
    },
    WorkEndNotAfterArrival,
    WorkEndAfterReturn,
    ReturnTooLateAfterWorkEnd {
        slack_days: i64,
    },
    BelowMinimumDays {
        actual: i64,
        minimum: i64,
    },
    NearMinimumDays {
        actual: i64,
        minimum: i64,
    },
    AboveMaximumDays {
        actual: i64,
        maximum: i64,
    },
    NearMaximumDays {
        actual: i64,
        maximum: i64,
    },
    RequiredReturnExceeded {
        deadline: NaiveDate,
    },
    ReturnOnDeadline {
        deadline: NaiveDate,
    },
    ReturnNearDeadline {
        deadline: NaiveDate,
        days_remaining: i64,
    },
}

impl ValidationMessage {
    pub fn kind(&self) -> MessageKind {
        use ValidationMessage::*;
        match self {
            ReturnDateRequired | DepartureAndReturnRequired => MessageKind::MissingField,
            InvalidFormat => MessageKind::InvalidFormat,
            DepartureInPast { .. }
            | ReturnNotAfterDeparture
            | ArrivalBeforeDeparture
            | ArrivalTooLateAfterDeparture { .. }
            | WorkEndNotAfterArrival
            | WorkEndAfterReturn
            | ReturnTooLateAfterWorkEnd { .. } => MessageKind::OrderViolation,
            BelowMinimumDays { .. } | AboveMaximumDays { .. } => MessageKind::RangeViolation,
            RequiredReturnExceeded { .. } => MessageKind::DeadlineExceeded,
            NearMinimumDays { .. }
            | NearMaximumDays { .. }
            | ReturnOnDeadline { .. }
            | ReturnNearDeadline { .. } => MessageKind::Advisory,
        }
    }

    pub fn code(&self) -> Option<RuleCode> {
        match self {
            ValidationMessage::AboveMaximumDays { .. } => {
                Some(RuleCode::MaximumActivityDaysExceeded)
            }
            ValidationMessage::RequiredReturnExceeded { .. } => {
                Some(RuleCode::RequiredReturnDateExceeded)
            }
            _ => None,
        }
    }

    /// Stable display text, directly renderable by the frontend.
    pub fn render(&self) -> String {
        use ValidationMessage::*;
        match self {
            ReturnDateRequired => "return date is required".to_string(),
            DepartureAndReturnRequired => {
                "departure and return dates are both required".to_string()
            }
            InvalidFormat => "invalid date format (expected YYYY-MM-DD)".to_string(),
            DepartureInPast { departure, today } => format!(
                "departure date {} is in the past (today is {})",
                format_iso_date(*departure),
                format_iso_date(*today)
            ),
            ReturnNotAfterDeparture => {
                "return date must be after the departure date".to_string()
            }
            ArrivalBeforeDeparture => {
                "local arrival date must not be before the departure date".to_string()
            }
            ArrivalTooLateAfterDeparture { slack_days } => format!(
                "local arrival date must be within {} day(s) of departure",
                slack_days
            ),
            WorkEndNotAfterArrival => {
                "work end date must be after the local arrival date".to_string()
            }
            WorkEndAfterReturn => {
                "work end date must not be after the return date".to_string()
            }
            ReturnTooLateAfterWorkEnd { slack_days } => format!(
                "return date must be within {} day(s) of the work end date",
                slack_days
            ),
            BelowMinimumDays { actual, minimum } => format!(
                "activity period is {} days, below the required minimum of {} days",
                actual, minimum
            ),
            NearMinimumDays { actual, minimum } => format!(
                "activity period of {} days is close to the minimum of {} days",
                actual, minimum
            ),
            AboveMaximumDays { actual, maximum } => format!(
                "activity period is {} days, exceeding the maximum of {} days by {}",
                actual,
                maximum,
                actual - maximum
            ),
            NearMaximumDays { actual, maximum } => format!(
                "activity period of {} days is within {} day(s) of the maximum of {} days",
                actual,
                maximum - actual,
                maximum
            ),
            RequiredReturnExceeded { deadline } => format!(
                "return date must be on or before the required return date {}",
                format_iso_date(*deadline)
            ),
            ReturnOnDeadline { deadline } => format!(
                "return date falls exactly on the required return date {}; consider an earlier flight",
                format_iso_date(*deadline)
            ),
            ReturnNearDeadline {
                deadline,
                days_remaining,
            } => format!(
                "return date is {} day(s) before the required return date {}",
                days_remaining,
                format_iso_date(*deadline)
            ),
        }
    }

    /// Structured parameters for the wire envelope, mirroring the rendered
    /// text so the frontend never has to parse message strings.
    pub fn details(&self) -> Option<Value> {
        use ValidationMessage::*;
        match self {
            ReturnDateRequired => Some(json!({ "field": "returnDate" })),
            DepartureInPast { departure, today } => Some(json!({
                "departure": format_iso_date(*departure),
                "today": format_iso_date(*today),
            })),
            ArrivalTooLateAfterDeparture { slack_days }
            | ReturnTooLateAfterWorkEnd { slack_days } => {
                Some(json!({ "slackDays": slack_days }))
            }
            BelowMinimumDays { actual, minimum } | NearMinimumDays { actual, minimum } => {
                Some(json!({ "activityDays": actual, "minimumDays": minimum }))
            }
            AboveMaximumDays { actual, maximum } => Some(json!({
                "activityDays": actual,
                "maximumDays": maximum,
                "overage": actual - maximum,
            })),
            NearMaximumDays { actual, maximum } => Some(json!({
                "activityDays": actual,
                "maximumDays": maximum,
                "remaining": maximum - actual,
            })),
            RequiredReturnExceeded { deadline } | ReturnOnDeadline { deadline } => {
                Some(json!({ "deadline": format_iso_date(*deadline) }))
            }
            ReturnNearDeadline {
                deadline,
                days_remaining,
            } => Some(json!({
                "deadline": format_iso_date(*deadline),
                "daysRemaining": days_remaining,
            })),
            DepartureAndReturnRequired
            | InvalidFormat
            | ReturnNotAfterDeparture
            | ArrivalBeforeDeparture
            | WorkEndNotAfterArrival
            | WorkEndAfterReturn => None,
        }
    }
}
