use chrono::NaiveDate;

/// Default activity-period bounds applied when no per-user profile is loaded.
pub const DEFAULT_MINIMUM_ACTIVITY_DAYS: i64 = 180;
pub const DEFAULT_MAXIMUM_ACTIVITY_DAYS: i64 = 210;

/// Local arrival must fall within this many days after outbound departure.
pub const ARRIVAL_SLACK_DAYS: i64 = 1;
/// The return flight must fall within this many days after local work ends.
pub const RETURN_SLACK_DAYS: i64 = 9;

/// Advisory windows around the activity-day bounds.
pub const NEAR_MINIMUM_WINDOW_DAYS: i64 = 30;
pub const NEAR_MAXIMUM_WINDOW_DAYS: i64 = 10;
/// Advisory window ahead of the required-return deadline.
pub const DEADLINE_WARNING_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyBounds {
    pub minimum_required_days: i64,
    pub maximum_allowed_days: i64,
}

impl Default for PolicyBounds {
    fn default() -> Self {
        Self {
            minimum_required_days: DEFAULT_MINIMUM_ACTIVITY_DAYS,
            maximum_allowed_days: DEFAULT_MAXIMUM_ACTIVITY_DAYS,
        }
    }
}

impl PolicyBounds {
    pub fn new(minimum_required_days: i64, maximum_allowed_days: i64) -> Self {
        Self {
            minimum_required_days,
            maximum_allowed_days,
        }
    }

    pub fn contains(&self, activity_days: i64) -> bool {
        activity_days >= self.minimum_required_days && activity_days <= self.maximum_allowed_days
    }
}

/// Per-user policy record injected by the frontend after it fetches the
/// user's profile. Absence of a deadline means the policy is not configured
/// for this user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyProfile {
    pub user_id: Option<String>,
    pub bounds: Option<PolicyBounds>,
    pub required_return_date: Option<NaiveDate>,
}

impl PolicyProfile {
    pub fn effective_bounds(&self) -> PolicyBounds {
        self.bounds.unwrap_or_default()
    }
}
