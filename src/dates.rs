use chrono::NaiveDate;

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// A form field holding a calendar date. HTML date inputs submit an empty
/// string when untouched, so blank and whitespace-only values count as unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Unset,
    Invalid,
    Parsed(NaiveDate),
}

impl DateField {
    pub fn as_parsed(self) -> Option<NaiveDate> {
        match self {
            DateField::Parsed(d) => Some(d),
            _ => None,
        }
    }

    pub fn is_invalid(self) -> bool {
        matches!(self, DateField::Invalid)
    }
}

/// Normalize a raw field value: `None` when unset after trimming.
pub fn clean(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), ISO_DATE_FORMAT).ok()
}

pub fn read_date_field(raw: Option<&str>) -> DateField {
    match clean(raw) {
        None => DateField::Unset,
        Some(s) => match parse_iso_date(s) {
            Some(d) => DateField::Parsed(d),
            None => DateField::Invalid,
        },
    }
}

/// Whole calendar days from `from` to `to`; negative when `to` precedes `from`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}
