use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Action type counted as a lead: a messaging conversation started, 7-day attribution.
pub const MESSAGING_CONVERSATION_STARTED_7D: &str =
    "onsite_conversion.messaging_conversation_started_7d";

/// Wire form of the no-data sentinel.
pub const NO_DATA_LABEL: &str = "N/D";

/// One insights row as returned by the Graph API: a campaign within a reporting bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInsightRecord {
    #[serde(default)]
    pub campaign_name: String,
    pub date_start: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_stop: Option<NaiveDate>,
    #[serde(default, with = "rust_decimal::serde::str")]
    pub spend: Decimal,
    #[serde(default)]
    pub actions: Vec<ActionValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionValue {
    pub action_type: String,
    pub value: String,
}

/// Bucket size requested from the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Daily,
    Monthly,
}

impl Granularity {
    /// Value of the `time_increment` query parameter.
    pub const fn time_increment(self) -> &'static str {
        match self {
            Self::Daily => "1",
            Self::Monthly => "monthly",
        }
    }
}

/// Inclusive calendar date range with `since <= until`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    since: NaiveDate,
    until: NaiveDate,
}

impl DateRange {
    pub fn new(since: NaiveDate, until: NaiveDate) -> Result<Self, ReportError> {
        if since > until {
            return Err(ReportError::InvertedRange { since, until });
        }
        Ok(Self { since, until })
    }

    /// The `days`-long window ending on `until` (inclusive).
    pub fn trailing(until: NaiveDate, days: u32) -> Self {
        let span = i64::from(days.max(1)) - 1;
        let since = until
            .checked_sub_signed(Duration::days(span))
            .unwrap_or(NaiveDate::MIN);
        Self { since, until }
    }

    /// January 1st through `min(December 31st, today)`.
    pub fn year_to_date(year: i32, today: NaiveDate) -> Option<Self> {
        let since = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let end_of_year = NaiveDate::from_ymd_opt(year, 12, 31)?;
        let until = end_of_year.min(today);
        Self::new(since, until).ok()
    }

    pub const fn since(&self) -> NaiveDate {
        self.since
    }

    pub const fn until(&self) -> NaiveDate {
        self.until
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.since <= date && date <= self.until
    }

    pub fn year(&self) -> i32 {
        self.since.year()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.since, self.until)
    }
}

/// Average CPL for a month or quarter; `NoData` when no qualifying record exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodCpl {
    Value(Decimal),
    NoData,
}

impl PeriodCpl {
    pub const fn value(self) -> Option<Decimal> {
        match self {
            Self::Value(value) => Some(value),
            Self::NoData => None,
        }
    }

    pub const fn is_no_data(self) -> bool {
        matches!(self, Self::NoData)
    }
}

impl fmt::Display for PeriodCpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{value:.2}"),
            Self::NoData => f.write_str(NO_DATA_LABEL),
        }
    }
}

impl Serialize for PeriodCpl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(value) => rust_decimal::serde::float::serialize(value, serializer),
            Self::NoData => serializer.serialize_str(NO_DATA_LABEL),
        }
    }
}

/// Request-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    #[error("start date {since} is after end date {until}")]
    InvertedRange { since: NaiveDate, until: NaiveDate },
    #[error("failed to parse '{raw}' as YYYY-MM-DD")]
    InvalidDate { raw: String },
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, ReportError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| ReportError::InvalidDate {
        raw: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn trailing_window_spans_thirty_days_inclusive() {
        let range = DateRange::trailing(date(2024, 3, 30), 30);
        assert_eq!(range.since(), date(2024, 3, 1));
        assert_eq!(range.until(), date(2024, 3, 30));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = DateRange::new(date(2024, 3, 2), date(2024, 3, 1)).expect_err("inverted");
        assert!(matches!(err, ReportError::InvertedRange { .. }));
    }

    #[test]
    fn year_to_date_stops_at_today() {
        let range = DateRange::year_to_date(2024, date(2024, 5, 15)).expect("range");
        assert_eq!(range.since(), date(2024, 1, 1));
        assert_eq!(range.until(), date(2024, 5, 15));

        let past = DateRange::year_to_date(2023, date(2024, 5, 15)).expect("range");
        assert_eq!(past.until(), date(2023, 12, 31));
    }

    #[test]
    fn deserializes_graph_row_with_string_spend() {
        let row: RawInsightRecord = serde_json::from_str(
            r#"{
                "campaign_name": "Leads Now",
                "spend": "100.25",
                "actions": [{"action_type": "link_click", "value": "12"}],
                "date_start": "2024-03-05",
                "date_stop": "2024-03-05"
            }"#,
        )
        .expect("row parses");
        assert_eq!(row.spend, Decimal::new(10025, 2));
        assert_eq!(row.actions.len(), 1);
        assert_eq!(row.date_stop, Some(date(2024, 3, 5)));
    }

    #[test]
    fn missing_actions_and_name_default_to_empty() {
        let row: RawInsightRecord =
            serde_json::from_str(r#"{"spend": "0", "date_start": "2024-03-05"}"#)
                .expect("row parses");
        assert!(row.campaign_name.is_empty());
        assert!(row.actions.is_empty());
    }

    #[test]
    fn period_cpl_serializes_number_or_sentinel() {
        let value = serde_json::to_string(&PeriodCpl::Value(Decimal::new(1550, 2))).unwrap();
        assert_eq!(value, "15.5");
        let sentinel = serde_json::to_string(&PeriodCpl::NoData).unwrap();
        assert_eq!(sentinel, "\"N/D\"");
    }
}
