use super::views::{AccountRangeView, RangeReport};
use super::InsightReporter;
use crate::config::AdAccountConfig;
use crate::insights::domain::{parse_date, DateRange, Granularity, ReportError};
use chrono::NaiveDate;

/// Length of the window used when the caller omits `start_date`.
pub const DEFAULT_RANGE_DAYS: u32 = 30;

/// Optional bounds supplied by the caller, as raw `YYYY-MM-DD` strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl RangeQuery {
    /// Missing end defaults to `today`; missing start to 29 days before the end.
    pub fn resolve(&self, today: NaiveDate) -> Result<DateRange, ReportError> {
        let until = match non_blank(&self.end_date) {
            Some(raw) => parse_date(raw)?,
            None => today,
        };
        match non_blank(&self.start_date) {
            Some(raw) => DateRange::new(parse_date(raw)?, until),
            None => Ok(DateRange::trailing(until, DEFAULT_RANGE_DAYS)),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|raw| !raw.trim().is_empty())
}

impl InsightReporter {
    /// Day-level CPL for both accounts over `range`, fetched concurrently.
    pub async fn range_report(&self, range: DateRange) -> RangeReport {
        let [first, second] = &self.accounts;
        let (account1, account2) = tokio::join!(
            self.account_range(first, range),
            self.account_range(second, range)
        );

        RangeReport {
            start_date: range.since(),
            end_date: range.until(),
            account1,
            account2,
        }
    }

    async fn account_range(&self, account: &AdAccountConfig, range: DateRange) -> AccountRangeView {
        let outcome = self.fetcher.fetch(account, range, Granularity::Daily).await;
        AccountRangeView {
            name: account.name.clone(),
            source: outcome.view(),
            stats: self.aggregator().aggregate(outcome.records()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn defaults_to_the_last_thirty_days() {
        let range = RangeQuery::default().resolve(date(2024, 3, 30)).expect("range");
        assert_eq!(range.since(), date(2024, 3, 1));
        assert_eq!(range.until(), date(2024, 3, 30));
    }

    #[test]
    fn start_defaults_relative_to_supplied_end() {
        let query = RangeQuery {
            start_date: Some(String::new()),
            end_date: Some("2024-02-29".to_string()),
        };
        let range = query.resolve(date(2024, 6, 1)).expect("range");
        assert_eq!(range.since(), date(2024, 1, 31));
        assert_eq!(range.until(), date(2024, 2, 29));
    }

    #[test]
    fn rejects_bad_dates_and_inverted_ranges() {
        let garbage = RangeQuery {
            start_date: Some("03/01/2024".to_string()),
            end_date: None,
        };
        assert!(matches!(
            garbage.resolve(date(2024, 3, 30)),
            Err(ReportError::InvalidDate { .. })
        ));

        let inverted = RangeQuery {
            start_date: Some("2024-03-10".to_string()),
            end_date: Some("2024-03-01".to_string()),
        };
        assert!(matches!(
            inverted.resolve(date(2024, 3, 30)),
            Err(ReportError::InvertedRange { .. })
        ));
    }
}
