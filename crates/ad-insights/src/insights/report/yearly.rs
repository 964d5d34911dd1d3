use super::views::{AccountYearlyView, YearlyReport};
use super::InsightReporter;
use crate::config::AdAccountConfig;
use crate::insights::domain::{DateRange, Granularity};
use crate::insights::rollup::YearlyRollup;
use crate::insights::source::FetchOutcome;
use chrono::{Datelike, NaiveDate};

impl InsightReporter {
    /// Monthly and quarterly CPL for the calendar year containing `today`.
    ///
    /// One month-granularity fetch per account covers January through `today`;
    /// later months are never requested.
    pub async fn yearly_report(&self, today: NaiveDate) -> YearlyReport {
        let year = today.year();
        let [first, second] = &self.accounts;
        let (account1, account2) = tokio::join!(
            self.account_year(first, year, today),
            self.account_year(second, year, today)
        );

        YearlyReport {
            year,
            account1,
            account2,
        }
    }

    async fn account_year(
        &self,
        account: &AdAccountConfig,
        year: i32,
        today: NaiveDate,
    ) -> AccountYearlyView {
        let outcome = match DateRange::year_to_date(year, today) {
            Some(range) => {
                self.fetcher
                    .fetch(account, range, Granularity::Monthly)
                    .await
            }
            None => FetchOutcome::Fetched(Vec::new()),
        };

        let rollup = YearlyRollup::build(&self.aggregator(), outcome.records(), year, today);

        AccountYearlyView::new(account.name.clone(), outcome.view(), &rollup)
    }
}
