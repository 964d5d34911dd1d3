use super::domain::RawInsightRecord;
use super::filter::CampaignFilter;
use super::leads::extract_lead_count;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// Decimal places reported for CPL values.
pub const CPL_SCALE: u32 = 2;

/// Spend and leads summed across all surviving campaigns of one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayAggregate {
    pub spend: Decimal,
    pub lead_count: u64,
}

impl DayAggregate {
    fn absorb(&mut self, spend: Decimal, leads: u64) {
        self.spend += spend;
        self.lead_count = self.lead_count.saturating_add(leads);
    }

    pub fn cpl(&self) -> Decimal {
        cost_per_lead(self.spend, self.lead_count)
    }
}

/// `spend / leads`, or zero when there are no leads.
pub fn cost_per_lead(spend: Decimal, leads: u64) -> Decimal {
    if leads == 0 {
        return Decimal::ZERO;
    }
    (spend / Decimal::from(leads)).round_dp(CPL_SCALE)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMetric {
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub cpl: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spend: Decimal,
    pub total_results: u64,
}

/// Day-level detail plus the total-over-total CPL for a date range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeStats {
    pub daily_metrics: Vec<DailyMetric>,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_cpl: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spend: Decimal,
    pub total_results: u64,
}

/// Month bucket key, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

/// Filters excluded campaigns and merges records into per-bucket aggregates.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    filter: &'a CampaignFilter,
}

impl<'a> Aggregator<'a> {
    pub fn new(filter: &'a CampaignFilter) -> Self {
        Self { filter }
    }

    /// Aggregates keyed by `date_start`.
    pub fn by_day(&self, records: &[RawInsightRecord]) -> BTreeMap<NaiveDate, DayAggregate> {
        self.group(records, |record| record.date_start)
    }

    /// Aggregates keyed by the calendar month of `date_start`.
    pub fn by_month(&self, records: &[RawInsightRecord]) -> BTreeMap<MonthKey, DayAggregate> {
        self.group(records, |record| MonthKey::of(record.date_start))
    }

    /// Daily metrics in ascending date order plus totals for the whole range.
    pub fn aggregate(&self, records: &[RawInsightRecord]) -> RangeStats {
        let days = self.by_day(records);

        let mut total = DayAggregate::default();
        let daily_metrics = days
            .into_iter()
            .map(|(date, day)| {
                total.absorb(day.spend, day.lead_count);
                DailyMetric {
                    date,
                    cpl: day.cpl(),
                    total_spend: day.spend,
                    total_results: day.lead_count,
                }
            })
            .collect();

        RangeStats {
            daily_metrics,
            average_cpl: total.cpl(),
            total_spend: total.spend,
            total_results: total.lead_count,
        }
    }

    fn group<K, F>(&self, records: &[RawInsightRecord], key: F) -> BTreeMap<K, DayAggregate>
    where
        K: Ord,
        F: Fn(&RawInsightRecord) -> K,
    {
        let mut buckets: BTreeMap<K, DayAggregate> = BTreeMap::new();

        for record in records {
            if self.filter.is_excluded(&record.campaign_name) {
                continue;
            }

            let leads = match extract_lead_count(record) {
                Ok(leads) => leads,
                Err(err) => {
                    warn!(
                        campaign = %record.campaign_name,
                        date = %record.date_start,
                        %err,
                        "counting zero leads for malformed action value"
                    );
                    0
                }
            };

            buckets
                .entry(key(record))
                .or_default()
                .absorb(record.spend, leads);
        }

        buckets
    }
}
