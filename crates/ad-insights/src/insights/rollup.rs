//! Yearly rollup using the average-of-per-period policy: each month's CPL is
//! computed from that month's records alone, and a quarter's CPL is the mean of
//! its months that have data.

use super::aggregate::{Aggregator, MonthKey, CPL_SCALE};
use super::domain::{PeriodCpl, RawInsightRecord};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// CPL per calendar month, January first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyCpls([PeriodCpl; 12]);

impl MonthlyCpls {
    pub fn empty() -> Self {
        Self([PeriodCpl::NoData; 12])
    }

    /// `month` is 1-based.
    pub fn get(&self, month: u32) -> PeriodCpl {
        month
            .checked_sub(1)
            .and_then(|index| self.0.get(index as usize))
            .copied()
            .unwrap_or(PeriodCpl::NoData)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, PeriodCpl)> + '_ {
        (1..=12).zip(self.0.iter().copied())
    }

    /// The three months of `quarter` (1-4).
    pub fn quarter(&self, quarter: u32) -> [PeriodCpl; 3] {
        let first = (quarter.clamp(1, 4) - 1) * 3 + 1;
        [self.get(first), self.get(first + 1), self.get(first + 2)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuarterSummary {
    pub monthly_cpls: [PeriodCpl; 3],
    pub average_cpl: PeriodCpl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearlyRollup {
    pub year: i32,
    pub months: MonthlyCpls,
    pub quarters: [QuarterSummary; 4],
}

impl YearlyRollup {
    /// Rolls month-granularity records up for `year` as of `today`.
    ///
    /// Records outside `year` are ignored. Months starting after `today` are
    /// always `NoData`, whatever the records say.
    pub fn build(
        aggregator: &Aggregator<'_>,
        records: &[RawInsightRecord],
        year: i32,
        today: NaiveDate,
    ) -> Self {
        let mut months = MonthlyCpls::empty();

        for (key, bucket) in aggregator.by_month(records) {
            if key.year != year || !month_has_started(key, today) {
                continue;
            }
            if let Some(slot) = months.0.get_mut((key.month - 1) as usize) {
                *slot = PeriodCpl::Value(bucket.cpl());
            }
        }

        Self::from_months(year, months)
    }

    pub fn from_months(year: i32, months: MonthlyCpls) -> Self {
        let quarters = [1, 2, 3, 4].map(|quarter| {
            let monthly_cpls = months.quarter(quarter);
            QuarterSummary {
                monthly_cpls,
                average_cpl: mean_of_available(&monthly_cpls),
            }
        });

        Self {
            year,
            months,
            quarters,
        }
    }

    /// `quarter` is 1-based.
    pub fn quarter(&self, quarter: u32) -> Option<&QuarterSummary> {
        quarter
            .checked_sub(1)
            .and_then(|index| self.quarters.get(index as usize))
    }
}

fn month_has_started(key: MonthKey, today: NaiveDate) -> bool {
    NaiveDate::from_ymd_opt(key.year, key.month, 1).is_some_and(|start| start <= today)
}

/// Arithmetic mean of the values present; `NoData` months are skipped rather than zero-filled.
pub fn mean_of_available(cpls: &[PeriodCpl]) -> PeriodCpl {
    let values: Vec<Decimal> = cpls.iter().filter_map(|cpl| cpl.value()).collect();
    if values.is_empty() {
        return PeriodCpl::NoData;
    }
    let sum: Decimal = values.iter().copied().sum();
    PeriodCpl::Value((sum / Decimal::from(values.len())).round_dp(CPL_SCALE))
}
