use crate::insights::aggregate::RangeStats;
use crate::insights::domain::PeriodCpl;
use crate::insights::rollup::{MonthlyCpls, QuarterSummary, YearlyRollup};
use crate::insights::source::SourceView;
use chrono::{Month, NaiveDate};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub account1: AccountRangeView,
    pub account2: AccountRangeView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountRangeView {
    pub name: String,
    pub source: SourceView,
    pub stats: RangeStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearlyReport {
    pub year: i32,
    pub account1: AccountYearlyView,
    pub account2: AccountYearlyView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountYearlyView {
    pub name: String,
    pub source: SourceView,
    pub quarterly_data: QuarterlyData,
    pub monthly_averages: MonthlyAverages,
}

impl AccountYearlyView {
    pub fn new(name: String, source: SourceView, rollup: &YearlyRollup) -> Self {
        let [q1, q2, q3, q4] = rollup.quarters.map(QuarterView::from);
        Self {
            name,
            source,
            quarterly_data: QuarterlyData { q1, q2, q3, q4 },
            monthly_averages: MonthlyAverages(rollup.months),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuarterlyData {
    pub q1: QuarterView,
    pub q2: QuarterView,
    pub q3: QuarterView,
    pub q4: QuarterView,
}

impl QuarterlyData {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &QuarterView)> {
        [
            ("Q1", &self.q1),
            ("Q2", &self.q2),
            ("Q3", &self.q3),
            ("Q4", &self.q4),
        ]
        .into_iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterView {
    pub monthly_cpls: [PeriodCpl; 3],
    pub average_cpl: PeriodCpl,
}

impl From<QuarterSummary> for QuarterView {
    fn from(summary: QuarterSummary) -> Self {
        Self {
            monthly_cpls: summary.monthly_cpls,
            average_cpl: summary.average_cpl,
        }
    }
}

/// Month name to CPL, serialized as a JSON object in calendar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyAverages(pub MonthlyCpls);

impl MonthlyAverages {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, PeriodCpl)> + '_ {
        self.0.iter().map(|(month, cpl)| (month_name(month), cpl))
    }
}

impl Serialize for MonthlyAverages {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(12))?;
        for (name, cpl) in self.iter() {
            map.serialize_entry(name, &cpl)?;
        }
        map.end()
    }
}

pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|month| Month::try_from(month).ok())
        .map_or("Unknown", |month| month.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn month_names_are_english_and_one_based() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(13), "Unknown");
    }

    #[test]
    fn monthly_averages_keep_calendar_order() {
        let months = MonthlyCpls::empty();
        let rollup = YearlyRollup::from_months(2024, months);
        let view = AccountYearlyView::new(
            "Bella Serra".to_string(),
            SourceView {
                status: crate::insights::source::SourceStatus::NotConfigured,
                error: None,
            },
            &rollup,
        );

        let json = serde_json::to_string(&view.monthly_averages).expect("serializes");
        assert!(json.starts_with("{\"January\":\"N/D\",\"February\":\"N/D\""));
        assert!(json.ends_with("\"December\":\"N/D\"}"));
    }

    #[test]
    fn quarter_view_uses_camel_case_keys() {
        let view = QuarterView {
            monthly_cpls: [
                PeriodCpl::Value(Decimal::new(10, 0)),
                PeriodCpl::NoData,
                PeriodCpl::Value(Decimal::new(20, 0)),
            ],
            average_cpl: PeriodCpl::Value(Decimal::new(15, 0)),
        };
        let json = serde_json::to_value(&view).expect("serializes");
        assert_eq!(
            json,
            serde_json::json!({"monthlyCpls": [10.0, "N/D", 20.0], "averageCpl": 15.0})
        );
    }
}
