mod aggregate;
pub mod domain;
mod filter;
mod graph;
mod leads;
pub mod report;
mod rollup;
mod source;

pub use aggregate::{cost_per_lead, Aggregator, DailyMetric, DayAggregate, MonthKey, RangeStats};
pub use domain::{
    ActionValue, DateRange, Granularity, PeriodCpl, RawInsightRecord, ReportError,
    MESSAGING_CONVERSATION_STARTED_7D, NO_DATA_LABEL,
};
pub use filter::CampaignFilter;
pub use graph::{appsecret_proof, normalize_account_id, GraphInsightsClient};
pub use leads::{extract_lead_count, LeadCountError};
pub use report::views::{
    AccountRangeView, AccountYearlyView, MonthlyAverages, QuarterView, QuarterlyData,
    RangeReport, YearlyReport,
};
pub use report::{InsightReporter, RangeQuery, DEFAULT_RANGE_DAYS};
pub use rollup::{mean_of_available, MonthlyCpls, QuarterSummary, YearlyRollup};
pub use source::{
    FetchError, FetchOutcome, InsightFetcher, InsightSource, SourceStatus, SourceView,
};
