use crate::infra::{build_reporter, local_today};
use ad_insights::config::AppConfig;
use ad_insights::error::AppError;
use ad_insights::insights::{
    AccountRangeView, AccountYearlyView, RangeQuery, RangeReport, SourceView, YearlyReport,
};
use ad_insights::telemetry;
use chrono::NaiveDate;
use clap::Args;

#[derive(Args, Debug, Default)]
pub(crate) struct RangeReportArgs {
    /// First day of the report (YYYY-MM-DD). Defaults to 30 days before the end date.
    #[arg(long)]
    pub(crate) start_date: Option<String>,
    /// Last day of the report (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub(crate) end_date: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct YearlyReportArgs {
    /// Override the reporting date (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) async fn run_range_report(args: RangeReportArgs) -> Result<(), AppError> {
    let RangeReportArgs {
        start_date,
        end_date,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let range = RangeQuery {
        start_date,
        end_date,
    }
    .resolve(local_today())?;
    let reporter = build_reporter(&config)?;

    let report = reporter.range_report(range).await;
    render_range_report(&report);
    Ok(())
}

pub(crate) async fn run_yearly_report(args: YearlyReportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let today = args.today.unwrap_or_else(local_today);
    let reporter = build_reporter(&config)?;

    let report = reporter.yearly_report(today).await;
    render_yearly_report(&report);
    Ok(())
}

fn render_range_report(report: &RangeReport) {
    println!("CPL report");
    println!("Window: {} -> {}", report.start_date, report.end_date);

    for account in [&report.account1, &report.account2] {
        render_account_range(account);
    }
}

fn render_account_range(account: &AccountRangeView) {
    println!("\n{} ({})", account.name, describe_source(&account.source));

    let stats = &account.stats;
    if stats.daily_metrics.is_empty() {
        println!("- no lead-bearing spend in this window");
    }
    for metric in &stats.daily_metrics {
        println!(
            "- {}: CPL {:.2} | spend {:.2} | {} leads",
            metric.date, metric.cpl, metric.total_spend, metric.total_results
        );
    }
    println!(
        "Average CPL {:.2} | total spend {:.2} | {} leads",
        stats.average_cpl, stats.total_spend, stats.total_results
    );
}

fn render_yearly_report(report: &YearlyReport) {
    println!("Yearly CPL report {}", report.year);

    for account in [&report.account1, &report.account2] {
        render_account_yearly(account);
    }
}

fn render_account_yearly(account: &AccountYearlyView) {
    println!("\n{} ({})", account.name, describe_source(&account.source));

    println!("Quarters");
    for (label, quarter) in account.quarterly_data.iter() {
        let [first, second, third] = quarter.monthly_cpls;
        println!(
            "- {}: avg {} (months {} / {} / {})",
            label, quarter.average_cpl, first, second, third
        );
    }

    println!("Months");
    for (month, cpl) in account.monthly_averages.iter() {
        println!("- {}: {}", month, cpl);
    }
}

fn describe_source(source: &SourceView) -> String {
    match &source.error {
        Some(error) => format!("{}: {}", source.status.label(), error),
        None => source.status.label().to_string(),
    }
}
