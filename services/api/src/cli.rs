use crate::console::{run_range_report, run_yearly_report, RangeReportArgs, YearlyReportArgs};
use crate::server;
use ad_insights::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Ad Insights CPL Report",
    about = "Serve or print cost-per-lead reports for the configured Meta ad accounts",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Fetch insights and print a CPL report to the terminal
    Report {
        #[command(subcommand)]
        command: ReportCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ReportCommand {
    /// Daily CPL over a date range (defaults to the last 30 days)
    Range(RangeReportArgs),
    /// Monthly and quarterly CPL for the current calendar year
    Yearly(YearlyReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report {
            command: ReportCommand::Range(args),
        } => run_range_report(args).await,
        Command::Report {
            command: ReportCommand::Yearly(args),
        } => run_yearly_report(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["ad-insights-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_range_report_dates() {
        let cli = Cli::try_parse_from([
            "ad-insights-api",
            "report",
            "range",
            "--start-date",
            "2024-03-01",
            "--end-date",
            "2024-03-31",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Report {
                command: ReportCommand::Range(args),
            }) => {
                assert_eq!(args.start_date.as_deref(), Some("2024-03-01"));
                assert_eq!(args.end_date.as_deref(), Some("2024-03-31"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_yearly_date() {
        let result =
            Cli::try_parse_from(["ad-insights-api", "report", "yearly", "--today", "May 20"]);
        assert!(result.is_err());
    }
}
