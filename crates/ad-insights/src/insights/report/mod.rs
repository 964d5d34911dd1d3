mod range;
mod yearly;
pub mod views;

pub use range::{DEFAULT_RANGE_DAYS, RangeQuery};

use crate::config::{AdAccountConfig, AppConfig};
use crate::insights::aggregate::Aggregator;
use crate::insights::filter::CampaignFilter;
use crate::insights::source::{InsightFetcher, InsightSource};
use std::sync::Arc;

/// Builds the CPL reports for the two configured ad accounts.
#[derive(Debug, Clone)]
pub struct InsightReporter {
    fetcher: InsightFetcher,
    accounts: [AdAccountConfig; 2],
    filter: CampaignFilter,
}

impl InsightReporter {
    pub fn new(
        source: Arc<dyn InsightSource>,
        accounts: [AdAccountConfig; 2],
        filter: CampaignFilter,
    ) -> Self {
        Self {
            fetcher: InsightFetcher::new(source),
            accounts,
            filter,
        }
    }

    pub fn from_config(config: &AppConfig, source: Arc<dyn InsightSource>) -> Self {
        Self::new(
            source,
            config.accounts.clone(),
            CampaignFilter::new(&config.excluded_campaign_terms),
        )
    }

    pub fn accounts(&self) -> &[AdAccountConfig; 2] {
        &self.accounts
    }

    fn aggregator(&self) -> Aggregator<'_> {
        Aggregator::new(&self.filter)
    }
}
