pub mod collector;
pub mod pagination;
pub mod session;

use crate::config::HarvestConfig;
use crate::errors::HarvestResult;
use crate::filter::ChallengeDetector;
use crate::parsers::Extractor;
use crate::utils::SiteUrls;

/// Everything a crawl needs to know about the marketplace, built once per run
#[derive(Debug)]
pub struct SiteProfile {
    pub urls: SiteUrls,
    pub extractor: Extractor,
    pub detector: ChallengeDetector,
    /// Upper bound on review pages per product
    pub max_review_pages: Option<u32>,
}

impl SiteProfile {
    /// Compile selectors, markers and URLs; fails on any invalid configuration value
    pub fn from_config(config: &HarvestConfig) -> HarvestResult<Self> {
        config.validate()?;
        Ok(Self {
            urls: SiteUrls::new(&config.base_url)?,
            extractor: Extractor::new(&config.selectors)?,
            detector: ChallengeDetector::from_config(config)?,
            max_review_pages: config.max_review_pages,
        })
    }
}
