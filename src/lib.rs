pub mod config;
pub mod crawlers;
pub mod errors;
pub mod filter;
pub mod parsers;
pub mod results;
pub mod store;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types for convenience
pub use crawlers::collector::CollectionReport;
pub use errors::{HarvestError, HarvestResult};
pub use results::{ProductRef, Review};

use config::HarvestConfig;
use crawlers::SiteProfile;
use crawlers::collector::Collector;
use crawlers::session::{BrowserSession, PageFetcher, WebDriverSession};
use results::SearchQuery;
use std::time::Duration;

/// Builder for a single review collection run
pub struct Harvest {
    query: String,
    config: HarvestConfig,
    explicit_webdriver_url: bool,
}

impl Harvest {
    /// Create a run for the given search query with default configuration
    pub fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            config: HarvestConfig::default(),
            explicit_webdriver_url: false,
        }
    }

    /// Set the configuration
    pub fn with_config(mut self, config: HarvestConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(self, path: impl AsRef<std::path::Path>) -> HarvestResult<Self> {
        let config = HarvestConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a string
    pub fn with_config_str(self, config_str: &str) -> HarvestResult<Self> {
        let config = HarvestConfig::from_json(config_str)?;
        Ok(self.with_config(config))
    }

    /// Override the WebDriver URL, taking precedence over `WEBDRIVER_URL`
    pub fn with_webdriver_url(mut self, webdriver_url: &str) -> Self {
        self.config.webdriver_url = webdriver_url.to_string();
        self.explicit_webdriver_url = true;
        self
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Connect to WebDriver, collect, and release the session.
    ///
    /// A failure after products are being processed does not discard their reviews:
    /// the report is returned with [`CollectionReport::fatal`] set.
    ///
    /// The `WEBDRIVER_URL` environment variable overrides the configured WebDriver URL
    /// unless one was set with [`Harvest::with_webdriver_url`].
    pub async fn run(mut self) -> HarvestResult<CollectionReport> {
        if !self.explicit_webdriver_url {
            if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
                if !webdriver_url.is_empty() {
                    self.config.webdriver_url = webdriver_url;
                }
            }
        }

        // Validate everything before a browser is started
        let query = SearchQuery::new(&self.query)?;
        let site = SiteProfile::from_config(&self.config)?;

        let session = WebDriverSession::connect(&self.config.webdriver_url).await?;
        execute(session, site, &query, &self.config).await
    }

    /// Collect using an already acquired browser session, closing it afterwards
    pub async fn run_with_session<S: BrowserSession>(
        self,
        mut session: S,
    ) -> HarvestResult<CollectionReport> {
        let prepared = SearchQuery::new(&self.query)
            .and_then(|query| SiteProfile::from_config(&self.config).map(|site| (query, site)));

        match prepared {
            Ok((query, site)) => execute(session, site, &query, &self.config).await,
            Err(e) => {
                if let Err(close_err) = session.close().await {
                    ::log::warn!("Failed to close browser session: {}", close_err);
                }
                Err(e)
            }
        }
    }
}

/// Runs the collector inside one session scope; the session is closed on every exit path
async fn execute<S: BrowserSession>(
    session: S,
    site: SiteProfile,
    query: &SearchQuery,
    config: &HarvestConfig,
) -> HarvestResult<CollectionReport> {
    let fetcher =
        PageFetcher::new(session).with_delay(Duration::from_millis(config.page_delay_ms));
    let mut collector = Collector::new(fetcher, site);

    let result = collector.collect(query).await;
    match &result {
        Err(e) => ::log::error!("Collection run failed: {}", e),
        Ok(report) => {
            if let Some(e) = &report.fatal {
                ::log::error!(
                    "Collection run stopped early with {} reviews: {}",
                    report.reviews.len(),
                    e
                );
            }
        }
    }

    if let Err(e) = collector.close().await {
        ::log::warn!("Failed to close browser session: {}", e);
    }
    result
}
