use crate::errors::{HarvestError, HarvestResult};
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use std::time::{Duration, Instant};
use url::Url;

/// A controllable browser holding exactly one current page
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigate to `url` and wait for it to load
    async fn navigate(&mut self, url: &str) -> HarvestResult<()>;

    /// Rendered HTML of the current page
    async fn current_html(&mut self) -> HarvestResult<String>;

    /// End the session
    async fn close(&mut self) -> HarvestResult<()>;
}

/// Browser session driven over the WebDriver protocol
pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    /// Connects to the WebDriver instance.
    ///
    /// Falls back to the usual local WebDriver ports if `webdriver_url` does not answer.
    pub async fn connect(webdriver_url: &str) -> HarvestResult<Self> {
        let first_error = match ClientBuilder::native().connect(webdriver_url).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", webdriver_url);
                return Ok(Self { client });
            }
            Err(e) => {
                ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
                e
            }
        };

        let fallback_urls = [
            "http://localhost:9515", // ChromeDriver default
            "http://localhost:4444", // geckodriver / Selenium default
            "http://127.0.0.1:4444", // Try with IP instead of localhost
        ];

        for url in fallback_urls.iter() {
            if *url == webdriver_url {
                continue;
            }

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            // Don't log fallback errors to avoid log spam
            if let Ok(client) = ClientBuilder::native().connect(url).await {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(Self { client });
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(first_error.into())
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn navigate(&mut self, url: &str) -> HarvestResult<()> {
        self.client
            .goto(url)
            .await
            .map_err(|e| navigation_error(e, "navigating to", url))
    }

    async fn current_html(&mut self) -> HarvestResult<String> {
        self.client
            .source()
            .await
            .map_err(|e| navigation_error(e, "getting source for", "current page"))
    }

    async fn close(&mut self) -> HarvestResult<()> {
        self.client
            .clone()
            .close()
            .await
            .map_err(|e| HarvestError::Session(e.to_string()))
    }
}

/// Logs a navigation or page source error and converts it into a fetch error
fn navigation_error(error: fantoccini::error::CmdError, context: &str, url: &str) -> HarvestError {
    if error.to_string().contains("Unable to find session") {
        ::log::warn!("Lost WebDriver session while {} {}", context, url);
    } else {
        ::log::error!("Failed {} {}: {}", context, url, error);
    }
    error.into()
}

/// Fetches rendered pages through a single browser session reused for the whole run
pub struct PageFetcher<S> {
    session: S,
    delay: Duration,
    fetches: usize,
}

impl<S: BrowserSession> PageFetcher<S> {
    pub fn new(session: S) -> Self {
        Self {
            session,
            delay: Duration::ZERO,
            fetches: 0,
        }
    }

    /// Wait this long before every navigation after the first
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Navigate to `url` and return its rendered HTML.
    ///
    /// Every call hits the browser; nothing is cached. Challenge pages are returned
    /// like any other page.
    pub async fn fetch(&mut self, url: &Url) -> HarvestResult<String> {
        if self.fetches > 0 && !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.fetches += 1;

        let started = Instant::now();
        ::log::debug!("FETCH: {}", url);

        self.session.navigate(url.as_str()).await?;
        let html = self.session.current_html().await?;

        ::log::debug!(
            "Fetched {} ({} bytes) in {:.2} seconds",
            url,
            html.len(),
            started.elapsed().as_secs_f64()
        );
        Ok(html)
    }

    /// Number of navigations issued so far
    pub fn fetch_count(&self) -> usize {
        self.fetches
    }

    /// Release the browser session
    pub async fn close(mut self) -> HarvestResult<()> {
        self.session.close().await
    }
}
