use crate::errors::{HarvestError, HarvestResult};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Configuration for a review collection run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Marketplace origin that search, product and review URLs are built on
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Fixed delay between consecutive page loads, in milliseconds
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// Stop paginating a product after this many review pages
    #[serde(default)]
    pub max_review_pages: Option<u32>,

    /// Literal strings whose presence marks a bot-challenge page
    #[serde(default = "default_challenge_markers")]
    pub challenge_markers: Vec<String>,

    /// Regex patterns whose match marks a bot-challenge page
    #[serde(default)]
    pub challenge_patterns: Vec<String>,

    /// Page structure the extractor relies on
    #[serde(default)]
    pub selectors: SelectorConfig,
}

/// CSS selectors and literal markers for the marketplace's page layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// One block per search result
    pub search_result: String,
    /// Attribute on a search result block holding the product identifier
    pub product_id_attr: String,
    /// "See all reviews" anchor on the product page
    pub review_link: String,
    /// One block per review on a review page
    pub review: String,
    pub review_title: String,
    pub review_rating: String,
    /// Suffix stripped from the rating text before parsing, e.g. " out of 5 stars"
    pub rating_suffix: String,
    pub review_body: String,
    /// Icon separating the variant fields (size, colour) of a review
    pub size_separator: String,
    pub size_prefix: String,
    /// Pagination control on a review page
    pub pagination: String,
    /// Last-page marker in its disabled state
    pub last_page_disabled: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            search_result: r#"div[data-component-type="s-search-result"]"#.to_string(),
            product_id_attr: "data-asin".to_string(),
            review_link: r#"a[data-hook="see-all-reviews-link-foot"]"#.to_string(),
            review: r#"div[data-hook="review"]"#.to_string(),
            review_title: r#"a[data-hook="review-title"]"#.to_string(),
            review_rating: r#"i[data-hook="review-star-rating"]"#.to_string(),
            rating_suffix: " out of 5 stars".to_string(),
            review_body: r#"span[data-hook="review-body"]"#.to_string(),
            size_separator: "i.a-icon.a-icon-text-separator".to_string(),
            size_prefix: "Size: ".to_string(),
            pagination: "ul.a-pagination".to_string(),
            last_page_disabled: "li.a-disabled.a-last".to_string(),
        }
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            webdriver_url: default_webdriver_url(),
            page_delay_ms: default_page_delay_ms(),
            max_review_pages: None,
            challenge_markers: default_challenge_markers(),
            challenge_patterns: Vec::new(),
            selectors: SelectorConfig::default(),
        }
    }
}

impl HarvestConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> HarvestResult<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| {
            HarvestError::Config(format!("cannot open {}: {}", path.display(), e))
        })?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> HarvestResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make a run meaningless
    pub fn validate(&self) -> HarvestResult<()> {
        if self.max_review_pages == Some(0) {
            return Err(HarvestError::Config(
                "max_review_pages must be at least 1".to_string(),
            ));
        }
        if self.challenge_markers.iter().any(|m| m.is_empty()) {
            return Err(HarvestError::Config(
                "challenge markers must not be empty strings".to_string(),
            ));
        }
        Ok(())
    }
}

/// Default value for base_url
fn default_base_url() -> String {
    "https://www.amazon.in".to_string()
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_page_delay_ms() -> u64 {
    2000
}

/// The support address the marketplace prints on its robot-check page
fn default_challenge_markers() -> Vec<String> {
    vec!["api-services-support@amazon.com".to_string()]
}
