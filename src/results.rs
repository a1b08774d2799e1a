use crate::errors::{HarvestError, HarvestResult};
use crate::utils::SiteUrls;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Free-text search term supplied once per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Create a query, rejecting terms that are empty after trimming
    pub fn new(term: &str) -> HarvestResult<Self> {
        let term = term.trim();
        if term.is_empty() {
            return Err(HarvestError::Config("search query is empty".to_string()));
        }
        Ok(Self(term.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Marketplace identifier of a single listing (ASIN)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductRef(String);

impl ProductRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Relative link to a product's review listing, as found on the product page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewPageLink(String);

impl ReviewPageLink {
    pub fn new(href: impl Into<String>) -> Self {
        Self(href.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive the product identifier from the link path.
    ///
    /// Review links look like `/Some-Name/product-reviews/B0ABC123/ref=...`, so the
    /// identifier is the fourth `/`-separated segment.
    pub fn product_ref(&self) -> HarvestResult<ProductRef> {
        match self.0.split('/').nth(3) {
            Some(segment) => {
                let id = segment.split(['?', '&', '#']).next().unwrap_or_default();
                if id.is_empty() {
                    Err(HarvestError::MalformedLink(self.0.clone()))
                } else {
                    Ok(ProductRef::new(id))
                }
            }
            None => Err(HarvestError::MalformedLink(self.0.clone())),
        }
    }
}

impl fmt::Display for ReviewPageLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single customer review.
///
/// `None` marks a field that could not be extracted; it is never conflated with an
/// empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub title: Option<String>,
    pub rating: Option<f32>,
    pub body: Option<String>,
    pub size: Option<String>,
    pub product_ref: ProductRef,
}

impl Review {
    /// Create a review with every field missing
    pub fn empty(product_ref: ProductRef) -> Self {
        Self {
            title: None,
            rating: None,
            body: None,
            size: None,
            product_ref,
        }
    }
}

/// Per-product cursor over review pages
#[derive(Debug, Clone)]
pub struct PageState {
    link: ReviewPageLink,
    page_number: u32,
}

impl PageState {
    /// Start at page 1
    pub fn new(link: ReviewPageLink) -> Self {
        Self {
            link,
            page_number: 1,
        }
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    /// Move to the next page
    pub fn advance(&mut self) {
        self.page_number += 1;
    }

    /// Absolute URL of the current page
    pub fn page_url(&self, urls: &SiteUrls) -> HarvestResult<Url> {
        urls.review_page_url(&self.link, self.page_number)
    }
}
