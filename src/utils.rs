use crate::errors::HarvestResult;
use crate::results::{ProductRef, ReviewPageLink, SearchQuery};
use url::Url;

/// Query parameter the marketplace uses to select a review page
const PAGE_NUMBER_PARAM: &str = "pageNumber";

/// Builds the absolute URLs visited during a run from the marketplace base URL
#[derive(Debug, Clone)]
pub struct SiteUrls {
    base: Url,
}

impl SiteUrls {
    pub fn new(base_url: &str) -> HarvestResult<Self> {
        Ok(Self {
            base: Url::parse(base_url)?,
        })
    }

    /// Search results page for a query, e.g. `/s?k=maternity+wear`
    pub fn search_url(&self, query: &SearchQuery) -> HarvestResult<Url> {
        let mut url = self.base.join("/s")?;
        url.query_pairs_mut().append_pair("k", query.as_str());
        Ok(url)
    }

    /// Product detail page, e.g. `/dp/B09XYZ1234`
    pub fn product_url(&self, product: &ProductRef) -> HarvestResult<Url> {
        Ok(self.base.join(&format!("/dp/{}", product.as_str()))?)
    }

    /// Review listing page `page_number` for a product's review link.
    ///
    /// Any page number already present on the link is replaced.
    pub fn review_page_url(&self, link: &ReviewPageLink, page_number: u32) -> HarvestResult<Url> {
        let mut url = self.base.join(link.as_str())?;
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != PAGE_NUMBER_PARAM)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair(PAGE_NUMBER_PARAM, &page_number.to_string());
        Ok(url)
    }
}

/// Convert a string to a sanitized file or collection name
pub fn sanitize_filename(name: &str) -> String {
    let mut name = name
        .trim()
        .replace("http://", "")
        .replace("https://", "")
        .to_lowercase();
    name = name.replace(['/', ':', '?', '&', '=', '#', '%', '+', ' ', '.', '\\'], "_");

    // Limit filename length
    if name.len() > 100 {
        name.chars().take(100).collect()
    } else {
        name
    }
}
