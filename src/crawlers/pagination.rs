use crate::crawlers::SiteProfile;
use crate::crawlers::session::{BrowserSession, PageFetcher};
use crate::errors::{HarvestError, HarvestResult};
use crate::results::{PageState, ProductRef, Review, ReviewPageLink};

/// Why pagination of a product stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationEnd {
    /// The last page reported no next page
    Exhausted,
    /// Page `page` was a challenge page; reviews before it are kept
    Challenged { page: u32 },
    /// The configured page limit was reached at page `page`
    PageLimit { page: u32 },
    /// Fetching page `page` failed; reviews before it are kept
    Failed { page: u32 },
}

/// Reviews gathered for one product and how pagination ended
#[derive(Debug)]
pub struct PaginationOutcome {
    pub product_ref: ProductRef,
    pub reviews: Vec<Review>,
    /// Pages requested, including a final challenged or failed page
    pub pages_visited: u32,
    pub end: PaginationEnd,
    /// The fetch error behind [`PaginationEnd::Failed`]
    pub failure: Option<HarvestError>,
}

/// Walks one product's review pages from page 1 until they run out.
///
/// Each page is fetched exactly once; its HTML serves both review extraction and the
/// next-page check. Page numbers ascend by one with no page revisited.
pub struct Paginator<'a> {
    site: &'a SiteProfile,
}

impl<'a> Paginator<'a> {
    pub fn new(site: &'a SiteProfile) -> Self {
        Self { site }
    }

    /// Collects every review reachable from `link`.
    ///
    /// A challenge page ends pagination without error. A fetch failure also ends it,
    /// with the error in [`PaginationOutcome::failure`] next to the reviews gathered
    /// so far. Only a malformed link is returned as an error.
    pub async fn run<S: BrowserSession>(
        &self,
        fetcher: &mut PageFetcher<S>,
        link: &ReviewPageLink,
    ) -> HarvestResult<PaginationOutcome> {
        let product_ref = link.product_ref()?;
        let mut state = PageState::new(link.clone());
        let mut reviews = Vec::new();
        let mut failure = None;

        let end = loop {
            let page = state.page_number();
            let url = state.page_url(&self.site.urls)?;
            let html = match fetcher.fetch(&url).await {
                Ok(html) => html,
                Err(e) => {
                    ::log::error!(
                        "Review page {} of {} failed, keeping {} reviews: {}",
                        page,
                        product_ref,
                        reviews.len(),
                        e
                    );
                    failure = Some(e);
                    break PaginationEnd::Failed { page };
                }
            };

            if self.site.detector.is_challenged(&html) {
                ::log::warn!(
                    "Challenge page on review page {} of {}, keeping {} reviews",
                    page,
                    product_ref,
                    reviews.len()
                );
                break PaginationEnd::Challenged { page };
            }

            let page_reviews = self.site.extractor.extract_reviews(&html, &product_ref);
            ::log::debug!(
                "Review page {} of {} has {} reviews",
                page,
                product_ref,
                page_reviews.len()
            );
            reviews.extend(page_reviews);

            if !self.site.extractor.has_next_page(&html) {
                break PaginationEnd::Exhausted;
            }
            if self.site.max_review_pages.is_some_and(|max| page >= max) {
                ::log::info!("Page limit reached for {} at page {}", product_ref, page);
                break PaginationEnd::PageLimit { page };
            }
            state.advance();
        };

        Ok(PaginationOutcome {
            product_ref,
            reviews,
            pages_visited: state.page_number(),
            end,
            failure,
        })
    }
}
