use crate::crawlers::SiteProfile;
use crate::crawlers::pagination::{PaginationEnd, Paginator};
use crate::crawlers::session::{BrowserSession, PageFetcher};
use crate::errors::{HarvestError, HarvestResult};
use crate::results::{ProductRef, Review, SearchQuery};

/// Why a product contributed no reviews
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The product page was a challenge page
    ProductPageChallenged,
    /// The product page had no link to its review listing
    NoReviewLink,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedProduct {
    pub product_ref: ProductRef,
    pub reason: SkipReason,
}

/// Pagination summary for a product whose reviews were collected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginatedProduct {
    pub product_ref: ProductRef,
    pub pages_visited: u32,
    pub review_count: usize,
    pub end: PaginationEnd,
}

/// Everything a collection run produced
#[derive(Debug, Default)]
pub struct CollectionReport {
    /// All reviews, grouped by product in search order
    pub reviews: Vec<Review>,
    /// Product refs found on the search page
    pub products_found: usize,
    pub paginated: Vec<PaginatedProduct>,
    pub skipped: Vec<SkippedProduct>,
    /// The error that ended the run early; the other fields hold what was
    /// collected before it
    pub fatal: Option<HarvestError>,
}

impl CollectionReport {
    /// Whether every product found was processed
    pub fn is_complete(&self) -> bool {
        self.fatal.is_none()
    }
}

/// Drives a search, then paginates the reviews of every product it finds.
///
/// Products are processed one at a time in the order the search page lists them.
pub struct Collector<S> {
    fetcher: PageFetcher<S>,
    site: SiteProfile,
}

impl<S: BrowserSession> Collector<S> {
    pub fn new(fetcher: PageFetcher<S>, site: SiteProfile) -> Self {
        Self { fetcher, site }
    }

    /// Collect the reviews of every product the search for `query` returns.
    ///
    /// Challenged or review-less products are skipped and the run continues.
    /// A challenged or failed search page is returned as an error. Once products are
    /// being processed, a fetch failure or malformed review link stops the run and is
    /// recorded in [`CollectionReport::fatal`], keeping every review gathered so far.
    pub async fn collect(&mut self, query: &SearchQuery) -> HarvestResult<CollectionReport> {
        let search_url = self.site.urls.search_url(query)?;
        ::log::info!("Searching for {:?}: {}", query.as_str(), search_url);

        let html = self.fetcher.fetch(&search_url).await?;
        if self.site.detector.is_challenged(&html) {
            ::log::error!("Search page is a challenge page: {}", search_url);
            return Err(HarvestError::SearchChallenged {
                url: search_url.to_string(),
            });
        }

        let product_refs = self.site.extractor.extract_product_refs(&html);
        ::log::info!("Found {} products", product_refs.len());

        let mut report = CollectionReport {
            products_found: product_refs.len(),
            ..CollectionReport::default()
        };

        for (index, product_ref) in product_refs.into_iter().enumerate() {
            ::log::info!(
                "Processing product {} of {}: {}",
                index + 1,
                report.products_found,
                product_ref
            );
            if let Err(e) = self.collect_product(product_ref, &mut report).await {
                ::log::error!(
                    "Stopping after {} reviews: {}",
                    report.reviews.len(),
                    e
                );
                report.fatal = Some(e);
                break;
            }
        }

        ::log::info!(
            "Collected {} reviews from {} products ({} skipped) in {} page loads",
            report.reviews.len(),
            report.paginated.len(),
            report.skipped.len(),
            self.fetcher.fetch_count()
        );
        Ok(report)
    }

    // Reviews gathered before a pagination failure are added to the report before
    // the failure is returned.
    async fn collect_product(
        &mut self,
        product_ref: ProductRef,
        report: &mut CollectionReport,
    ) -> HarvestResult<()> {
        let product_url = self.site.urls.product_url(&product_ref)?;
        let html = self.fetcher.fetch(&product_url).await?;

        if self.site.detector.is_challenged(&html) {
            ::log::warn!("Challenge page for product {}, skipping", product_ref);
            report.skipped.push(SkippedProduct {
                product_ref,
                reason: SkipReason::ProductPageChallenged,
            });
            return Ok(());
        }

        let Some(link) = self.site.extractor.extract_review_link(&html) else {
            ::log::warn!("No review link for product {}, skipping", product_ref);
            report.skipped.push(SkippedProduct {
                product_ref,
                reason: SkipReason::NoReviewLink,
            });
            return Ok(());
        };

        let outcome = Paginator::new(&self.site)
            .run(&mut self.fetcher, &link)
            .await?;
        ::log::info!(
            "Product {}: {} reviews over {} pages ({:?})",
            product_ref,
            outcome.reviews.len(),
            outcome.pages_visited,
            outcome.end
        );

        report.paginated.push(PaginatedProduct {
            product_ref: outcome.product_ref,
            pages_visited: outcome.pages_visited,
            review_count: outcome.reviews.len(),
            end: outcome.end,
        });
        report.reviews.extend(outcome.reviews);
        match outcome.failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Release the browser session
    pub async fn close(self) -> HarvestResult<()> {
        self.fetcher.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HarvestConfig;
    use crate::test_support::{
        NextPage, ScriptedSession, challenge_page, product_page, product_url, review_block,
        review_link_for, review_page, review_url, search_page, search_url,
    };

    fn collector(session: ScriptedSession) -> Collector<ScriptedSession> {
        let site = SiteProfile::from_config(&HarvestConfig::default()).unwrap();
        Collector::new(PageFetcher::new(session), site)
    }

    fn query() -> SearchQuery {
        SearchQuery::new("maternity dress").unwrap()
    }

    fn reviews(titles: &[&str], next: NextPage) -> String {
        let blocks: Vec<String> = titles
            .iter()
            .map(|t| review_block(t, "5.0", "Lovely", "L"))
            .collect();
        review_page(&blocks, next)
    }

    #[tokio::test]
    async fn test_two_products_four_reviews() {
        let link_a = review_link_for("B0A");
        let link_b = review_link_for("B0B");
        let session = ScriptedSession::new()
            .page(&search_url("maternity dress"), search_page(&["B0A", "B0B"]))
            .page(&product_url("B0A"), product_page(Some(&link_a)))
            .page(&review_url("B0A", 1), reviews(&["a1", "a2"], NextPage::Disabled))
            .page(&product_url("B0B"), product_page(Some(&link_b)))
            .page(&review_url("B0B", 1), reviews(&["b1"], NextPage::Enabled))
            .page(&review_url("B0B", 2), reviews(&["b2"], NextPage::Disabled));
        let log = session.log();
        let mut collector = collector(session);

        let report = collector.collect(&query()).await.unwrap();

        assert_eq!(report.products_found, 2);
        assert_eq!(report.reviews.len(), 4);
        let refs: Vec<&str> = report.reviews.iter().map(|r| r.product_ref.as_str()).collect();
        assert_eq!(refs, vec!["B0A", "B0A", "B0B", "B0B"]);
        let titles: Vec<&str> = report
            .reviews
            .iter()
            .filter_map(|r| r.title.as_deref())
            .collect();
        assert_eq!(titles, vec!["a1", "a2", "b1", "b2"]);
        assert!(report.skipped.is_empty());
        assert_eq!(report.paginated.len(), 2);
        assert_eq!(report.paginated[1].pages_visited, 2);

        assert_eq!(
            log.lock().unwrap().visited,
            vec![
                search_url("maternity dress"),
                product_url("B0A"),
                review_url("B0A", 1),
                product_url("B0B"),
                review_url("B0B", 1),
                review_url("B0B", 2),
            ]
        );
    }

    #[tokio::test]
    async fn test_challenged_product_is_skipped() {
        let link_b = review_link_for("B0B");
        let session = ScriptedSession::new()
            .page(&search_url("maternity dress"), search_page(&["B0A", "B0B"]))
            .page(&product_url("B0A"), challenge_page())
            .page(&product_url("B0B"), product_page(Some(&link_b)))
            .page(&review_url("B0B", 1), reviews(&["b1", "b2"], NextPage::Absent));
        let log = session.log();
        let mut collector = collector(session);

        let report = collector.collect(&query()).await.unwrap();

        assert_eq!(report.reviews.len(), 2);
        assert!(report.reviews.iter().all(|r| r.product_ref.as_str() == "B0B"));
        assert_eq!(
            report.skipped,
            vec![SkippedProduct {
                product_ref: ProductRef::new("B0A"),
                reason: SkipReason::ProductPageChallenged,
            }]
        );
        // Nothing beyond the challenged product page was requested for B0A
        assert!(!log
            .lock()
            .unwrap()
            .visited
            .iter()
            .any(|url| url.contains("product-reviews/B0A")));
    }

    #[tokio::test]
    async fn test_product_without_review_link_is_skipped() {
        let session = ScriptedSession::new()
            .page(&search_url("maternity dress"), search_page(&["B0A"]))
            .page(&product_url("B0A"), product_page(None));
        let mut collector = collector(session);

        let report = collector.collect(&query()).await.unwrap();

        assert!(report.reviews.is_empty());
        assert_eq!(report.skipped[0].reason, SkipReason::NoReviewLink);
    }

    #[tokio::test]
    async fn test_challenge_mid_pagination_keeps_partial_reviews() {
        let link_a = review_link_for("B0A");
        let session = ScriptedSession::new()
            .page(&search_url("maternity dress"), search_page(&["B0A"]))
            .page(&product_url("B0A"), product_page(Some(&link_a)))
            .page(&review_url("B0A", 1), reviews(&["a1"], NextPage::Enabled))
            .page(&review_url("B0A", 2), challenge_page());
        let mut collector = collector(session);

        let report = collector.collect(&query()).await.unwrap();

        assert_eq!(report.reviews.len(), 1);
        assert_eq!(report.paginated[0].end, PaginationEnd::Challenged { page: 2 });
    }

    #[tokio::test]
    async fn test_empty_search_results() {
        let session =
            ScriptedSession::new().page(&search_url("maternity dress"), search_page(&[]));
        let mut collector = collector(session);

        let report = collector.collect(&query()).await.unwrap();

        assert_eq!(report.products_found, 0);
        assert!(report.reviews.is_empty());
    }

    #[tokio::test]
    async fn test_challenged_search_page_is_fatal() {
        let session = ScriptedSession::new().page(&search_url("maternity dress"), challenge_page());
        let mut collector = collector(session);

        let result = collector.collect(&query()).await;
        assert!(matches!(result, Err(HarvestError::SearchChallenged { .. })));
    }

    #[tokio::test]
    async fn test_fetch_failure_stops_run_and_keeps_earlier_products() {
        let link_a = review_link_for("B0A");
        let session = ScriptedSession::new()
            .page(
                &search_url("maternity dress"),
                search_page(&["B0A", "B0B", "B0C"]),
            )
            .page(&product_url("B0A"), product_page(Some(&link_a)))
            .page(&review_url("B0A", 1), reviews(&["a1", "a2"], NextPage::Absent))
            .failing(&product_url("B0B"));
        let log = session.log();
        let mut collector = collector(session);

        let report = collector.collect(&query()).await.unwrap();

        assert!(!report.is_complete());
        assert!(matches!(report.fatal, Some(HarvestError::Fetch(_))));
        assert_eq!(report.reviews.len(), 2);
        assert!(report.reviews.iter().all(|r| r.product_ref.as_str() == "B0A"));
        // B0C was never reached
        assert!(!log
            .lock()
            .unwrap()
            .visited
            .contains(&product_url("B0C")));
    }

    #[tokio::test]
    async fn test_fetch_failure_mid_pagination_keeps_earlier_pages() {
        let link_a = review_link_for("B0A");
        let session = ScriptedSession::new()
            .page(&search_url("maternity dress"), search_page(&["B0A", "B0B"]))
            .page(&product_url("B0A"), product_page(Some(&link_a)))
            .page(&review_url("B0A", 1), reviews(&["a1"], NextPage::Enabled))
            .failing(&review_url("B0A", 2));
        let log = session.log();
        let mut collector = collector(session);

        let report = collector.collect(&query()).await.unwrap();

        assert!(matches!(report.fatal, Some(HarvestError::Fetch(_))));
        assert_eq!(report.reviews.len(), 1);
        assert_eq!(report.paginated[0].end, PaginationEnd::Failed { page: 2 });
        assert!(!log
            .lock()
            .unwrap()
            .visited
            .contains(&product_url("B0B")));
    }

    #[tokio::test]
    async fn test_failed_search_page_is_an_error() {
        let session = ScriptedSession::new().failing(&search_url("maternity dress"));
        let mut collector = collector(session);

        let result = collector.collect(&query()).await;
        assert!(matches!(result, Err(HarvestError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_successful_run_is_complete() {
        let session =
            ScriptedSession::new().page(&search_url("maternity dress"), search_page(&[]));
        let mut collector = collector(session);

        let report = collector.collect(&query()).await.unwrap();
        assert!(report.is_complete());
    }
}
