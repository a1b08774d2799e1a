//! Page fixtures and a scripted browser session shared by the unit tests

use crate::crawlers::session::BrowserSession;
use crate::errors::{HarvestError, HarvestResult};
use crate::results::{ProductRef, ReviewPageLink, SearchQuery};
use crate::utils::SiteUrls;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub(crate) const BASE: &str = "https://www.amazon.in";

/// How a review page ends
#[derive(Debug, Clone, Copy)]
pub(crate) enum NextPage {
    /// No pagination control at all
    Absent,
    /// Pagination control with a disabled "next" marker
    Disabled,
    /// Pagination control with an active "next" marker
    Enabled,
}

pub(crate) fn challenge_page() -> String {
    r#"<html><body>
        <h4>Type the characters you see in this image:</h4>
        <p>To discuss automated access to Amazon data please contact
        api-services-support@amazon.com.</p>
    </body></html>"#
        .to_string()
}

pub(crate) fn search_page(ids: &[&str]) -> String {
    let blocks: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<div data-component-type="s-search-result" data-asin="{id}" data-index="1">
                    <h2><a href="/Some-Dress/dp/{id}/ref=sr_1_1">Dress {id}</a></h2>
                </div>"#
            )
        })
        .collect();
    format!(
        r#"<html><body><div class="s-main-slot">
            <div data-component-type="s-ads-metrics" data-asin=""></div>
            {blocks}
        </div></body></html>"#
    )
}

pub(crate) fn review_link_for(id: &str) -> String {
    format!("/Some-Dress/product-reviews/{id}/ref=cm_cr_dp_d_show_all_btm?ie=UTF8&reviewerType=all_reviews")
}

pub(crate) fn product_page(review_link: Option<&str>) -> String {
    let anchor = review_link
        .map(|href| {
            format!(
                r#"<a data-hook="see-all-reviews-link-foot" class="a-link-emphasis" href="{}">See more reviews</a>"#,
                href.replace('&', "&amp;")
            )
        })
        .unwrap_or_default();
    format!(
        r#"<html><body>
            <span id="productTitle">Some Dress</span>
            <div id="reviewsMedley">{anchor}</div>
        </body></html>"#
    )
}

pub(crate) fn review_block(title: &str, rating: &str, body: &str, size: &str) -> String {
    format!(
        r#"<div data-hook="review" class="a-section review">
            <a data-hook="review-title" class="review-title" href="/gp/customer-reviews/R1">
                <i data-hook="review-star-rating" class="a-icon a-icon-star"><span class="a-icon-alt">{rating} out of 5 stars</span></i>
                <span class="a-letter-space"></span>
                <span>{title}</span>
            </a>
            <div class="review-format-strip"><a data-hook="format-strip" class="a-link-normal">Size: {size}<i class="a-icon a-icon-text-separator" role="img" aria-label="|"></i>Colour: Black</a></div>
            <span data-hook="review-body" class="review-text">
                <span>{body}</span>
            </span>
        </div>"#
    )
}

pub(crate) fn review_page(blocks: &[String], next: NextPage) -> String {
    let pagination = match next {
        NextPage::Absent => String::new(),
        NextPage::Disabled => r#"<ul class="a-pagination">
                <li class="a-normal"><a href="?pageNumber=1">Previous page</a></li>
                <li class="a-disabled a-last">Next page</li>
            </ul>"#
            .to_string(),
        NextPage::Enabled => r#"<ul class="a-pagination">
                <li class="a-disabled">Previous page</li>
                <li class="a-last"><a href="?pageNumber=2">Next page</a></li>
            </ul>"#
            .to_string(),
    };
    format!(
        r#"<html><body><div id="cm_cr-review_list">{}</div>{pagination}</body></html>"#,
        blocks.concat()
    )
}

/// What the scripted session saw, readable after the session is moved
#[derive(Debug, Default)]
pub(crate) struct SessionLog {
    pub(crate) visited: Vec<String>,
    pub(crate) closed: bool,
}

/// In-memory browser session serving fixed pages by URL
pub(crate) struct ScriptedSession {
    pages: HashMap<String, String>,
    failing: HashSet<String>,
    current: Option<String>,
    log: Arc<Mutex<SessionLog>>,
}

impl ScriptedSession {
    pub(crate) fn new() -> Self {
        Self {
            pages: HashMap::new(),
            failing: HashSet::new(),
            current: None,
            log: Arc::new(Mutex::new(SessionLog::default())),
        }
    }

    pub(crate) fn page(mut self, url: &str, html: String) -> Self {
        self.pages.insert(url.to_string(), html);
        self
    }

    /// Make navigation to `url` fail at the transport level
    pub(crate) fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub(crate) fn log(&self) -> Arc<Mutex<SessionLog>> {
        Arc::clone(&self.log)
    }
}

#[async_trait]
impl BrowserSession for ScriptedSession {
    async fn navigate(&mut self, url: &str) -> HarvestResult<()> {
        self.log.lock().unwrap().visited.push(url.to_string());
        if self.failing.contains(url) {
            return Err(HarvestError::Fetch(format!("connection reset: {url}")));
        }
        match self.pages.get(url) {
            Some(html) => {
                self.current = Some(html.clone());
                Ok(())
            }
            None => Err(HarvestError::Fetch(format!("no page scripted for {url}"))),
        }
    }

    async fn current_html(&mut self) -> HarvestResult<String> {
        self.current
            .clone()
            .ok_or_else(|| HarvestError::Fetch("no page loaded".to_string()))
    }

    async fn close(&mut self) -> HarvestResult<()> {
        self.log.lock().unwrap().closed = true;
        Ok(())
    }
}

pub(crate) fn search_url(query: &str) -> String {
    let query = SearchQuery::new(query).unwrap();
    urls().search_url(&query).unwrap().to_string()
}

pub(crate) fn product_url(id: &str) -> String {
    urls().product_url(&ProductRef::new(id)).unwrap().to_string()
}

pub(crate) fn review_url(id: &str, page: u32) -> String {
    urls()
        .review_page_url(&ReviewPageLink::new(review_link_for(id)), page)
        .unwrap()
        .to_string()
}

fn urls() -> SiteUrls {
    SiteUrls::new(BASE).unwrap()
}
