use crate::config::SelectorConfig;
use crate::errors::{HarvestError, HarvestResult};
use crate::results::{ProductRef, Review, ReviewPageLink};
use scraper::{ElementRef, Html, Node, Selector};

/// Extracts domain records from marketplace pages.
///
/// Every operation is a pure function of the HTML it is given. Extraction never
/// fails as a whole: a missing sub-element only leaves the corresponding field
/// empty. Check pages with [`crate::filter::ChallengeDetector`] first.
#[derive(Debug)]
pub struct Extractor {
    search_result: Selector,
    product_id_attr: String,
    review_link: Selector,
    review: Selector,
    review_title: Selector,
    review_rating: Selector,
    rating_suffix: String,
    review_body: Selector,
    size_separator: Selector,
    size_prefix: String,
    pagination: Selector,
    last_page_disabled: Selector,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(&SelectorConfig::default()).expect("Default selectors should be valid")
    }
}

impl Extractor {
    /// Compile the configured selectors
    pub fn new(config: &SelectorConfig) -> HarvestResult<Self> {
        Ok(Self {
            search_result: compile(&config.search_result)?,
            product_id_attr: config.product_id_attr.clone(),
            review_link: compile(&config.review_link)?,
            review: compile(&config.review)?,
            review_title: compile(&config.review_title)?,
            review_rating: compile(&config.review_rating)?,
            rating_suffix: config.rating_suffix.clone(),
            review_body: compile(&config.review_body)?,
            size_separator: compile(&config.size_separator)?,
            size_prefix: config.size_prefix.clone(),
            pagination: compile(&config.pagination)?,
            last_page_disabled: compile(&config.last_page_disabled)?,
        })
    }

    /// Product identifiers of every search result block, in page order
    pub fn extract_product_refs(&self, html: &str) -> Vec<ProductRef> {
        let doc = Html::parse_document(html);

        let refs: Vec<ProductRef> = doc
            .select(&self.search_result)
            .filter_map(|block| block.value().attr(&self.product_id_attr))
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(ProductRef::new)
            .collect();

        ::log::debug!("Search page yielded {} product refs", refs.len());
        refs
    }

    /// Link to the full review listing, if the product page has one
    pub fn extract_review_link(&self, html: &str) -> Option<ReviewPageLink> {
        let doc = Html::parse_document(html);

        doc.select(&self.review_link)
            .filter_map(|anchor| anchor.value().attr("href"))
            .map(str::trim)
            .find(|href| !href.is_empty())
            .map(ReviewPageLink::new)
    }

    /// Every review block on a review page, attributed to `product`
    pub fn extract_reviews(&self, html: &str, product: &ProductRef) -> Vec<Review> {
        let doc = Html::parse_document(html);

        doc.select(&self.review)
            .map(|block| Review {
                title: self.title(block),
                rating: self.rating(block),
                body: self.body(block),
                size: self.size(block),
                product_ref: product.clone(),
            })
            .collect()
    }

    /// Whether another review page follows this one.
    ///
    /// A page without a pagination control and a page whose last-page marker is
    /// disabled both answer `false`.
    pub fn has_next_page(&self, html: &str) -> bool {
        let doc = Html::parse_document(html);

        if doc.select(&self.pagination).next().is_none() {
            return false;
        }
        doc.select(&self.last_page_disabled).next().is_none()
    }

    // The title anchor may also carry the star rating; text under the rating
    // element is skipped and the title is the last remaining non-blank text node.
    fn title(&self, block: ElementRef) -> Option<String> {
        let anchor = block.select(&self.review_title).next()?;
        let anchor_id = (*anchor).id();
        anchor
            .descendants()
            .filter(|node| {
                !node
                    .ancestors()
                    .take_while(|ancestor| ancestor.id() != anchor_id)
                    .filter_map(ElementRef::wrap)
                    .any(|el| self.review_rating.matches(&el))
            })
            .filter_map(|node| match node.value() {
                Node::Text(text) => Some(text.trim()),
                _ => None,
            })
            .filter(|text| !text.is_empty())
            .last()
            .map(str::to_string)
    }

    fn rating(&self, block: ElementRef) -> Option<f32> {
        let text: String = block.select(&self.review_rating).next()?.text().collect();
        text.replace(self.rating_suffix.as_str(), "")
            .trim()
            .parse::<f32>()
            .ok()
            .filter(|rating| rating.is_finite())
    }

    fn body(&self, block: ElementRef) -> Option<String> {
        block
            .select(&self.review_body)
            .next()
            .map(|body| body.text().collect::<String>().trim().to_string())
    }

    // Variant details sit on either side of the separator icon; the next sibling is
    // checked before the previous one.
    fn size(&self, block: ElementRef) -> Option<String> {
        let icon = block.select(&self.size_separator).next()?;
        [icon.next_sibling(), icon.prev_sibling()]
            .into_iter()
            .flatten()
            .filter_map(|node| node_text(node.value(), ElementRef::wrap(node)))
            .find(|text| text.contains(self.size_prefix.as_str()))
            .map(|text| text.replace(self.size_prefix.as_str(), "").trim().to_string())
    }
}

fn compile(selector: &str) -> HarvestResult<Selector> {
    Selector::parse(selector).map_err(|e| HarvestError::Selector(format!("{selector:?}: {e:?}")))
}

/// Text carried by a sibling node, whether a bare text node or an element
fn node_text(node: &Node, element: Option<ElementRef>) -> Option<String> {
    match node {
        Node::Text(text) => Some(String::from(&**text)),
        Node::Element(_) => element.map(|el| el.text().collect()),
        _ => None,
    }
}
