//! Critic review scraping for the verdict pipeline.

use reqwest::{header, Client as HttpClient};
use scraper::{Html, Selector};

use crate::error::{AppError, AppResult};

const MAX_REVIEWS: usize = 20;
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// Source of review text for a title
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ReviewScraper: Send + Sync {
    /// Review snippets for a title, possibly empty
    async fn fetch_reviews(&self, title: &str) -> AppResult<Vec<String>>;
}

/// Scrapes a review site's `/m/{slug}/reviews` page with a CSS selector
pub struct HttpReviewScraper {
    http_client: HttpClient,
    site_url: String,
    selector: Selector,
}

impl HttpReviewScraper {
    /// Fails if `selector` is not valid CSS
    pub fn new(site_url: String, selector: &str) -> AppResult<Self> {
        let selector = Selector::parse(selector).map_err(|e| {
            AppError::InvalidInput(format!("Invalid review selector {:?}: {}", selector, e))
        })?;

        Ok(Self {
            http_client: HttpClient::new(),
            site_url: site_url.trim_end_matches('/').to_string(),
            selector,
        })
    }

    fn reviews_url(&self, title: &str) -> String {
        format!("{}/m/{}/reviews", self.site_url, slugify(title))
    }
}

#[async_trait::async_trait]
impl ReviewScraper for HttpReviewScraper {
    async fn fetch_reviews(&self, title: &str) -> AppResult<Vec<String>> {
        let url = self.reviews_url(title);

        let response = self
            .http_client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Review page {} returned status {}",
                url,
                response.status()
            )));
        }

        let body = response.text().await?;
        let reviews = extract_reviews(&body, &self.selector);

        tracing::info!(url = %url, reviews = reviews.len(), "Scraped reviews");

        Ok(reviews)
    }
}

/// "Spider-Man: No Way Home" → "spider_man_no_way_home"
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    slug.trim_matches('_').to_string()
}

/// Text of every element matching `selector`, whitespace collapsed, empties dropped
fn extract_reviews(html: &str, selector: &Selector) -> Vec<String> {
    let document = Html::parse_document(html);

    document
        .select(selector)
        .map(|element| {
            element
                .text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|text| !text.is_empty())
        .take(MAX_REVIEWS)
        .collect()
}
