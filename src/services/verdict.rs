use std::sync::Arc;

use serde::Deserialize;

use crate::{
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{Recommendation, TitleKey, ViewingVerdict},
    services::{llm::ChatClient, reviews::ReviewScraper},
};

const VERDICT_CACHE_TTL: u64 = 604800; // 1 week
const MAX_REVIEW_CHARS: usize = 12_000;
const REVIEW_LINE_OVERHEAD: usize = 3; // "- " and '\n'

const SYSTEM_PROMPT: &str = "You rate whether a film is worth seeing in a movie theater \
or can wait for streaming, based only on the critic reviews provided. Reply with a JSON \
object with exactly these keys: \"recommendation\" (\"theater\" or \"stream\"), \
\"confidence\" (integer 0-100), \"spectacle\", \"sound\" and \"story\" (integers 1-10), \
and \"summary\" (one or two sentences).";

/// Produces the theater-or-stream verdict for a title
#[async_trait::async_trait]
pub trait VerdictSource: Send + Sync {
    async fn verdict(&self, key: &TitleKey, title: &str) -> AppResult<ViewingVerdict>;
}

/// Scrape → LLM verdict pipeline with a Redis cache in front
pub struct VerdictService {
    scraper: Arc<dyn ReviewScraper>,
    chat: Arc<dyn ChatClient>,
    cache: Cache,
}

impl VerdictService {
    pub fn new(scraper: Arc<dyn ReviewScraper>, chat: Arc<dyn ChatClient>, cache: Cache) -> Self {
        Self {
            scraper,
            chat,
            cache,
        }
    }
}

#[async_trait::async_trait]
impl VerdictSource for VerdictService {
    async fn verdict(&self, key: &TitleKey, title: &str) -> AppResult<ViewingVerdict> {
        let cache_key = CacheKey::Verdict(*key);
        if let Some(cached) = self.cache.get_from_cache(&cache_key).await? {
            return Ok(cached);
        }

        let verdict = generate_verdict(self.scraper.as_ref(), self.chat.as_ref(), title).await;

        // Fallbacks are retried on the next request
        if !verdict.is_fallback {
            self.cache
                .set_in_background(&cache_key, &verdict, VERDICT_CACHE_TTL);
        }

        Ok(verdict)
    }
}

/// Rates a title from its scraped reviews
///
/// Never fails: any scrape, model or parse failure yields
/// [`ViewingVerdict::fallback`].
pub async fn generate_verdict(
    scraper: &dyn ReviewScraper,
    chat: &dyn ChatClient,
    title: &str,
) -> ViewingVerdict {
    match try_generate_verdict(scraper, chat, title).await {
        Ok(verdict) => {
            tracing::info!(
                title = %title,
                recommendation = ?verdict.recommendation,
                confidence = verdict.confidence,
                "Verdict generated"
            );
            verdict
        }
        Err(e) => {
            tracing::warn!(error = %e, title = %title, "Serving fallback verdict");
            ViewingVerdict::fallback()
        }
    }
}

async fn try_generate_verdict(
    scraper: &dyn ReviewScraper,
    chat: &dyn ChatClient,
    title: &str,
) -> AppResult<ViewingVerdict> {
    let reviews = scraper.fetch_reviews(title).await?;
    if reviews.is_empty() {
        return Err(AppError::NotFound(format!("No reviews found for {}", title)));
    }

    let prompt = build_prompt(title, &reviews).ok_or_else(|| {
        AppError::NotFound(format!("No usable review text for {}", title))
    })?;
    let raw = chat.complete_json(SYSTEM_PROMPT, &prompt).await?;
    parse_verdict(&raw)
}

/// User message: title plus as many whole reviews as fit in the character
/// budget, counting each review line's `"- "` prefix and newline.
///
/// A first review longer than the whole budget is cut to fit rather than
/// skipped. Returns `None` when no review text made it into the prompt.
fn build_prompt(title: &str, reviews: &[String]) -> Option<String> {
    let mut prompt = format!("Film: {}\n\nCritic reviews:\n", title);
    let mut used = 0;
    let mut included = 0;

    for review in reviews {
        let cost = review.chars().count() + REVIEW_LINE_OVERHEAD;
        if used + cost > MAX_REVIEW_CHARS {
            if included == 0 {
                let room = MAX_REVIEW_CHARS.saturating_sub(REVIEW_LINE_OVERHEAD);
                let cut: String = review.chars().take(room).collect();
                if !cut.trim_end().is_empty() {
                    push_review(&mut prompt, cut.trim_end());
                    included += 1;
                }
            }
            break;
        }
        used += cost;
        push_review(&mut prompt, review);
        included += 1;
    }

    (included > 0).then_some(prompt)
}

fn push_review(prompt: &mut String, review: &str) {
    prompt.push_str("- ");
    prompt.push_str(review);
    prompt.push('\n');
}

#[derive(Debug, Deserialize)]
struct RawVerdict {
    recommendation: String,
    confidence: f64,
    spectacle: f64,
    sound: f64,
    story: f64,
    summary: String,
}

/// Parses the model's JSON reply, tolerating a ```json fence, and clamps scores
fn parse_verdict(raw: &str) -> AppResult<ViewingVerdict> {
    let json = strip_code_fence(raw);
    let parsed: RawVerdict = serde_json::from_str(json)
        .map_err(|e| AppError::ExternalApi(format!("Unparsable verdict JSON: {}", e)))?;

    let recommendation = match parsed.recommendation.trim().to_lowercase().as_str() {
        "theater" | "theatre" | "cinema" => Recommendation::Theater,
        "stream" | "streaming" => Recommendation::Stream,
        other => {
            return Err(AppError::ExternalApi(format!(
                "Unknown recommendation {:?}",
                other
            )))
        }
    };

    let summary = parsed.summary.trim().to_string();
    if summary.is_empty() {
        return Err(AppError::ExternalApi("Verdict summary is empty".to_string()));
    }

    Ok(ViewingVerdict {
        recommendation,
        confidence: clamp_score(parsed.confidence, 0, 100),
        spectacle: clamp_score(parsed.spectacle, 1, 10),
        sound: clamp_score(parsed.sound, 1, 10),
        story: clamp_score(parsed.story, 1, 10),
        summary,
        is_fallback: false,
    })
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the info string ("json") on the opening fence line
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().trim_end_matches("```").trim()
}

fn clamp_score(value: f64, min: u8, max: u8) -> u8 {
    if value.is_nan() {
        return min;
    }
    value.round().clamp(f64::from(min), f64::from(max)) as u8
}
