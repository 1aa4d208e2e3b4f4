//! SKU enrichment: walk the review stream once, fetch ratings for each
//! newly seen SKU, and tag every returned record with a sentiment.

use std::collections::HashSet;

use futures::stream::{self, BoxStream, StreamExt};
use tracing::{debug, warn};

use crate::model::{ProductRating, Review};
use crate::sentiment;
use crate::source::FeefoClient;

/// Single-pass enrichment over a review stream.
///
/// The per-run seen-set guarantees at most one ratings fetch per distinct
/// SKU. Fetch and decode failures are isolated per SKU: logged, counted,
/// never propagated. This deliberately differs from review pagination,
/// where any failure is fatal; enrichment is best-effort.
pub struct SkuEnricher<'a> {
    client: &'a FeefoClient,
    period_days: Option<u32>,
    seen: HashSet<String>,
    failed_fetches: usize,
}

impl<'a> SkuEnricher<'a> {
    pub fn new(client: &'a FeefoClient, period_days: Option<u32>) -> Self {
        Self {
            client,
            period_days,
            seen: HashSet::new(),
            failed_fetches: 0,
        }
    }

    /// Ratings for every SKU this review mentions for the first time in
    /// this run. Mentions without a SKU never trigger a fetch. One review
    /// may yield zero, one or many records; order within a single SKU's
    /// fetch result is preserved.
    pub async fn enrich(&mut self, review: &Review) -> Vec<ProductRating> {
        let mut out = Vec::new();

        for mention in &review.products {
            let Some(sku) = mention.sku() else {
                continue;
            };
            if !self.seen.insert(sku.to_string()) {
                debug!(sku, "sku already fetched this run, skipping");
                continue;
            }

            match self.client.product_ratings(sku, self.period_days).await {
                Ok(ratings) => {
                    for mut rating in ratings {
                        rating.sentiment = sentiment::classify(
                            rating.score(),
                            rating.review.as_deref().unwrap_or(""),
                        );
                        out.push(rating);
                    }
                }
                Err(err) => {
                    self.failed_fetches += 1;
                    warn!(sku, error = %err, "product rating fetch failed, skipping sku");
                }
            }
        }

        out
    }

    /// Distinct SKUs dispatched so far, including failed ones.
    pub fn distinct_skus(&self) -> usize {
        self.seen.len()
    }

    pub fn failed_fetches(&self) -> usize {
        self.failed_fetches
    }
}

/// [`SkuEnricher`] as a stream adapter: flattens a review stream into the
/// lazy sequence of enriched ratings it produces.
pub fn enrich_stream<'a>(
    enricher: SkuEnricher<'a>,
    reviews: BoxStream<'a, Review>,
) -> BoxStream<'a, ProductRating> {
    stream::unfold(
        (enricher, reviews),
        |(mut enricher, mut reviews)| async move {
            loop {
                let review = reviews.next().await?;
                let ratings = enricher.enrich(&review).await;
                if !ratings.is_empty() {
                    return Some((stream::iter(ratings), (enricher, reviews)));
                }
            }
        },
    )
    .flatten()
    .boxed()
}
