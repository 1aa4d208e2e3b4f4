//! The pipeline orchestrates the data flow from the Feefo API -> sink:
//! paginate reviews, fan out per-SKU enrichment, load both record streams
//! under one write disposition.

use std::time::Instant;

use chrono::Utc;
use futures::TryStreamExt;
use serde_json::Value;
use tracing::info;

use crate::config::PipelineConfig;
use crate::errors::Result;
use crate::sink::{RecordSink, TableSpec};
use crate::source::FeefoClient;
use crate::telemetry::RunSummary;
use crate::transform::SkuEnricher;

pub const REVIEWS_TABLE: TableSpec = TableSpec {
    name: "feefo_reviews",
    primary_key: "url",
};

pub const PRODUCT_RATINGS_TABLE: TableSpec = TableSpec {
    name: "feefo_products_for_reviews",
    primary_key: "sku",
};

#[derive(Debug)]
pub struct Pipeline<S> {
    config: PipelineConfig,
    client: FeefoClient,
    sink: S,
}

impl<S: RecordSink> Pipeline<S> {
    /// Validates the configuration up front; no network call happens before
    /// validation passes.
    pub fn new(config: PipelineConfig, sink: S) -> Result<Self> {
        config.validate()?;
        let client = FeefoClient::new(&config)?;
        Ok(Self {
            config,
            client,
            sink,
        })
    }

    /// Executes one run. Any failure while paginating reviews is fatal;
    /// per-SKU enrichment failures are swallowed by the transformer and
    /// surface only in the summary counts.
    pub async fn run(self) -> Result<RunSummary> {
        let Self {
            config,
            client,
            mut sink,
        } = self;

        let started_at = Utc::now();
        let started = Instant::now();
        info!(
            merchant_id = %config.merchant_id,
            mode = %config.mode,
            max_pages = config.max_pages,
            include_ratings = config.include_ratings,
            "starting feefo ingestion run"
        );

        sink.prepare(&REVIEWS_TABLE, config.mode).await?;
        if config.include_ratings {
            sink.prepare(&PRODUCT_RATINGS_TABLE, config.mode).await?;
        }

        let mut enricher = config
            .include_ratings
            .then(|| SkuEnricher::new(&client, config.period_days));

        let mut pages_fetched = 0u64;
        let mut reviews_loaded = 0usize;
        let mut ratings_loaded = 0usize;

        let mut pages =
            client.page_stream(config.max_pages, config.since.clone(), config.until.clone());
        while let Some(page) = pages.try_next().await? {
            pages_fetched += 1;
            reviews_loaded += page.reviews.len();

            if let Some(enricher) = enricher.as_mut() {
                for review in &page.reviews {
                    let ratings = enricher.enrich(review).await;
                    if ratings.is_empty() {
                        continue;
                    }
                    ratings_loaded += ratings.len();
                    let records = ratings
                        .iter()
                        .map(serde_json::to_value)
                        .collect::<std::result::Result<Vec<Value>, _>>()?;
                    sink.write_batch(&PRODUCT_RATINGS_TABLE, records).await?;
                }
            }

            let records = page
                .reviews
                .iter()
                .map(serde_json::to_value)
                .collect::<std::result::Result<Vec<Value>, _>>()?;
            sink.write_batch(&REVIEWS_TABLE, records).await?;
        }
        drop(pages);

        let table_rows = sink.flush().await?;

        let summary = RunSummary {
            merchant_id: config.merchant_id,
            mode: config.mode,
            started_at,
            elapsed_secs: started.elapsed().as_secs_f64(),
            pages_fetched,
            reviews_loaded,
            ratings_loaded,
            distinct_skus: enricher.as_ref().map_or(0, SkuEnricher::distinct_skus),
            enrichment_failures: enricher.as_ref().map_or(0, SkuEnricher::failed_fetches),
            table_rows,
        };

        info!(
            pages = summary.pages_fetched,
            reviews = summary.reviews_loaded,
            ratings = summary.ratings_loaded,
            enrichment_failures = summary.enrichment_failures,
            elapsed_secs = summary.elapsed_secs,
            "feefo ingestion run completed"
        );

        Ok(summary)
    }
}
