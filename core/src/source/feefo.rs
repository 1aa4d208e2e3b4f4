//! HTTP client for the Feefo merchant API: paginated review fetches and
//! per-SKU product rating lookups.

use std::time::Duration;

use futures::stream::{self, StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::PipelineConfig;
use crate::errors::FetchError;
use crate::model::{ProductRating, RatingsResponse, ReviewsPage};
use crate::source::{PageStream, ReviewStream};

#[derive(Debug)]
pub struct FeefoClient {
    http: reqwest::Client,
    base_url: String,
    merchant_id: String,
}

impl FeefoClient {
    pub fn new(config: &PipelineConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| FetchError::Client {
                reason: e.to_string(),
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            merchant_id: config.merchant_id.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, "requesting feefo endpoint");

        let response = self
            .http
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| FetchError::Decode {
            url,
            reason: e.to_string(),
        })
    }

    /// One page of `GET /reviews/all`. Pages are 1-based.
    pub async fn reviews_page(
        &self,
        page: u64,
        since: Option<&str>,
        until: Option<&str>,
    ) -> Result<ReviewsPage, FetchError> {
        let mut params = vec![
            ("merchant_identifier", self.merchant_id.clone()),
            ("page", page.to_string()),
        ];
        if let Some(since) = since {
            params.push(("since", since.to_string()));
        }
        if let Some(until) = until {
            params.push(("until", until.to_string()));
        }

        self.get_json("reviews/all", &params).await
    }

    /// Ratings for one SKU via `GET /products/ratings`. The API may return
    /// zero, one or several records for a single SKU.
    pub async fn product_ratings(
        &self,
        sku: &str,
        period_days: Option<u32>,
    ) -> Result<Vec<ProductRating>, FetchError> {
        let mut params = vec![
            ("merchant_identifier", self.merchant_id.clone()),
            ("product_sku", sku.to_string()),
        ];
        if let Some(days) = period_days {
            params.push(("since_period", format!("{days}days")));
        }

        let response: RatingsResponse = self.get_json("products/ratings", &params).await?;
        Ok(response.products)
    }

    /// Lazily walk the review pages, stopping at
    /// `min(server_total_pages, max_pages)`. Any failure ends the stream
    /// with an error; there is no partial-page retry here.
    pub fn page_stream(
        &self,
        max_pages: u64,
        since: Option<String>,
        until: Option<String>,
    ) -> PageStream<'_> {
        stream::try_unfold(PageCursor::new(max_pages), move |mut cursor| {
            let since = since.clone();
            let until = until.clone();
            async move {
                if cursor.exhausted() {
                    return Ok(None);
                }
                let page = self
                    .reviews_page(cursor.next, since.as_deref(), until.as_deref())
                    .await?;
                cursor.observe_total(page.total_pages());
                Ok(Some((page, cursor)))
            }
        })
        .boxed()
    }

    /// The page stream flattened into individual reviews.
    pub fn review_stream(
        &self,
        max_pages: u64,
        since: Option<String>,
        until: Option<String>,
    ) -> ReviewStream<'_> {
        self.page_stream(max_pages, since, until)
            .map_ok(|page| stream::iter(page.reviews.into_iter().map(Ok)))
            .try_flatten()
            .boxed()
    }
}

/// Pagination state for the reviews endpoint. `next` is 1-based and never
/// zero; `limit` starts at the caller's cap and shrinks once the server
/// declares its total.
#[derive(Debug, Clone, Copy)]
struct PageCursor {
    next: u64,
    limit: u64,
}

impl PageCursor {
    fn new(max_pages: u64) -> Self {
        Self {
            next: 1,
            limit: max_pages.max(1),
        }
    }

    fn exhausted(&self) -> bool {
        self.next > self.limit
    }

    /// Fold the server-declared total into the bound and advance. A page
    /// without a declared total is treated as the last page.
    fn observe_total(&mut self, server_total: Option<u64>) {
        let total = server_total.unwrap_or(self.next);
        self.limit = self.limit.min(total);
        self.next += 1;
    }
}
