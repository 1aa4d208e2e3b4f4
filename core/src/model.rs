//! Record and wire types for the Feefo merchant API.

use serde::{Deserialize, Serialize};

use crate::sentiment::Sentiment;

/// A single customer review as returned by `GET /reviews/all`.
///
/// Keyed by `url`. Immutable once fetched; consumed exactly once per run by
/// the transformer and the sink.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Review {
    pub url: String,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub service: Option<ServiceFeedback>,
    #[serde(default)]
    pub products: Vec<ProductMention>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Customer {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub display_location: Option<String>,
}

/// Service-level feedback embedded in a review.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceFeedback {
    #[serde(default)]
    pub rating: Option<RatingValue>,
    #[serde(default)]
    pub review: Option<String>,
}

/// Feefo nests the numeric score one level down (`rating.rating`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RatingValue {
    #[serde(default)]
    pub rating: Option<f64>,
}

/// A product referenced by a review. Drives SKU discovery only; never
/// persisted on its own.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProductMention {
    #[serde(default)]
    pub product: Option<ProductInfo>,
    #[serde(default)]
    pub rating: Option<RatingValue>,
    #[serde(default)]
    pub review: Option<String>,
}

impl ProductMention {
    /// The mentioned SKU, if any. Absent, null and empty-string SKUs all
    /// count as missing.
    pub fn sku(&self) -> Option<&str> {
        self.product
            .as_ref()?
            .sku
            .as_deref()
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProductInfo {
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Aggregate rating for one SKU from `GET /products/ratings`, keyed by `sku`.
///
/// `sentiment` is derived locally after deserialization and is never read
/// from the wire.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProductRating {
    pub sku: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rating: Option<RatingStats>,
    #[serde(default)]
    pub review: Option<String>,
    #[serde(default, skip_deserializing)]
    pub sentiment: Sentiment,
}

impl ProductRating {
    pub fn score(&self) -> Option<f64> {
        self.rating.as_ref().and_then(|r| r.rating)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RatingStats {
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub count: Option<u64>,
}

/// Envelope of one `GET /reviews/all` page.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewsPage {
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub summary: Option<PageSummary>,
}

impl ReviewsPage {
    /// Server-declared total page count (`summary.meta.pages`), if present.
    pub fn total_pages(&self) -> Option<u64> {
        self.summary.as_ref()?.meta.as_ref()?.pages
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageSummary {
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub pages: Option<u64>,
}

/// Envelope of `GET /products/ratings`.
#[derive(Debug, Clone, Deserialize)]
pub struct RatingsResponse {
    #[serde(default)]
    pub products: Vec<ProductRating>,
}
