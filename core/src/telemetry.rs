use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::WriteMode;

pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "feefo_core=info,feefo_ingest=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Outcome of one pipeline run, reported to the caller and printed by the
/// CLI. Per-SKU enrichment failures only show up here and in the logs.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub merchant_id: String,
    pub mode: WriteMode,
    pub started_at: DateTime<Utc>,
    pub elapsed_secs: f64,
    pub pages_fetched: u64,
    pub reviews_loaded: usize,
    pub ratings_loaded: usize,
    pub distinct_skus: usize,
    pub enrichment_failures: usize,
    /// Final row count per destination table after flush.
    pub table_rows: HashMap<String, usize>,
}
