pub mod feefo;

pub use feefo::FeefoClient;

use futures::stream::BoxStream;

use crate::errors::FetchError;
use crate::model::{Review, ReviewsPage};

/// Lazy, forward-only page sequence. Not reusable after consumption.
pub type PageStream<'a> = BoxStream<'a, Result<ReviewsPage, FetchError>>;

/// Lazy review sequence, in page order then in-page order.
pub type ReviewStream<'a> = BoxStream<'a, Result<Review, FetchError>>;
