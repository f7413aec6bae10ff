//! Client crate for the public Danish traffic bulletin feed.
//!
//! Fetches raw bulletin pages and important notices over HTTP and converts
//! them into a canonical, timezone-normalized model. Merge logic, read
//! state and rotation live one layer up, in `report-desk`.

mod client;
pub mod errors;
mod normalize;
mod raw;
pub mod types;

pub use client::{DEFAULT_BASE_API, FeedClient, FeedConfig};
pub use errors::{FeedError, FeedResult, FeedUpstreamError, NormalizeError};
pub use types::*;
