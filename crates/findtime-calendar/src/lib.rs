//! Availability queries for the FindTime calendar view.
//!
//! Caches fetched busy blocks per query key and covered date range, and
//! fetches from the `/findtime` endpoint on a miss.

pub mod cache;
pub mod client;
pub mod coordinator;
pub mod error;
pub mod interval;
pub mod link;
pub mod types;

pub use cache::EventCache;
pub use client::FindTimeClient;
pub use coordinator::{EventFetcher, QueryCoordinator, RangeCache};
pub use error::CalendarError;
pub use interval::{DateInterval, IntervalSet};
pub use types::{merge_overlapping, Event, RangeInfo};
