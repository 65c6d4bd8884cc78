pub mod fetcher;
pub mod parser;
pub mod types;

pub use fetcher::{fetch_candidates, filter_recent, FetchError};
pub use types::{CandidateEntry, FeedEntry};
