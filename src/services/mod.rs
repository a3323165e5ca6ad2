// Service exports
pub mod fetcher;

pub use fetcher::{FetchError, ImageFetcher};
