//! Network side: HTTP transport, page cache and the client façade

pub mod cache;
pub mod client;
pub mod fetcher;
pub mod http;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{CacheKey, CacheStore};
pub use client::{format_error, JolpicaClient};
pub use fetcher::PageFetcher;
pub use http::{HttpTransport, Transport};
