use std::future::Future;
use std::pin::Pin;

use crate::error::FetchError;
use crate::page::Page;

pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<Page, FetchError>> + Send + 'a>>;

/// Source of result pages for a query.
///
/// `next_token` is `None` for the first page and the previous page's
/// continuation token afterwards.
pub trait PageFetcher: Send + Sync {
    fn fetch<'a>(&'a self, query: &'a str, next_token: Option<&'a str>) -> FetchFuture<'a>;
}

/// Any `Fn(query, next_token) -> Future<Result<Page, FetchError>>` is a fetcher.
impl<F, Fut> PageFetcher for F
where
    F: Fn(String, Option<String>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Page, FetchError>> + Send + 'static,
{
    fn fetch<'a>(&'a self, query: &'a str, next_token: Option<&'a str>) -> FetchFuture<'a> {
        Box::pin(self(query.to_string(), next_token.map(str::to_string)))
    }
}
