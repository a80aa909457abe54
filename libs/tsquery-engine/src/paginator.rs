use async_stream::try_stream;
use futures::{Stream, StreamExt};

use tsquery_api::{ColumnDescriptor, Page, PageFetcher, Record};

use crate::decoder::decode_page;
use crate::error::QueryError;

/// One fetched page after decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPage {
    /// Zero-based position of the page within the query.
    pub index: usize,
    pub query_id: Option<String>,
    pub columns: Vec<ColumnDescriptor>,
    pub records: Vec<Record>,
}

// ═══════════════════════════════════════════════════════════════
//  Paginator
// ═══════════════════════════════════════════════════════════════

/// Drives a [`PageFetcher`] across every page of a query.
///
/// Pages are pulled one at a time: the next fetch is issued only after the
/// current page is decoded and handed out. The streams returned here are
/// single-pass; calling `run` again re-issues the query from the first page.
pub struct Paginator<F> {
    fetcher: F,
    max_pages: Option<usize>,
}

impl<F: PageFetcher> Paginator<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            max_pages: None,
        }
    }

    /// Stop with [`QueryError::PageLimit`] when more than `max` pages would be fetched.
    pub fn with_max_pages(mut self, max: usize) -> Self {
        self.max_pages = Some(max.max(1));
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Decoded records of every page, in page order then row order.
    pub fn run<'a>(&'a self, query: &'a str) -> impl Stream<Item = Result<Record, QueryError>> + Send + 'a {
        try_stream! {
            let pages = self.pages(query);
            futures::pin_mut!(pages);
            while let Some(page) = pages.next().await {
                for record in page?.records {
                    yield record;
                }
            }
        }
    }

    /// Same traversal as [`run`](Self::run), one item per page.
    pub fn pages<'a>(&'a self, query: &'a str) -> impl Stream<Item = Result<DecodedPage, QueryError>> + Send + 'a {
        try_stream! {
            let mut next_token: Option<String> = None;
            let mut index = 0usize;

            loop {
                if let Some(max) = self.max_pages {
                    if index >= max {
                        tracing::warn!(pages = index, "page limit reached, stopping query");
                        Err::<(), _>(QueryError::PageLimit(max))?;
                    }
                }

                let page = self.fetcher.fetch(query, next_token.as_deref()).await?;
                let records = decode_page(&page)?;
                tracing::debug!(
                    page = index,
                    rows = records.len(),
                    more = !page.is_last(),
                    "decoded page"
                );

                let Page { query_id, columns, next_token: token, .. } = page;
                yield DecodedPage { index, query_id, columns, records };

                match token {
                    Some(token) => {
                        next_token = Some(token);
                        index += 1;
                    }
                    None => break,
                }
            }
        }
    }
}
