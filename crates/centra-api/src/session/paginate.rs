// Lazy offset/limit pagination over list endpoints.
//
// A page is only requested when the stream is polled past the previous
// one; dropping the stream leaves the remaining pages unfetched.

use std::pin::pin;

use async_stream::try_stream;
use futures_util::{Stream, StreamExt};
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;

use super::Session;
use super::request::Request;
use crate::error::Error;

/// One page of a list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T = Value> {
    pub objects: Vec<T>,
    pub total_count: u64,
    pub results_in_page: u64,
    /// Offset one past the last object of this page. Required: it is the
    /// cursor for the next request.
    pub to: u64,
}

impl<T> Page<T> {
    /// `ceil(total_count / results_in_page)`. An empty page counts as a
    /// single page so the stream always ends.
    pub fn page_count(&self) -> u64 {
        if self.results_in_page == 0 {
            1
        } else {
            self.total_count.div_ceil(self.results_in_page)
        }
    }
}

/// What to paginate and how.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub endpoint: String,
    pub method: Method,
    /// Requested page size; the server's choice is used when `None`.
    pub objects_per_page: Option<u64>,
    /// Filter parameters sent with every page.
    pub params: Vec<(String, String)>,
    /// Stop after this many objects ([`Session::paginate_objects`] only).
    pub stop_after: Option<usize>,
}

impl PageRequest {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: Method::GET,
            objects_per_page: None,
            params: Vec::new(),
            stop_after: None,
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn objects_per_page(mut self, size: u64) -> Self {
        self.objects_per_page = Some(size);
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    pub fn stop_after(mut self, limit: usize) -> Self {
        self.stop_after = Some(limit);
        self
    }

    fn base_request(&self) -> Request {
        Request::new(self.method.clone(), self.endpoint.clone()).params(self.params.iter().cloned())
    }

    fn first_request(&self) -> Request {
        match self.objects_per_page {
            Some(size) => self.base_request().with_param("limit", size),
            None => self.base_request(),
        }
    }

    fn follow_up(&self, offset: u64, limit: u64) -> Request {
        self.base_request()
            .with_param("offset", offset)
            .with_param("limit", limit)
    }
}

impl Session {
    /// Stream the pages of a list endpoint.
    ///
    /// The first response fixes the page count and the page size used for
    /// every follow-up request; each follow-up starts at the previous
    /// page's `to`. Every request goes through auto-reconnect.
    pub fn paginate(&self, request: PageRequest) -> impl Stream<Item = Result<Page, Error>> + '_ {
        try_stream! {
            let first: Page = self.query_as(request.first_request()).await?;
            let pages = first.page_count();
            let page_size = first.results_in_page;
            let mut offset = first.to;
            yield first;

            for _ in 1..pages {
                let page: Page = self.query_as(request.follow_up(offset, page_size)).await?;
                offset = page.to;
                yield page;
            }
        }
    }

    /// Stream the objects of every page, stopping early once
    /// `request.stop_after` objects have been produced.
    pub fn paginate_objects(
        &self,
        request: PageRequest,
    ) -> impl Stream<Item = Result<Value, Error>> + '_ {
        try_stream! {
            let stop_after = request.stop_after;
            if stop_after != Some(0) {
                let mut produced = 0_usize;
                let mut pages = pin!(self.paginate(request));

                'pages: while let Some(page) = pages.next().await {
                    for object in page?.objects {
                        yield object;
                        produced += 1;
                        if stop_after.is_some_and(|max| produced >= max) {
                            break 'pages;
                        }
                    }
                }
            }
        }
    }
}
