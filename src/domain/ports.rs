use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub method: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl FetchRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The fetch capability a client sends every request through.
///
/// Callers inject it so each environment can bring its own transport.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse>;
}

#[async_trait]
impl<T: Fetch + ?Sized> Fetch for Arc<T> {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse> {
        (**self).fetch(request).await
    }
}

/// Adapts an async closure into a [`Fetch`].
#[derive(Clone)]
pub struct FetchFn<F>(F);

pub fn fetch_fn<F, Fut>(f: F) -> FetchFn<F>
where
    F: Fn(FetchRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<FetchResponse>> + Send,
{
    FetchFn(f)
}

#[async_trait]
impl<F, Fut> Fetch for FetchFn<F>
where
    F: Fn(FetchRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<FetchResponse>> + Send,
{
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse> {
        (self.0)(request).await
    }
}

/// What the host passes into a page load. Only `fetch` is used; `params`
/// carries route parameters and is ignored by the loader.
#[derive(Clone)]
pub struct LoadContext<F> {
    pub fetch: F,
    pub params: HashMap<String, String>,
}

impl<F: Fetch> LoadContext<F> {
    pub fn new(fetch: F) -> Self {
        Self {
            fetch,
            params: HashMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}
