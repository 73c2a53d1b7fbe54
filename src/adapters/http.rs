use crate::domain::ports::{Fetch, FetchRequest, FetchResponse};
use crate::utils::error::{LoaderError, Result};
use async_trait::async_trait;
use reqwest::{Client, Method};

/// [`Fetch`] over a shared `reqwest` client. No timeout is set; the
/// transport defaults apply.
#[derive(Debug, Clone, Default)]
pub struct ReqwestFetch {
    client: Client,
}

impl ReqwestFetch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetch for ReqwestFetch {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse> {
        let method = Method::from_bytes(request.method.as_bytes()).map_err(|e| {
            LoaderError::fetch(format!("invalid HTTP method '{}': {}", request.method, e))
        })?;

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        tracing::debug!("{} {}", request.method, request.url);
        let response = builder.body(request.body).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(FetchResponse { status, body })
    }
}
