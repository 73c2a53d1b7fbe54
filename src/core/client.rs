use crate::core::cache::{DocumentCache, OperationKey};
use crate::domain::model::{GraphQlRequest, GraphQlResponse, OperationResult};
use crate::domain::ports::{Fetch, FetchRequest};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/graphql";

const ACCEPT: &str = "application/graphql-response+json, application/json";

/// How a query consults the client's cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestPolicy {
    /// Serve from cache when possible, otherwise hit the network.
    #[default]
    CacheFirst,
    /// Never touch the network.
    CacheOnly,
    /// Always hit the network, then refresh the cache.
    NetworkOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientOptions {
    pub url: String,
    pub request_policy: RequestPolicy,
    /// Sent with every request, after the GraphQL content headers.
    pub headers: Vec<(String, String)>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            url: DEFAULT_ENDPOINT.to_string(),
            request_policy: RequestPolicy::default(),
            headers: Vec::new(),
        }
    }
}

/// A GraphQL client: a document cache in front of a fetch exchange.
///
/// Every request goes through the injected [`Fetch`]. The cache belongs to
/// this client alone.
pub struct Client<F: Fetch> {
    options: ClientOptions,
    cache: DocumentCache,
    fetch: F,
}

/// Builds a client for the reports endpoint that sends through `fetch`.
pub fn create_client<F: Fetch>(fetch: F) -> Client<F> {
    create_client_with(fetch, ClientOptions::default())
}

pub fn create_client_with<F: Fetch>(fetch: F, options: ClientOptions) -> Client<F> {
    Client {
        options,
        cache: DocumentCache::new(),
        fetch,
    }
}

impl<F: Fetch> Client<F> {
    pub fn url(&self) -> &str {
        &self.options.url
    }

    pub fn request_policy(&self) -> RequestPolicy {
        self.options.request_policy
    }

    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    pub async fn query(&self, query: &str, variables: Map<String, Value>) -> OperationResult {
        self.query_with_policy(query, variables, self.options.request_policy)
            .await
    }

    pub async fn query_with_policy(
        &self,
        query: &str,
        variables: Map<String, Value>,
        policy: RequestPolicy,
    ) -> OperationResult {
        let key = OperationKey::new(query, &variables);

        if policy != RequestPolicy::NetworkOnly {
            if let Some(cached) = self.cache.get(key).await {
                tracing::debug!("Serving GraphQL operation {:?} from cache", key);
                return cached;
            }
            if policy == RequestPolicy::CacheOnly {
                tracing::debug!("Cache miss for {:?} under cache-only policy", key);
                return OperationResult::default();
            }
        }

        let result = self.execute(query, &variables).await;

        // errors are never cached, so the next query retries the network
        if result.error.is_none() {
            self.cache.insert(key, result.clone()).await;
        }
        result
    }

    async fn execute(&self, query: &str, variables: &Map<String, Value>) -> OperationResult {
        let body = match serde_json::to_string(&GraphQlRequest { query, variables }) {
            Ok(body) => body,
            Err(e) => return OperationResult::from_network_error(e.to_string()),
        };

        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), ACCEPT.to_string()),
        ];
        headers.extend(self.options.headers.iter().cloned());

        let request = FetchRequest {
            url: self.options.url.clone(),
            method: "POST".to_string(),
            headers,
            body,
        };

        tracing::debug!("Sending GraphQL request to: {}", self.options.url);
        let response = match self.fetch.fetch(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Fetch failed: {}", e);
                return OperationResult::from_network_error(e.to_string());
            }
        };
        tracing::debug!("GraphQL response status: {}", response.status);

        let parsed = serde_json::from_str::<GraphQlResponse>(&response.body)
            .ok()
            .filter(|r| r.data.is_some() || r.errors.is_some());

        match parsed {
            Some(graphql_response) => OperationResult::from_response(graphql_response),
            None if !response.is_success() => OperationResult::from_network_error(format!(
                "Unexpected response from GraphQL API (HTTP {})",
                response.status
            )),
            None => OperationResult::from_network_error(
                "GraphQL API response has neither data nor errors",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{fetch_fn, FetchResponse};
    use crate::utils::error::LoaderError;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct RecordingFetch {
        requests: Arc<Mutex<Vec<FetchRequest>>>,
        response: Arc<Mutex<Option<FetchResponse>>>,
    }

    impl RecordingFetch {
        fn responding(status: u16, body: Value) -> Self {
            let fetch = Self::default();
            *fetch.response.lock().unwrap() = Some(FetchResponse::new(status, body.to_string()));
            fetch
        }

        fn requests(&self) -> Vec<FetchRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl Fetch for RecordingFetch {
        async fn fetch(&self, request: FetchRequest) -> crate::Result<FetchResponse> {
            self.requests.lock().unwrap().push(request);
            let response = self.response.lock().unwrap().clone();
            response.ok_or_else(|| LoaderError::fetch("connection refused"))
        }
    }

    fn reports_body() -> Value {
        json!({ "data": { "reports": [] } })
    }

    #[test]
    fn test_create_client_uses_fixed_endpoint() {
        let client = create_client(RecordingFetch::default());
        assert_eq!(client.url(), "http://localhost:8080/graphql");
        assert_eq!(client.request_policy(), RequestPolicy::CacheFirst);
    }

    #[tokio::test]
    async fn test_query_posts_graphql_json() {
        let fetch = RecordingFetch::responding(200, reports_body());
        let client = create_client(fetch.clone());

        let mut variables = Map::new();
        variables.insert("month".to_string(), json!("10"));
        let result = client.query("query Q { reports }", variables).await;

        assert_eq!(result.data, Some(json!({ "reports": [] })));
        assert!(result.error.is_none());

        let requests = fetch.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].url, DEFAULT_ENDPOINT);
        assert_eq!(requests[0].header("content-type"), Some("application/json"));
        let body: Value = serde_json::from_str(&requests[0].body).unwrap();
        assert_eq!(
            body,
            json!({ "query": "query Q { reports }", "variables": { "month": "10" } })
        );
    }

    #[tokio::test]
    async fn test_cache_first_reuses_result() {
        let fetch = RecordingFetch::responding(200, reports_body());
        let client = create_client(fetch.clone());

        let first = client.query("query Q { reports }", Map::new()).await;
        let second = client.query("query Q { reports }", Map::new()).await;

        assert_eq!(first, second);
        assert_eq!(fetch.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_network_only_always_fetches() {
        let fetch = RecordingFetch::responding(200, reports_body());
        let options = ClientOptions {
            request_policy: RequestPolicy::NetworkOnly,
            ..ClientOptions::default()
        };
        let client = create_client_with(fetch.clone(), options);

        client.query("query Q { reports }", Map::new()).await;
        client.query("query Q { reports }", Map::new()).await;

        assert_eq!(fetch.requests().len(), 2);
        assert_eq!(client.cache().len().await, 1);
    }

    #[tokio::test]
    async fn test_cache_only_miss_is_empty_without_network() {
        let fetch = RecordingFetch::responding(200, reports_body());
        let client = create_client(fetch.clone());

        let result = client
            .query_with_policy("query Q { reports }", Map::new(), RequestPolicy::CacheOnly)
            .await;

        assert_eq!(result, OperationResult::default());
        assert!(fetch.requests().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_is_network_error_and_not_cached() {
        let fetch = RecordingFetch::default();
        let client = create_client(fetch.clone());

        let result = client.query("query Q { reports }", Map::new()).await;
        let error = result.error.unwrap();
        assert!(error.network_error.unwrap().contains("connection refused"));

        client.query("query Q { reports }", Map::new()).await;
        assert_eq!(fetch.requests().len(), 2);
        assert_eq!(client.cache().len().await, 0);
    }

    #[tokio::test]
    async fn test_graphql_errors_keep_partial_data() {
        let body = json!({
            "data": { "reports": null },
            "errors": [{ "message": "database unavailable", "path": ["reports"] }]
        });
        let client = create_client(RecordingFetch::responding(200, body));

        let result = client.query("query Q { reports }", Map::new()).await;
        let error = result.error.unwrap();
        assert!(error.network_error.is_none());
        assert_eq!(error.graphql_errors[0].message, "database unavailable");
        assert_eq!(result.data, Some(json!({ "reports": null })));
    }

    #[tokio::test]
    async fn test_non_graphql_body_is_network_error() {
        let fetch = RecordingFetch::default();
        *fetch.response.lock().unwrap() = Some(FetchResponse::new(502, "Bad Gateway"));
        let client = create_client(fetch);

        let result = client.query("query Q { reports }", Map::new()).await;
        assert_eq!(
            result.error.unwrap().network_error.as_deref(),
            Some("Unexpected response from GraphQL API (HTTP 502)")
        );
    }

    #[tokio::test]
    async fn test_success_status_without_graphql_body_is_network_error() {
        let client = create_client(RecordingFetch::responding(200, json!({ "status": "ok" })));

        let result = client.query("query Q { reports }", Map::new()).await;
        assert_eq!(
            result.error.unwrap().network_error.as_deref(),
            Some("GraphQL API response has neither data nor errors")
        );
        assert_eq!(client.cache().len().await, 0);
    }

    #[tokio::test]
    async fn test_clients_do_not_share_state() {
        let calls_a = Arc::new(AtomicUsize::new(0));
        let calls_b = Arc::new(AtomicUsize::new(0));

        let counter = calls_a.clone();
        let client_a = create_client(fetch_fn(move |_req| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, LoaderError>(FetchResponse::new(200, r#"{"data":{"reports":[]}}"#))
            }
        }));
        let counter = calls_b.clone();
        let client_b = create_client(fetch_fn(move |_req| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, LoaderError>(FetchResponse::new(200, r#"{"data":{"reports":[1]}}"#))
            }
        }));

        let a = client_a.query("query Q { reports }", Map::new()).await;
        let b = client_b.query("query Q { reports }", Map::new()).await;

        assert_eq!(a.data, Some(json!({ "reports": [] })));
        assert_eq!(b.data, Some(json!({ "reports": [1] })));
        assert_eq!(calls_a.load(Ordering::SeqCst), 1);
        assert_eq!(calls_b.load(Ordering::SeqCst), 1);
        assert_eq!(client_a.cache().len().await, 1);
        assert_eq!(client_b.cache().len().await, 1);
    }
}
