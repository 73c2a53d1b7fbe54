use crate::core::client::{create_client_with, Client, ClientOptions};
use crate::core::query::{ReportPeriod, REPORT_PERIOD_QUERY, REPORT_QUERY};
use crate::domain::model::{FailureKind, LoadFailure, OperationResult, PageData, ReportRecord};
use crate::domain::ports::{Fetch, LoadContext};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Whether a loader builds a fresh client per load or keeps one around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientScope {
    /// New client, and so an empty cache, on every load.
    #[default]
    PerLoad,
    /// One client built from the first load's fetch and reused afterwards.
    Shared,
}

pub struct PageLoader<F: Fetch> {
    options: ClientOptions,
    scope: ClientScope,
    shared: OnceCell<Arc<Client<F>>>,
}

impl<F: Fetch + Clone> PageLoader<F> {
    pub fn new() -> Self {
        Self::with_options(ClientOptions::default())
    }

    pub fn with_options(options: ClientOptions) -> Self {
        Self {
            options,
            scope: ClientScope::default(),
            shared: OnceCell::new(),
        }
    }

    pub fn scope(mut self, scope: ClientScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn client_scope(&self) -> ClientScope {
        self.scope
    }

    /// Loads the report page with the fixed `ReportQuery` document and no
    /// variables. Context params never change the request.
    pub async fn load(&self, context: &LoadContext<F>) -> PageData {
        self.run(context, REPORT_QUERY, Map::new()).await
    }

    /// Loads the report page for `period`, bound as GraphQL variables.
    pub async fn load_period(&self, context: &LoadContext<F>, period: &ReportPeriod) -> PageData {
        self.run(context, REPORT_PERIOD_QUERY, period.variables())
            .await
    }

    async fn client(&self, context: &LoadContext<F>) -> Arc<Client<F>> {
        match self.scope {
            ClientScope::PerLoad => Arc::new(create_client_with(
                context.fetch.clone(),
                self.options.clone(),
            )),
            ClientScope::Shared => self
                .shared
                .get_or_init(|| async {
                    tracing::debug!("Initializing shared GraphQL client for {}", self.options.url);
                    Arc::new(create_client_with(
                        context.fetch.clone(),
                        self.options.clone(),
                    ))
                })
                .await
                .clone(),
        }
    }

    async fn run(
        &self,
        context: &LoadContext<F>,
        query: &str,
        variables: Map<String, Value>,
    ) -> PageData {
        let client = self.client(context).await;
        let result = client.query(query, variables).await;
        into_page_data(result)
    }
}

impl<F: Fetch + Clone> Default for PageLoader<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot load with a fresh client.
pub async fn load<F: Fetch + Clone>(context: &LoadContext<F>) -> PageData {
    PageLoader::new().load(context).await
}

fn into_page_data(result: OperationResult) -> PageData {
    if let Some(error) = result.error {
        let kind = if error.network_error.is_some() {
            FailureKind::Network
        } else {
            FailureKind::GraphQl
        };
        tracing::debug!("Report query failed ({:?}): {}", kind, error);
        return PageData::Error(LoadFailure::new(kind, Some(error.to_string())));
    }

    let reports = result
        .data
        .and_then(|mut data| data.get_mut("reports").map(Value::take));

    match reports {
        Some(Value::Array(items)) => {
            tracing::debug!("Loaded {} report records", items.len());
            PageData::Payload(items.into_iter().map(ReportRecord::new).collect())
        }
        Some(other) => PageData::Error(LoadFailure::new(
            FailureKind::MalformedResponse,
            Some(format!("reports is not a list: {}", other)),
        )),
        None => PageData::Error(LoadFailure::new(
            FailureKind::MalformedResponse,
            Some("response has no reports field".to_string()),
        )),
    }
}
