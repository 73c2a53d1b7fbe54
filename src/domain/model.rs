use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Message shown to the page whenever a load fails, whatever the cause.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to fetch data from GraphQL API";

/// One row of the monthly report, kept exactly as the server sent it.
///
/// Accessors read the known fields; a missing or mistyped field reads as
/// `None` and the row still serializes back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportRecord(Value);

impl ReportRecord {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    pub fn typename(&self) -> Option<&str> {
        self.str_field("__typename")
    }

    pub fn month(&self) -> Option<&str> {
        self.str_field("month")
    }

    pub fn year(&self) -> Option<&str> {
        self.str_field("year")
    }

    pub fn category(&self) -> Option<&str> {
        self.str_field("category")
    }

    pub fn total_income(&self) -> Option<f64> {
        self.0.get("totalIncome").and_then(Value::as_f64)
    }

    pub fn total_expenses(&self) -> Option<f64> {
        self.0.get("totalExpenses").and_then(Value::as_f64)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    fn str_field(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }
}

/// Data handed back to the page after a load.
///
/// Serializes as `{"payload": [...]}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageData {
    Payload(Vec<ReportRecord>),
    Error(LoadFailure),
}

impl PageData {
    pub fn payload(&self) -> Option<&[ReportRecord]> {
        match self {
            PageData::Payload(records) => Some(records),
            PageData::Error(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&LoadFailure> {
        match self {
            PageData::Payload(_) => None,
            PageData::Error(failure) => Some(failure),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, PageData::Error(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The request never produced a GraphQL response.
    Network,
    /// The server answered with GraphQL errors.
    GraphQl,
    /// The response had no usable `reports` list.
    MalformedResponse,
}

/// Why a load failed. Only the generic message reaches the serialized page
/// data; kind and cause stay available to Rust callers.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadFailure {
    kind: FailureKind,
    cause: Option<String>,
}

impl LoadFailure {
    pub fn new(kind: FailureKind, cause: Option<String>) -> Self {
        Self { kind, cause }
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn cause(&self) -> Option<&str> {
        self.cause.as_deref()
    }

    pub fn message(&self) -> &'static str {
        LOAD_FAILED_MESSAGE
    }
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Serialize for LoadFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

/// Body of a GraphQL-over-HTTP POST.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: &'a Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
}

/// A GraphQL response body as sent by the server.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

/// Network and GraphQL errors of one operation, reported together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombinedError {
    pub network_error: Option<String>,
    pub graphql_errors: Vec<GraphQlError>,
}

impl CombinedError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            network_error: Some(message.into()),
            graphql_errors: Vec::new(),
        }
    }

    pub fn graphql(errors: Vec<GraphQlError>) -> Self {
        Self {
            network_error: None,
            graphql_errors: errors,
        }
    }
}

impl fmt::Display for CombinedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(network_error) = &self.network_error {
            return write!(f, "[Network] {}", network_error);
        }
        let messages: Vec<String> = self
            .graphql_errors
            .iter()
            .map(|e| format!("[GraphQL] {}", e.message))
            .collect();
        f.write_str(&messages.join("\n"))
    }
}

/// Outcome of one query. `error` is set when anything went wrong, even if
/// partial `data` came back too.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationResult {
    pub data: Option<Value>,
    pub error: Option<CombinedError>,
}

impl OperationResult {
    pub fn from_response(response: GraphQlResponse) -> Self {
        let error = match response.errors {
            Some(errors) if !errors.is_empty() => Some(CombinedError::graphql(errors)),
            _ => None,
        };
        Self {
            data: response.data,
            error,
        }
    }

    pub fn from_network_error(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(CombinedError::network(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_report_record_round_trips_unchanged() {
        let raw = json!({
            "__typename": "Report",
            "month": "10",
            "year": "2025",
            "category": "Groceries",
            "totalIncome": 0,
            "totalExpenses": 120.5,
            "currency": "EUR"
        });

        let record: ReportRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(record.category(), Some("Groceries"));
        assert_eq!(record.total_income(), Some(0.0));
        assert_eq!(record.total_expenses(), Some(120.5));
        assert_eq!(record.get("currency"), Some(&json!("EUR")));
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }

    #[test]
    fn test_report_record_with_null_field() {
        let raw = json!({ "__typename": "Report", "category": "Rent", "totalIncome": null });

        let record: ReportRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(record.total_income(), None);
        assert_eq!(record.month(), None);
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }

    #[test]
    fn test_page_data_error_serializes_as_fixed_message() {
        let data = PageData::Error(LoadFailure::new(
            FailureKind::Network,
            Some("connection refused".to_string()),
        ));

        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!({ "error": "Failed to fetch data from GraphQL API" })
        );
        assert_eq!(data.failure().unwrap().cause(), Some("connection refused"));
    }

    #[test]
    fn test_page_data_payload_serializes_under_payload_key() {
        let data = PageData::Payload(vec![]);
        assert_eq!(serde_json::to_value(&data).unwrap(), json!({ "payload": [] }));
        assert!(!data.is_error());
    }

    #[test]
    fn test_empty_errors_list_is_not_an_error() {
        let response: GraphQlResponse =
            serde_json::from_value(json!({ "data": { "reports": [] }, "errors": [] })).unwrap();
        let result = OperationResult::from_response(response);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_combined_error_display() {
        let err = CombinedError::graphql(vec![GraphQlError {
            message: "Unknown field".to_string(),
            path: None,
        }]);
        assert_eq!(err.to_string(), "[GraphQL] Unknown field");
        assert_eq!(CombinedError::network("timeout").to_string(), "[Network] timeout");
    }
}
