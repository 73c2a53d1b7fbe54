use crate::core::client::{ClientOptions, RequestPolicy, DEFAULT_ENDPOINT};
use crate::core::query::ReportPeriod;
use crate::utils::error::{LoaderError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub client: ClientSection,
    pub report: Option<ReportSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSection {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub request_policy: RequestPolicy,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_policy: RequestPolicy::default(),
            headers: BTreeMap::new(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    pub month: Option<String>,
    pub year: Option<String>,
}

impl TomlConfig {
    /// Reads and parses a TOML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LoaderError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            url: self.client.endpoint.clone(),
            request_policy: self.client.request_policy,
            headers: self
                .client
                .headers
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        }
    }

    pub fn report_period(&self) -> Result<Option<ReportPeriod>> {
        match &self.report {
            Some(report) => {
                ReportPeriod::from_parts(report.month.as_deref(), report.year.as_deref())
            }
            None => Ok(None),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("client.endpoint", &self.client.endpoint)?;
        for name in self.client.headers.keys() {
            validate_non_empty_string("client.headers", name)?;
        }
        self.report_period()?;
        Ok(())
    }
}

/// Replaces `${VAR}` with the environment value; unset variables stay as written.
fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LoaderError::ConfigError {
        message: format!("invalid substitution pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}
