use crate::config::toml_config::TomlConfig;
use crate::core::client::{ClientOptions, RequestPolicy};
use crate::core::query::ReportPeriod;
use crate::utils::error::Result;
use crate::utils::validation::{validate_url, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "finreport-load")]
#[command(about = "Load the finreport reports page data from the GraphQL API")]
pub struct CliConfig {
    #[arg(long, help = "GraphQL endpoint, overrides the config file")]
    pub endpoint: Option<String>,

    #[arg(long, help = "Path to a TOML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Report month (1-12), defaults to the current month when only --year is given")]
    pub month: Option<String>,

    #[arg(long, help = "Report year, defaults to the current year when only --month is given")]
    pub year: Option<String>,

    #[arg(long, help = "Bypass the client cache")]
    pub network_only: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

/// Settings after merging the config file with command line flags.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadSettings {
    pub client: ClientOptions,
    /// `None` runs the fixed query.
    pub period: Option<ReportPeriod>,
}

impl CliConfig {
    pub fn resolve(&self) -> Result<LoadSettings> {
        let file_config = match &self.config {
            Some(path) => {
                tracing::debug!("Loading config file: {}", path);
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };
        file_config.validate()?;

        let mut client = file_config.client_options();
        if let Some(endpoint) = &self.endpoint {
            client.url = endpoint.clone();
        }
        if self.network_only {
            client.request_policy = RequestPolicy::NetworkOnly;
        }

        let period = match (&self.month, &self.year) {
            (None, None) => file_config.report_period()?,
            (month, year) => ReportPeriod::from_parts(month.as_deref(), year.as_deref())?,
        };

        Ok(LoadSettings { client, period })
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.endpoint {
            validate_url("endpoint", endpoint)?;
        }
        Ok(())
    }
}
