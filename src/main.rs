use anyhow::Context;
use clap::Parser;
use finreport_loader::utils::error::ErrorSeverity;
use finreport_loader::utils::{logger, validation::Validate};
use finreport_loader::{CliConfig, LoadContext, PageData, PageLoader, ReqwestFetch};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting finreport-load");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let settings = match config.validate().and_then(|_| config.resolve()) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration failed: {} (Category: {:?})", e, e.category());
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

            let exit_code = match e.severity() {
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    };

    tracing::info!("Querying reports from {}", settings.client.url);
    let loader: PageLoader<ReqwestFetch> = PageLoader::with_options(settings.client);
    let context = LoadContext::new(ReqwestFetch::new());

    let page = match &settings.period {
        Some(period) => {
            tracing::info!("Report period: {}/{}", period.month(), period.year());
            loader.load_period(&context, period).await
        }
        None => loader.load(&context).await,
    };

    let output = serde_json::to_string_pretty(&page).context("failed to serialize page data")?;
    println!("{}", output);

    match &page {
        PageData::Payload(records) => {
            tracing::info!("✅ Loaded {} report records", records.len());
            Ok(())
        }
        PageData::Error(failure) => {
            tracing::error!(
                "❌ {} (Kind: {:?}, Cause: {})",
                failure,
                failure.kind(),
                failure.cause().unwrap_or("unknown")
            );
            std::process::exit(1);
        }
    }
}
