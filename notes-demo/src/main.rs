use notes_demo::{DemoConfig, DemoError, Dependencies, LogFormat, Scenario};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), DemoError> {
    dotenv::dotenv().ok();

    let config = DemoConfig::from_env()?;
    init_tracing(config.log_format);

    let dependencies = Dependencies::new(&config).await?;
    let scenario = Scenario::new(dependencies.store, config.refresh_wait);

    match scenario.run().await {
        Ok(report) => {
            info!(
                hits = report.hits_after_bulk.len(),
                async_indexed = report.async_indexed,
                "Demo finished"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Demo aborted");
            Err(e)
        }
    }
}
