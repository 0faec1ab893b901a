use anyhow::Result;
use clap::Parser;
use celeiro_cart::{
    cli::{Args, CliApp, Commands},
    utils::{Config, ConfigError},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // LOG_LEVEL lives in the config, so load it before the subscriber and
    // report any failure once logging is up.
    let loaded = Config::from_env();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_directive(&loaded)))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("🦀 Celeiro cart starting...");

    let config = loaded.map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    tracing::info!(
        "Configuration loaded for {} environment",
        config.environment
    );
    if config.is_production() && config.coupons.is_empty() {
        tracing::warn!("No coupon codes configured for production");
    }

    let mut app = CliApp::new(&config, args.seed).map_err(|e| {
        tracing::error!("Failed to prepare cart: {}", e);
        e
    })?;
    app.run(args.command.unwrap_or(Commands::Shop)).await?;

    tracing::info!("🦀 Celeiro cart stopped");
    Ok(())
}

/// Level used when `RUST_LOG` is unset. A config that failed to load still
/// gets its error logged at the default level.
fn log_directive(loaded: &Result<Config, ConfigError>) -> &str {
    match loaded {
        Ok(config) => &config.log_level,
        Err(_) => "info",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directive_follows_config() {
        let loaded = Config::from_lookup(|key| (key == "LOG_LEVEL").then(|| "warn".to_string()));
        assert_eq!(log_directive(&loaded), "warn");
    }

    #[test]
    fn test_log_directive_survives_bad_config() {
        let loaded = Config::from_lookup(|key| {
            (key == "CHECKOUT_TIMEOUT_MS").then(|| "soon".to_string())
        });
        assert!(loaded.is_err());
        assert_eq!(log_directive(&loaded), "info");
    }
}
