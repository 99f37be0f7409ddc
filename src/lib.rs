pub mod aggregator;
pub mod cli;
pub mod core;
pub mod providers;

use crate::aggregator::RateAggregator;
use crate::core::config::AppConfig;
use crate::core::{ConversionRequest, RateProvider};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    BestRate {
        request: Option<ConversionRequest>,
        raw: bool,
    },
    Compare {
        request: ConversionRequest,
    },
}

/// Registers the configured providers in their fixed order: api1, api2, api3.
pub fn build_aggregator(config: &AppConfig) -> Result<RateAggregator> {
    let mut registered: Vec<Arc<dyn RateProvider>> = Vec::new();
    let configured = &config.providers;

    if let Some(c) = &configured.api1 {
        registered.push(Arc::new(providers::Api1Provider::new(
            &c.base_url,
            c.timeout(),
        )?));
    }
    if let Some(c) = &configured.api2 {
        registered.push(Arc::new(providers::Api2Provider::new(
            &c.base_url,
            c.timeout(),
        )?));
    }
    if let Some(c) = &configured.api3 {
        registered.push(Arc::new(providers::Api3Provider::new(
            &c.base_url,
            c.timeout(),
        )?));
    }

    let aggregator = RateAggregator::new(registered);
    debug!(providers = ?aggregator.provider_names(), "Registered providers");
    Ok(aggregator)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("xrate starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let aggregator = build_aggregator(&config)?;

    match command {
        AppCommand::BestRate { request, raw } => {
            cli::best_rate::run(&aggregator, request.as_ref(), raw).await
        }
        AppCommand::Compare { request } => cli::compare::run(&aggregator, &request).await,
    }
}
