//! Module declaration and lifecycle
//!
//! `KeywordPulseModule` owns the typed configuration, wires the infra adapters
//! into the domain service and hands out the REST router and native client.

use crate::config::{Config, PLACEHOLDER_SUPABASE_URL};
use crate::contract::KeywordPulseApi;
use crate::domain::{Ports, Service, TracingAnalyticsPublisher};
use crate::infra::{StubSheetsExporter, SupabaseClient, TelegramClient};
use anyhow::{Context, Result};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

/// KeywordPulse module
pub struct KeywordPulseModule {
    config: RwLock<Config>,
    service: RwLock<Option<Arc<Service>>>,
}

impl Default for KeywordPulseModule {
    fn default() -> Self {
        Self {
            config: RwLock::new(Config::default()),
            service: RwLock::new(None),
        }
    }
}

impl KeywordPulseModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the HTTP adapters from `config` and initialize the service
    pub fn init(&self, config: Config) -> Result<()> {
        let ports = build_ports(&config)?;
        self.init_with_ports(config, ports);
        Ok(())
    }

    /// Initialize the service with caller-supplied ports
    pub fn init_with_ports(&self, config: Config, ports: Ports) {
        if !config.supabase.is_configured() {
            tracing::warn!("Supabase is not configured; feedback and auth endpoints will fail");
        }
        if config.telegram.bot_token.is_none() {
            tracing::warn!("TELEGRAM_BOT_TOKEN is not set; /api/notify and feedback alerts are disabled");
        }

        let service = Arc::new(Service::new(config.clone(), ports));
        *self.config.write() = config;
        *self.service.write() = Some(service);
        tracing::info!("KeywordPulse module initialized");
    }

    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    pub fn service(&self) -> Result<Arc<Service>> {
        self.service
            .read()
            .as_ref()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }

    /// In-process client for other modules
    pub fn client(&self) -> Result<Arc<dyn KeywordPulseApi>> {
        let service = self.service()?;
        Ok(Arc::new(crate::api::native::NativeClient::new(service)))
    }

    /// Register the REST routes on `router`
    pub fn register_rest(&self, router: axum::Router) -> Result<axum::Router> {
        let service = self.service()?;
        tracing::info!("Registering KeywordPulse REST routes");
        crate::api::rest::routes::register_routes(router, service)
    }
}

fn build_ports(config: &Config) -> Result<Ports> {
    let telegram = TelegramClient::new(
        config.telegram.api_base_url.clone(),
        Duration::from_secs(config.telegram.request_timeout_secs),
    )
    .context("failed to build Telegram client")?;

    // Requests are refused by the service until Supabase is configured.
    let supabase = Arc::new(
        SupabaseClient::new(
            config
                .supabase
                .url
                .as_deref()
                .unwrap_or(PLACEHOLDER_SUPABASE_URL),
            config.supabase.anon_key.clone().unwrap_or_default(),
            Duration::from_secs(config.server.request_timeout_secs),
        )
        .context("invalid Supabase URL")?,
    );

    Ok(Ports {
        telegram: Arc::new(telegram),
        feedback: supabase.clone(),
        auth: supabase.clone(),
        profiles: supabase,
        sheets: Arc::new(StubSheetsExporter),
        analytics: Arc::new(TracingAnalyticsPublisher),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_requires_init() {
        let module = KeywordPulseModule::new();
        assert!(module.service().is_err());
        assert!(module.register_rest(axum::Router::new()).is_err());
    }

    #[test]
    fn test_init_with_default_config() {
        let module = KeywordPulseModule::new();
        module.init(Config::default()).unwrap();
        assert!(module.service().is_ok());
        assert!(module.client().is_ok());
        assert_eq!(module.config().server.port, 3000);
    }

    #[test]
    fn test_init_rejects_invalid_supabase_url() {
        let mut config = Config::default();
        config.supabase.url = Some("not a url".to_string());
        assert!(KeywordPulseModule::new().init(config).is_err());
    }
}
