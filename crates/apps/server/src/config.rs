//! Command-line and environment configuration.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use catalog::{CatalogBackend, InMemoryCatalog};
use clap::{Parser, ValueEnum};
use thiserror::Error;

use crate::payments::{MockGateway, PaymentGateway, StripeGateway};
use crate::supabase::SupabaseCatalog;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set for the selected backend")]
    Missing(&'static str),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum CatalogKind {
    Supabase,
    Memory,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum PaymentKind {
    Stripe,
    Mock,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Voice talent globe API server")]
pub struct Config {
    /// Address to bind
    #[arg(long, env = "GLOBE_ADDR", default_value = "127.0.0.1:8080")]
    pub addr: SocketAddr,

    /// Talent catalog backend
    #[arg(long, value_enum, env = "CATALOG_BACKEND", default_value_t = CatalogKind::Memory)]
    pub catalog: CatalogKind,

    /// Payment backend
    #[arg(long, value_enum, env = "PAYMENT_BACKEND", default_value_t = PaymentKind::Mock)]
    pub payments: PaymentKind,

    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    #[arg(long, env = "SUPABASE_ANON_KEY", hide_env_values = true)]
    pub supabase_anon_key: Option<String>,

    /// Used for the bootstrap inserts
    #[arg(long, env = "SUPABASE_SERVICE_ROLE_KEY", hide_env_values = true)]
    pub supabase_service_role_key: Option<String>,

    #[arg(long, env = "STRIPE_SECRET_KEY", hide_env_values = true)]
    pub stripe_secret_key: Option<String>,

    /// Handed to clients for card confirmation
    #[arg(long, env = "STRIPE_PUBLISHABLE_KEY")]
    pub stripe_publishable_key: Option<String>,

    /// Timeout for outbound HTTP calls, in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = 10)]
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn catalog_backend(&self) -> Result<Arc<dyn CatalogBackend>, ConfigError> {
        match self.catalog {
            CatalogKind::Memory => Ok(Arc::new(InMemoryCatalog::new())),
            CatalogKind::Supabase => {
                let url = self
                    .supabase_url
                    .clone()
                    .ok_or(ConfigError::Missing("SUPABASE_URL"))?;
                let anon = self
                    .supabase_anon_key
                    .clone()
                    .ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))?;
                let service = self
                    .supabase_service_role_key
                    .clone()
                    .ok_or(ConfigError::Missing("SUPABASE_SERVICE_ROLE_KEY"))?;
                Ok(Arc::new(SupabaseCatalog::new(
                    url,
                    anon,
                    service,
                    self.http_timeout(),
                )?))
            }
        }
    }

    pub fn payment_gateway(&self) -> Result<Arc<dyn PaymentGateway>, ConfigError> {
        match self.payments {
            PaymentKind::Mock => Ok(Arc::new(MockGateway::new())),
            PaymentKind::Stripe => {
                let key = self
                    .stripe_secret_key
                    .clone()
                    .ok_or(ConfigError::Missing("STRIPE_SECRET_KEY"))?;
                Ok(Arc::new(StripeGateway::new(key, self.http_timeout())?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_need_no_secrets() {
        let cfg = Config::try_parse_from(["server"]).unwrap();
        assert_eq!(cfg.catalog, CatalogKind::Memory);
        assert_eq!(cfg.http_timeout(), Duration::from_secs(10));
        assert!(cfg.catalog_backend().is_ok());
        assert!(cfg.payment_gateway().is_ok());
    }

    #[test]
    fn stripe_without_key_is_fatal() {
        let mut cfg = Config::try_parse_from(["server"]).unwrap();
        cfg.payments = PaymentKind::Stripe;
        cfg.stripe_secret_key = None;
        assert!(matches!(
            cfg.payment_gateway(),
            Err(ConfigError::Missing("STRIPE_SECRET_KEY"))
        ));
    }
}
