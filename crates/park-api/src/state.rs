//! # Application State
//!
//! Shared state for the Axum application: the payment gateway, the
//! parking-pass catalog, and server configuration. Everything here is
//! constructed once at startup and read-only afterwards.

use park_core::{BoxedGateway, Currency, Price, Product, ProductCatalog};
use park_razorpay::RazorpayGateway;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Front-end origin allowed by CORS (restricted in production only)
    pub allowed_origin: Option<String>,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            allowed_origin: std::env::var("ALLOWED_ORIGIN").ok(),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address")
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment gateway (Razorpay in this deployment)
    pub gateway: BoxedGateway,
    /// Parking-pass catalog
    pub catalog: ProductCatalog,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create state from the environment.
    ///
    /// Missing gateway credentials are fatal: the process must refuse to
    /// start rather than accept payments it cannot create.
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let catalog = load_product_catalog()?;

        let gateway = RazorpayGateway::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Razorpay: {}", e))?;

        Ok(Self {
            gateway: Arc::new(gateway),
            catalog,
            config,
        })
    }

    /// Create state with an explicit gateway and catalog (for tests)
    pub fn with_gateway(gateway: BoxedGateway, catalog: ProductCatalog, config: AppConfig) -> Self {
        Self {
            gateway,
            catalog,
            config,
        }
    }
}

/// Load the catalog from config, falling back to the built-in passes
fn load_product_catalog() -> anyhow::Result<ProductCatalog> {
    let config_paths = [
        "config/products.toml",
        "../config/products.toml",
        "../../config/products.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let catalog: ProductCatalog = toml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded {} products from {}", catalog.products.len(), path);
            return Ok(catalog);
        }
    }

    tracing::warn!("No product catalog file found, using built-in catalog");
    Ok(default_catalog())
}

/// Built-in parking passes, used when no catalog file is present
pub fn default_catalog() -> ProductCatalog {
    let mut catalog = ProductCatalog::new();
    catalog.add(
        Product::new(
            "hourly-standard",
            "Standard Hourly",
            Price::from_minor_units(4000, Currency::INR),
            1,
        )
        .with_description("One hour of covered parking"),
    );
    catalog.add(
        Product::new(
            "half-day",
            "Half Day Pass",
            Price::from_minor_units(15000, Currency::INR),
            6,
        )
        .with_description("Six hours of covered parking"),
    );
    catalog.add(
        Product::new(
            "full-day",
            "Full Day Pass",
            Price::from_minor_units(30000, Currency::INR),
            24,
        )
        .with_description("24 hours of covered parking"),
    );
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_defaults() {
        std::env::remove_var("HOST");
        std::env::remove_var("PORT");
        std::env::remove_var("ALLOWED_ORIGIN");

        let config = AppConfig::from_env();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(!config.is_production());
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            allowed_origin: None,
            environment: "test".to_string(),
        };

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_default_catalog() {
        let catalog = default_catalog();
        assert_eq!(catalog.products.len(), 3);
        assert!(catalog.get("full-day").is_some());
        assert!(catalog.get("999").is_none());
    }
}
