//! # Product Types
//!
//! Parking-pass catalog types for parkpay.
//! The catalog is loaded from `config/products.toml` at startup and is
//! read-only for the lifetime of the process.

use serde::{Deserialize, Serialize};

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    INR,
    USD,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::INR => "INR",
            Currency::USD => "USD",
        }
    }

    /// Returns the number of decimal places for this currency
    pub fn decimal_places(&self) -> u8 {
        2
    }

    /// Convert a decimal amount to the smallest currency unit (paise, cents).
    /// Rounds to the nearest integer so fractional-unit inputs cannot
    /// produce a fractional amount on the wire.
    pub fn to_minor_units(&self, amount: f64) -> i64 {
        let multiplier = 10_f64.powi(self.decimal_places() as i32);
        (amount * multiplier).round() as i64
    }

    /// Convert from the smallest unit back to decimal
    pub fn from_minor_units(&self, amount: i64) -> f64 {
        let divisor = 10_f64.powi(self.decimal_places() as i32);
        amount as f64 / divisor
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::INR
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Price with amount in smallest currency unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in smallest currency unit (paise for INR)
    pub amount: i64,
    /// Currency
    #[serde(default)]
    pub currency: Currency,
}

impl Price {
    /// Create a price from a decimal amount
    pub fn new(amount: f64, currency: Currency) -> Self {
        Self {
            amount: currency.to_minor_units(amount),
            currency,
        }
    }

    /// Create a price directly from minor units (paise)
    pub fn from_minor_units(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Get the decimal amount
    pub fn as_decimal(&self) -> f64 {
        self.currency.from_minor_units(self.amount)
    }

    /// Format for display (e.g., "₹120.00")
    pub fn display(&self) -> String {
        let symbol = match self.currency {
            Currency::INR => "₹",
            Currency::USD => "$",
        };
        format!("{}{:.2}", symbol, self.as_decimal())
    }
}

/// A parking pass in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier (e.g., "hourly-standard")
    pub id: String,

    /// Display name
    pub name: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Price
    pub price: Price,

    /// Covered parking duration in hours
    pub duration_hours: u32,

    /// Whether this pass is available for purchase
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Create a new parking pass
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Price,
        duration_hours: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            duration_hours,
            active: true,
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Duration as a display string (e.g., "2h")
    pub fn duration_display(&self) -> String {
        format!("{}h", self.duration_hours)
    }
}

/// Product catalog (loaded from config, immutable afterwards)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCatalog {
    pub products: Vec<Product>,
}

impl ProductCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Add a product to the catalog
    pub fn add(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Find a product by ID
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Get all active products
    pub fn active_products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.active)
    }

    /// Load catalog from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minor_unit_conversion() {
        let inr = Currency::INR;
        assert_eq!(inr.to_minor_units(100.0), 10000);
        assert_eq!(inr.from_minor_units(10000), 100.0);
    }

    #[test]
    fn test_minor_unit_rounding() {
        // A fractional paise input must round, never truncate or carry
        let inr = Currency::INR;
        assert_eq!(inr.to_minor_units(100.004), 10000);
        assert_eq!(inr.to_minor_units(100.006), 10001);
        assert_eq!(inr.to_minor_units(99.999), 10000);
    }

    #[test]
    fn test_price_display() {
        let price = Price::new(120.0, Currency::INR);
        assert_eq!(price.display(), "₹120.00");

        let price_usd = Price::new(9.99, Currency::USD);
        assert_eq!(price_usd.display(), "$9.99");
    }

    #[test]
    fn test_catalog_lookup() {
        let mut catalog = ProductCatalog::new();
        catalog.add(Product::new(
            "hourly-standard",
            "Standard Hourly",
            Price::new(40.0, Currency::INR),
            1,
        ));
        catalog.add(
            Product::new(
                "full-day",
                "Full Day Pass",
                Price::new(300.0, Currency::INR),
                24,
            )
            .with_description("24 hour covered parking"),
        );

        assert!(catalog.get("hourly-standard").is_some());
        assert!(catalog.get("999").is_none());

        let pass = catalog.get("full-day").unwrap();
        assert_eq!(pass.duration_hours, 24);
        assert_eq!(pass.duration_display(), "24h");
        assert_eq!(catalog.active_products().count(), 2);
    }

    #[test]
    fn test_catalog_from_toml() {
        let toml_str = r#"
            [[products]]
            id = "hourly-standard"
            name = "Standard Hourly"
            price = { amount = 4000, currency = "INR" }
            duration_hours = 1
        "#;

        let catalog = ProductCatalog::from_toml(toml_str).unwrap();
        assert_eq!(catalog.products.len(), 1);
        assert_eq!(catalog.get("hourly-standard").unwrap().price.amount, 4000);
    }
}
