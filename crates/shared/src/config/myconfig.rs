use anyhow::{Context, Result, anyhow};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Checkout pricing constants. Defaults mirror the storefront's historical
/// behavior: free shipping at 100.00, otherwise a 10.00 flat fee, 15% tax.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    pub free_shipping_threshold: Decimal,
    pub flat_shipping_fee: Decimal,
    pub tax_rate: Decimal,
}

impl PricingConfig {
    pub fn init() -> Result<Self> {
        Ok(Self {
            free_shipping_threshold: decimal_env("FREE_SHIPPING_THRESHOLD", "100")?,
            flat_shipping_fee: decimal_env("FLAT_SHIPPING_FEE", "10")?,
            tax_rate: decimal_env("TAX_RATE", "0.15")?,
        })
    }
}

fn decimal_env(name: &str, default: &str) -> Result<Decimal> {
    let raw = std::env::var(name).unwrap_or_else(|_| default.to_string());
    Decimal::from_str(&raw).with_context(|| format!("Unable to parse {name} as a decimal"))
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub run_migrations: bool,
    pub port: u16,
    pub db_max_conn: u32,
    pub db_min_conn: u32,
    pub pricing: PricingConfig,
}

impl Config {
    pub fn init() -> Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("Missing environment variable: DATABASE_URL")?;
        let jwt_secret =
            std::env::var("JWT_SECRET").context("Missing environment variable: JWT_SECRET")?;
        let run_migrations_str = std::env::var("RUN_MIGRATIONS")
            .context("Missing environment variable: RUN_MIGRATIONS")?;
        let port_str = std::env::var("PORT").context("Missing environment variable: PORT")?;

        let run_migrations = match run_migrations_str.as_str() {
            "true" => true,
            "false" => false,
            other => {
                return Err(anyhow!(
                    "RUN_MIGRATIONS must be 'true' or 'false', got '{}'",
                    other
                ));
            }
        };

        let db_max_conn: u32 = std::env::var("DB_MAX_CONNECTION")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("Unable to parse DB_MAX_CONNECTION as u32")?;

        let db_min_conn: u32 = std::env::var("DB_MIN_CONNECTION")
            .unwrap_or_else(|_| "1".to_string())
            .parse::<u32>()
            .context("Unable to parse DB_MIN_CONNECTION as u32")?;

        let port = port_str
            .parse::<u16>()
            .context("PORT must be a valid u16 integer")?;

        let pricing = PricingConfig::init()?;

        Ok(Self {
            database_url,
            jwt_secret,
            run_migrations,
            port,
            db_max_conn,
            db_min_conn,
            pricing,
        })
    }
}
