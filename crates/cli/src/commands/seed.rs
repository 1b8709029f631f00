//! Seed the catalog with sample products.
//!
//! Existing products are left alone, so the command is safe to re-run.

use secrecy::SecretString;
use tracing::info;

use pomelo_api::db::{self, ProductRepository};
use pomelo_core::Money;

/// Sample catalog: (name, price in cents).
const SAMPLE_PRODUCTS: &[(&str, i64)] = &[
    ("Widget", 1000),
    ("Gadget", 350),
    ("Doohickey", 1999),
    ("Thingamajig", 750),
    ("Whatsit", 125),
];

/// Insert the sample products that aren't already present.
///
/// # Errors
///
/// Returns an error if environment variables are missing or database
/// operations fail.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("POMELO_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "POMELO_DATABASE_URL not set")?;

    let pool = db::create_pool(&database_url).await?;
    let products = ProductRepository::new(&pool);

    let mut created = 0usize;
    for &(name, cents) in SAMPLE_PRODUCTS {
        if products.get_by_name(name).await?.is_some() {
            info!(product = name, "already present, skipping");
            continue;
        }

        let product = products.create(name, Money::from_cents(cents)).await?;
        info!(product = %product.name, price = %product.price, "created");
        created += 1;
    }

    info!(created, total = SAMPLE_PRODUCTS.len(), "Seeding complete");
    Ok(())
}
