//! Store administration commands.
//!
//! # Usage
//!
//! ```bash
//! # Mark two combinations sold out
//! sia admin stock 665f1c --disable "Pink|L" --disable "Green|L"
//!
//! # Restock everything
//! sia admin stock 665f1c
//! ```

use std::io::{self, Write};

use sia_core::{ProductId, ProductLookup, VariantKey};
use sia_storefront::AppError;
use sia_storefront::api::StockUpdate;

use super::{CommandError, Session};

/// Replace a product's out-of-stock flags.
///
/// Disabled keys are checked against the product's declared colors and
/// sizes before anything is sent.
///
/// # Errors
///
/// Returns an error if the product is unknown, a key isn't offered by the
/// product, or the API request fails.
pub async fn update_stock(
    session: &mut Session,
    id: &str,
    out_of_stock: bool,
    disabled: &[String],
) -> Result<(), CommandError> {
    session.load_catalog().await?;
    let id = ProductId::new(id);
    let product = session
        .shop
        .catalog()
        .and_then(|catalog| catalog.product(&id))
        .ok_or_else(|| AppError::NotFound(id.to_string()))?;

    let update = StockUpdate::new(
        out_of_stock,
        disabled.iter().map(|k| VariantKey::from(k.as_str())),
    );
    update.validate(product).map_err(AppError::from)?;

    tracing::info!(product_id = %id, out_of_stock, disabled = disabled.len(), "Updating stock");
    let updated = session.api.update_stock(&id, &update).await?;

    let mut out = io::stdout().lock();
    match updated {
        Some(product) if product.out_of_stock => {
            writeln!(out, "{} is now out of stock", product.name)?;
        }
        Some(product) => writeln!(
            out,
            "{}: {} variant(s) unavailable",
            product.name,
            product.disabled_variants.len()
        )?,
        None => writeln!(out, "Stock updated")?,
    }
    Ok(())
}
