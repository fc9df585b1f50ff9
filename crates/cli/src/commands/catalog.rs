//! Catalog browsing commands.

use std::io::{self, Write};

use sia_core::availability::{available_colors, available_sizes};
use sia_core::{Product, ProductId, ProductLookup};
use sia_storefront::filters::format_inr;
use sia_storefront::{Catalog, SortOrder};

use super::{CommandError, Session};

/// Print one page of the in-stock listing.
///
/// # Errors
///
/// Returns an error if the catalog can't be loaded or output fails.
pub async fn list(
    session: &mut Session,
    category: Option<&str>,
    sort: SortOrder,
    page: usize,
) -> Result<(), CommandError> {
    let catalog = loaded(session).await?;
    let listing = catalog.page(category, sort, page);

    let mut out = io::stdout().lock();
    if listing.items.is_empty() {
        writeln!(out, "No products found")?;
        return Ok(());
    }

    for product in &listing.items {
        write_summary(&mut out, product)?;
    }
    writeln!(out, "Page {} of {}", listing.page, listing.total_pages)?;
    Ok(())
}

/// Print the new arrivals.
///
/// # Errors
///
/// Returns an error if the catalog can't be loaded or output fails.
pub async fn new_arrivals(session: &mut Session) -> Result<(), CommandError> {
    let catalog = loaded(session).await?;

    let mut out = io::stdout().lock();
    let arrivals = catalog.new_arrivals();
    if arrivals.is_empty() {
        writeln!(out, "No new arrivals")?;
    }
    for product in arrivals {
        write_summary(&mut out, product)?;
    }
    Ok(())
}

/// Print categories in display order; home page categories are starred.
///
/// # Errors
///
/// Returns an error if the catalog can't be loaded or output fails.
pub async fn categories(session: &mut Session) -> Result<(), CommandError> {
    let catalog = loaded(session).await?;

    let mut out = io::stdout().lock();
    for category in catalog.categories() {
        let marker = if category.show_on_main_page { "*" } else { " " };
        let count = catalog.in_category(&category.name).count();
        writeln!(out, "{marker} {} ({count})", category.name)?;
    }
    Ok(())
}

/// Print a product with its variants and their availability.
///
/// # Errors
///
/// Returns `Rejected` for an unknown product, or an error if the catalog
/// can't be loaded or output fails.
pub async fn show(session: &mut Session, id: &str) -> Result<(), CommandError> {
    let catalog = loaded(session).await?;
    let product = catalog
        .product(&ProductId::new(id))
        .ok_or_else(|| CommandError::Rejected(format!("No product with id {id}")))?;

    let mut out = io::stdout().lock();
    writeln!(out, "{} [{}]", product.name, product.id)?;
    match product.mrp {
        Some(mrp) if mrp > product.price => writeln!(
            out,
            "  {} (MRP {})",
            format_inr(&product.price.to_string()),
            format_inr(&mrp.to_string())
        )?,
        _ => writeln!(out, "  {}", format_inr(&product.price.to_string()))?,
    }
    if let Some(category) = &product.category {
        writeln!(out, "  Category: {category}")?;
    }
    if product.out_of_stock {
        writeln!(out, "  Out of stock")?;
    }
    write_axis(&mut out, "Colors", &product.colors, &available_colors(product, None))?;
    write_axis(&mut out, "Sizes", &product.sizes, &available_sizes(product, None))?;
    if !product.disabled_variants.is_empty() {
        let keys: Vec<_> = product.disabled_variants.iter().map(ToString::to_string).collect();
        writeln!(out, "  Unavailable: {}", keys.join(", "))?;
    }
    if !product.description.is_empty() {
        writeln!(out, "\n{}", product.description)?;
    }
    Ok(())
}

// =============================================================================
// Helper Functions
// =============================================================================

async fn loaded(session: &mut Session) -> Result<&Catalog, CommandError> {
    session.load_catalog().await?;
    session
        .shop
        .catalog()
        .ok_or_else(|| {
            CommandError::Rejected("Products are still loading. Please try again.".to_string())
        })
}

fn write_summary(out: &mut impl Write, product: &Product) -> io::Result<()> {
    let variants = if product.has_variants() { " (options)" } else { "" };
    writeln!(
        out,
        "{:<12} {:<40} {:>10}{variants}",
        product.id.as_str(),
        product.name,
        format_inr(&product.price.to_string())
    )
}

/// Declared values, with unavailable ones struck out.
fn write_axis(
    out: &mut impl Write,
    label: &str,
    declared: &[String],
    available: &[String],
) -> io::Result<()> {
    if declared.is_empty() {
        return Ok(());
    }

    let values: Vec<String> = declared
        .iter()
        .map(|v| {
            if available.contains(v) {
                v.clone()
            } else {
                format!("{v} (sold out)")
            }
        })
        .collect();
    writeln!(out, "  {label}: {}", values.join(", "))
}
