//! Wishlist commands.

use std::io::{self, Write};

use sia_core::ProductId;
use sia_storefront::filters::format_inr;

use super::{CommandError, Session, VariantArgs};

/// Print the saved entries.
///
/// # Errors
///
/// Returns an error if output fails.
pub fn show(session: &Session) -> Result<(), CommandError> {
    let wishlist = session.shop.store().wishlist();
    let mut out = io::stdout().lock();

    if wishlist.is_empty() {
        writeln!(out, "Your wishlist is empty")?;
        return Ok(());
    }

    for entry in wishlist {
        let label = entry
            .selection
            .label()
            .map(|l| format!(" ({l})"))
            .unwrap_or_default();
        writeln!(
            out,
            "{:<12} {}{label} {}",
            entry.product_id().as_str(),
            entry.snapshot.name,
            format_inr(&entry.snapshot.price.to_string())
        )?;
    }
    writeln!(out, "{} saved", wishlist.len())?;
    Ok(())
}

/// Save or unsave a product.
///
/// # Errors
///
/// Returns an error if the catalog can't be loaded or the choice is
/// incomplete.
pub async fn toggle(
    session: &mut Session,
    id: &str,
    variant: &VariantArgs,
) -> Result<(), CommandError> {
    session.load_catalog().await?;
    let outcome = session.shop.toggle_wishlist(&ProductId::new(id));
    let outcome = session.resolve_selection(outcome, variant);
    session.report(&outcome)
}

/// Remove every saved entry for a product.
///
/// # Errors
///
/// Returns an error if output fails.
pub fn remove(session: &mut Session, id: &str) -> Result<(), CommandError> {
    let outcome = session.shop.remove_from_wishlist(&ProductId::new(id));
    session.report(&outcome)
}

/// Move one saved product into the cart.
///
/// Uses the saved details if the catalog can't be fetched.
///
/// # Errors
///
/// Returns an error if output fails.
pub async fn move_to_cart(session: &mut Session, id: &str) -> Result<(), CommandError> {
    session.try_load_catalog().await;
    let outcome = session.shop.move_to_cart(&ProductId::new(id));
    session.report(&outcome)
}

/// Move everything saved into the cart.
///
/// # Errors
///
/// Returns an error if output fails.
pub async fn move_all(session: &mut Session) -> Result<(), CommandError> {
    session.try_load_catalog().await;
    let outcome = session.shop.move_all_wishlist_to_cart();
    session.report(&outcome)
}
