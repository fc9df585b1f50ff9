//! Cart commands.

use std::io::{self, Write};

use sia_core::{ProductId, VariantSelection};
use sia_storefront::filters::format_inr;

use super::{CommandError, Session, VariantArgs};

/// Print the cart lines and total.
///
/// # Errors
///
/// Returns an error if output fails.
pub fn show(session: &Session) -> Result<(), CommandError> {
    let store = session.shop.store();
    let mut out = io::stdout().lock();

    if store.cart().is_empty() {
        writeln!(out, "🛒 Your cart is empty")?;
        return Ok(());
    }

    for line in store.cart() {
        let label = line
            .selection
            .label()
            .map(|l| format!(" ({l})"))
            .unwrap_or_default();
        writeln!(
            out,
            "{:<12} {}{label} x{} = {}",
            line.selection.product_id.as_str(),
            line.snapshot.name,
            line.quantity,
            format_inr(&line.line_total().to_string())
        )?;
    }
    writeln!(
        out,
        "{} item(s), total {}",
        store.cart_count(),
        format_inr(&store.cart_total().to_string())
    )?;
    Ok(())
}

/// Add a product, choosing variants from `--color`/`--size`.
///
/// # Errors
///
/// Returns an error if the catalog can't be loaded or the choice is
/// incomplete.
pub async fn add(
    session: &mut Session,
    id: &str,
    variant: &VariantArgs,
) -> Result<(), CommandError> {
    session.load_catalog().await?;
    let outcome = session.shop.add_to_cart(&ProductId::new(id));
    let outcome = session.resolve_selection(outcome, variant);
    session.report(&outcome)
}

/// Change a line's quantity; a line reaching zero is removed.
///
/// # Errors
///
/// Returns an error if output fails.
pub fn change_quantity(
    session: &mut Session,
    id: &str,
    delta: i64,
    variant: &VariantArgs,
) -> Result<(), CommandError> {
    let outcome = session.shop.change_quantity(&selection(id, variant), delta);
    session.report(&outcome)?;
    show(session)
}

/// Remove a line.
///
/// # Errors
///
/// Returns an error if output fails.
pub fn remove(session: &mut Session, id: &str, variant: &VariantArgs) -> Result<(), CommandError> {
    let outcome = session.shop.remove_from_cart(&selection(id, variant));
    session.report(&outcome)?;
    show(session)
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if output fails.
pub fn clear(session: &mut Session) -> Result<(), CommandError> {
    let outcome = session.shop.clear_cart();
    session.report(&outcome)?;
    show(session)
}

fn selection(id: &str, variant: &VariantArgs) -> VariantSelection {
    VariantSelection::new(id, variant.color.clone(), variant.size.clone())
}
