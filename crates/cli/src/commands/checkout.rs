//! Buy-now and checkout commands.

use std::io::{self, Write};

use sia_core::ProductId;
use sia_storefront::api::ApiError;
use sia_storefront::filters::format_inr;
use sia_storefront::{ActionOutcome, AppError, CheckoutSource, CustomerDetails, PaymentMode};

use super::{CommandError, Session, VariantArgs};

/// Customer details and options for `sia checkout`.
#[derive(Debug, Clone, clap::Args)]
pub struct CheckoutArgs {
    /// Full name
    #[arg(long)]
    pub name: String,

    /// 10-digit mobile number
    #[arg(long)]
    pub phone: String,

    /// Delivery address
    #[arg(long)]
    pub address: String,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub state: Option<String>,

    /// 6-digit pincode
    #[arg(long)]
    pub pincode: Option<String>,

    /// `cod` or `online`
    #[arg(long, default_value = "cod")]
    pub payment: PaymentMode,

    /// Check out the pending buy-now item instead of the cart
    #[arg(long)]
    pub express: bool,
}

impl From<&CheckoutArgs> for CustomerDetails {
    fn from(args: &CheckoutArgs) -> Self {
        Self {
            name: args.name.clone(),
            phone: args.phone.clone(),
            address: args.address.clone(),
            email: args.email.clone(),
            city: args.city.clone(),
            state: args.state.clone(),
            pincode: args.pincode.clone(),
        }
    }
}

/// Stash a single product for express checkout.
///
/// # Errors
///
/// Returns an error if the catalog can't be loaded or the choice is
/// incomplete.
pub async fn buy_now(
    session: &mut Session,
    id: &str,
    variant: &VariantArgs,
) -> Result<(), CommandError> {
    session.load_catalog().await?;
    let outcome = session.shop.buy_now(&ProductId::new(id));
    let outcome = session.resolve_selection(outcome, variant);
    session.report(&outcome)?;

    if let ActionOutcome::ExpressReady(express) = &outcome {
        let label = express
            .item
            .selection
            .label()
            .map(|l| format!(" ({l})"))
            .unwrap_or_default();
        writeln!(
            io::stdout().lock(),
            "{}{label} {} - run `sia checkout --express` to order",
            express.item.snapshot.name,
            format_inr(&express.item.line_total().to_string())
        )?;
    }
    Ok(())
}

/// Place an order for the cart, or for the buy-now item with `--express`.
///
/// # Errors
///
/// Returns `Rejected` with a shopper-facing message if the order can't be
/// built or the API refuses or can't be reached.
pub async fn place_order(session: &mut Session, args: &CheckoutArgs) -> Result<(), CommandError> {
    let source = if args.express {
        CheckoutSource::Express
    } else {
        CheckoutSource::Cart
    };
    let details = CustomerDetails::from(args);

    let receipt = match session
        .shop
        .checkout(&session.api, &details, args.payment, source)
        .await
    {
        Ok(receipt) => receipt,
        Err(e) => {
            e.report();
            return Err(CommandError::Rejected(failure_message(&e)));
        }
    };

    let mut out = io::stdout().lock();
    writeln!(out, "Order placed successfully!")?;
    if let Some(receipt) = receipt {
        let reference = receipt.order_number.as_deref().unwrap_or(receipt.id.as_str());
        writeln!(out, "Order reference: {reference}")?;
    }
    writeln!(out, "We will confirm delivery charges on {}", details.phone.trim())?;
    Ok(())
}

fn failure_message(err: &AppError) -> String {
    match err {
        AppError::Api(ApiError::Rejected(_)) => {
            format!("Failed to place order: {}", err.user_message())
        }
        _ => err.user_message(),
    }
}
