//! Checkout: customer details, order assembly and the buy-now payload.
//!
//! Two sources can be checked out. The cart is cleared once its order is
//! accepted. A buy-now ("express") item lives in session storage and is
//! consumed on success without touching the cart.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sia_core::{ContactError, ItemSnapshot, LineItem, Phone, Price, Product, VariantSelection};
use thiserror::Error;

use crate::api::{OrderCustomer, OrderItem, OrderRequest};

const DEFAULT_EMAIL: &str = "noemail@siacreations.com";
const NOT_PROVIDED: &str = "Not Provided";
const DEFAULT_PINCODE: &str = "000000";
const DELIVERY_CHARGE_PENDING: &str = "To be confirmed";

/// Errors raised before an order is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Your cart is empty!")]
    EmptyCart,

    #[error("No item selected for Buy Now")]
    NoExpressItem,

    #[error("Please enter your {0}")]
    MissingField(&'static str),

    #[error("Invalid phone number: {0}")]
    InvalidPhone(#[from] ContactError),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Pincode must be 6 digits")]
    InvalidPincode,
}

/// What is being checked out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutSource {
    /// Every line in the cart.
    Cart,
    /// The pending buy-now item.
    Express,
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaymentMode {
    /// Cash on delivery.
    #[default]
    Cod,
    Online,
}

impl PaymentMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cod => "COD",
            Self::Online => "Online",
        }
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cod" => Ok(Self::Cod),
            "online" => Ok(Self::Online),
            other => Err(format!("unknown payment mode '{other}' (expected cod or online)")),
        }
    }
}

/// Details entered on the checkout form.
///
/// Name, phone and address are required. The rest fall back to placeholder
/// values when left blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerDetails {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub email: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
}

impl CustomerDetails {
    /// Check required fields and the format of optional ones.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        if self.name.trim().is_empty() {
            return Err(CheckoutError::MissingField("name"));
        }
        if self.phone.trim().is_empty() {
            return Err(CheckoutError::MissingField("phone number"));
        }
        Phone::parse(&self.phone)?;
        if self.address.trim().is_empty() {
            return Err(CheckoutError::MissingField("address"));
        }

        if let Some(email) = non_blank(self.email.as_deref()) {
            let valid = email
                .split_once('@')
                .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
            if !valid {
                return Err(CheckoutError::InvalidEmail(email.to_string()));
            }
        }

        if let Some(pincode) = non_blank(self.pincode.as_deref())
            && (pincode.len() != 6 || !pincode.bytes().all(|b| b.is_ascii_digit()))
        {
            return Err(CheckoutError::InvalidPincode);
        }

        Ok(())
    }

    /// The customer block sent with an order, with placeholders applied.
    #[must_use]
    pub fn to_order_customer(&self) -> OrderCustomer {
        let or = |value: Option<&str>, default: &str| {
            non_blank(value).unwrap_or(default).to_string()
        };

        OrderCustomer {
            name: self.name.trim().to_string(),
            email: or(self.email.as_deref(), DEFAULT_EMAIL),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            city: or(self.city.as_deref(), NOT_PROVIDED),
            state: or(self.state.as_deref(), NOT_PROVIDED),
            pincode: or(self.pincode.as_deref(), DEFAULT_PINCODE),
        }
    }
}

impl OrderRequest {
    /// Build an order for `lines`.
    ///
    /// Subtotal and total are the sum of line totals; delivery is quoted
    /// later and gift packaging is free.
    ///
    /// # Errors
    ///
    /// Returns `EmptyCart` for no lines, or a validation error for the
    /// customer details.
    pub fn from_lines(
        lines: &[LineItem],
        customer: &CustomerDetails,
        payment: PaymentMode,
    ) -> Result<Self, CheckoutError> {
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        customer.validate()?;

        let subtotal: Price = lines.iter().map(LineItem::line_total).sum();
        let items = lines
            .iter()
            .map(|line| OrderItem {
                product_id: line.selection.product_id.clone(),
                product_name: line.snapshot.name.clone(),
                quantity: line.quantity,
                price: line.snapshot.price.amount(),
                color: line.selection.color.clone(),
                size: line.selection.size.clone(),
            })
            .collect();

        Ok(Self {
            customer: customer.to_order_customer(),
            items,
            subtotal: subtotal.amount(),
            gift_packaging_charge: Price::ZERO.amount(),
            delivery_charge: DELIVERY_CHARGE_PENDING.to_string(),
            total_amount: subtotal.amount(),
            payment_mode: payment.as_str().to_string(),
            notes: String::new(),
        })
    }
}

/// A buy-now item waiting in session storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressCheckout {
    pub item: LineItem,
    pub created_at: DateTime<Utc>,
}

impl ExpressCheckout {
    /// Single-quantity checkout of `product` with the chosen variants.
    #[must_use]
    pub fn new(product: &Product, color: Option<String>, size: Option<String>) -> Self {
        Self {
            item: LineItem::new(
                VariantSelection::new(product.id.clone(), color, size),
                ItemSnapshot::from(product),
                1,
            ),
            created_at: Utc::now(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
