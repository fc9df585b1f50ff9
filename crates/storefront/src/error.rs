//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for everything a host can surface to
//! the shopper. Hosts call [`AppError::report`] once, at the point where the
//! error stops propagating.

use thiserror::Error;

use crate::api::{ApiError, StockUpdateError};
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::persistence::StorageError;
use crate::selection::SelectionError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Local storage could not be opened or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Storefront API operation failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Variant selection was incomplete or invalid.
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Checkout details were rejected before submission.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Stock update doesn't match the product.
    #[error(transparent)]
    StockUpdate(#[from] StockUpdateError),

    /// Product not in the catalog.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Whether this error points at a fault outside the shopper's control.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        match self {
            Self::Config(_) | Self::Storage(_) => true,
            Self::Api(err) => !matches!(err, ApiError::Rejected(_)),
            _ => false,
        }
    }

    /// Log the error and capture server-side faults to Sentry.
    pub fn report(&self) {
        if self.is_server_error() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::warn!(error = %self, "Storefront action rejected");
        }
    }

    /// Message suitable for the shopper.
    ///
    /// Internal details of transport and storage failures are not exposed;
    /// a rejection message from the API is passed through as-is.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(ApiError::Rejected(message)) => message.clone(),
            Self::Api(_) => {
                "Failed to connect to server. Please try again or contact us directly.".to_string()
            }
            Self::Storage(_) => "Could not save your changes. Please try again.".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "665f1c")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = AppError::from(SelectionError::MissingColor);
        assert_eq!(err.to_string(), "Please select a color");
    }

    #[test]
    fn test_rejection_message_is_passed_through() {
        let err = AppError::from(ApiError::Rejected("Product is out of stock".to_string()));
        assert_eq!(err.user_message(), "Product is out of stock");
        assert!(!err.is_server_error());
    }

    #[test]
    fn test_transport_details_are_hidden() {
        let err = AppError::from(ApiError::Api {
            status: 500,
            message: "MongoServerError: connection reset".to_string(),
        });
        assert!(err.is_server_error());
        assert!(!err.user_message().contains("Mongo"));
    }

    #[test]
    fn test_checkout_errors_are_user_facing() {
        let err = AppError::from(CheckoutError::EmptyCart);
        assert_eq!(err.user_message(), "Your cart is empty!");
        assert!(!err.is_server_error());
    }
}
