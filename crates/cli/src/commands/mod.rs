//! Command implementations.
//!
//! Commands share a [`Session`]: the API client plus a storefront whose
//! durable and session storage live under the configured data directory.
//! Output goes to stdout; diagnostics go through `tracing` to stderr.

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod wishlist;

use std::io::{self, Write};

use sia_storefront::selection::ModalView;
use sia_storefront::{
    ActionOutcome, ApiClient, AppError, FileStorage, RenderedSurfaces, Storefront,
    StorefrontConfig,
};
use thiserror::Error;

pub use checkout::CheckoutArgs;

/// The storefront as the CLI runs it.
pub type Shop = Storefront<FileStorage, RenderedSurfaces>;

/// Errors that end a command with a non-zero exit.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    App(#[from] AppError),

    /// The action was refused; the message is meant for the shopper.
    #[error("{0}")]
    Rejected(String),

    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl From<sia_storefront::api::ApiError> for CommandError {
    fn from(err: sia_storefront::api::ApiError) -> Self {
        Self::App(err.into())
    }
}

impl From<sia_storefront::persistence::StorageError> for CommandError {
    fn from(err: sia_storefront::persistence::StorageError) -> Self {
        Self::App(err.into())
    }
}

/// Variant choices given up front, standing in for the selection modal.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct VariantArgs {
    /// Color to choose
    #[arg(long)]
    pub color: Option<String>,

    /// Size to choose
    #[arg(long)]
    pub size: Option<String>,
}

/// Everything a command needs for one invocation.
pub struct Session {
    pub api: ApiClient,
    pub shop: Shop,
    show_surfaces: bool,
}

impl Session {
    /// Rehydrate the storefront from the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client can't be built or the storage
    /// directories can't be created.
    pub fn open(config: &StorefrontConfig, show_surfaces: bool) -> Result<Self, CommandError> {
        let api = ApiClient::new(&config.api)?;
        let storage = FileStorage::open(config.durable_dir())?;
        let session = FileStorage::open(config.session_dir())?;

        Ok(Self {
            api,
            shop: Storefront::new(storage, session, RenderedSurfaces::new()),
            show_surfaces,
        })
    }

    /// Load the catalog, failing the command if it can't be fetched.
    ///
    /// # Errors
    ///
    /// Returns an error if the products request fails.
    pub async fn load_catalog(&mut self) -> Result<(), CommandError> {
        self.shop.load_catalog(&self.api).await?;
        Ok(())
    }

    /// Load the catalog for commands that can fall back to saved snapshots.
    pub async fn try_load_catalog(&mut self) {
        if let Err(e) = self.shop.load_catalog(&self.api).await {
            tracing::warn!(error = %e, "Catalog unavailable, using saved item details");
        }
    }

    /// Feed `--color`/`--size` into the modal an action opened, then confirm.
    ///
    /// Outcomes that didn't open the modal pass through unchanged.
    pub fn resolve_selection(
        &mut self,
        outcome: ActionOutcome,
        variant: &VariantArgs,
    ) -> ActionOutcome {
        if !matches!(outcome, ActionOutcome::SelectionRequired(_)) {
            return outcome;
        }

        if let Some(color) = &variant.color
            && let rejected @ ActionOutcome::Invalid(_) = self.shop.choose_color(color)
        {
            return rejected;
        }
        if let Some(size) = &variant.size
            && let rejected @ ActionOutcome::Invalid(_) = self.shop.choose_size(size)
        {
            return rejected;
        }

        self.shop.confirm_selection()
    }

    /// Print feedback for `outcome`.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` for outcomes the shopper must act on, or an
    /// output error.
    pub fn report(&self, outcome: &ActionOutcome) -> Result<(), CommandError> {
        match outcome {
            ActionOutcome::Invalid(_) | ActionOutcome::CatalogUnavailable => {
                if let Some(view) = self.shop.modal().view() {
                    write_options(&view)?;
                }
                Err(CommandError::Rejected(outcome.message().unwrap_or_default()))
            }
            ActionOutcome::SelectionRequired(view) => {
                write_options(view)?;
                Err(CommandError::Rejected(format!(
                    "{} needs a choice: pass --color and/or --size",
                    view.product_name
                )))
            }
            ActionOutcome::Ignored => {
                writeln!(io::stdout().lock(), "Nothing to do")?;
                Ok(())
            }
            other => {
                if let Some(message) = other.message() {
                    writeln!(io::stdout().lock(), "{message}")?;
                }
                Ok(())
            }
        }
    }

    /// Print the rendered surfaces if `--surfaces` was given.
    ///
    /// # Errors
    ///
    /// Returns an error if stdout can't be written.
    pub fn finish(&self) -> Result<(), CommandError> {
        if !self.show_surfaces {
            return Ok(());
        }

        let mut out = io::stdout().lock();
        for (surface, content) in self.shop.display().sink().iter() {
            writeln!(out, "\n<!-- #{} -->\n{content}", surface.element_id())?;
        }
        Ok(())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn write_options(view: &ModalView) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "Options for {}:", view.product_name)?;

    let list = |options: &[sia_storefront::selection::OptionView]| {
        options
            .iter()
            .map(|o| {
                if o.selected {
                    format!("[{}]", o.value)
                } else {
                    o.value.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    };

    if !view.colors.is_empty() {
        writeln!(out, "  colors: {}", list(&view.colors))?;
    }
    if !view.sizes.is_empty() {
        writeln!(out, "  sizes:  {}", list(&view.sizes))?;
    }
    Ok(())
}
