//! Rental agreement document generation.

use std::{
    fmt::{self, Write as _},
    io,
    path::{Path, PathBuf},
};

use derive_more::{Display, Error as StdError, From};
use tracerr::Traced;

use crate::{
    domain::{contract, Contract, Product, User},
    read,
};

/// [`Generator`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory the generated documents are written into.
    pub dir: PathBuf,
}

/// Generator of rental [`Agreement`] documents.
#[derive(Clone, Debug)]
pub struct Generator {
    /// Configuration of this [`Generator`].
    config: Config,
}

impl Generator {
    /// Creates a new [`Generator`] with the provided [`Config`].
    pub(crate) fn new(config: Config) -> Self {
        Self { config }
    }

    /// Renders the given [`Agreement`] and writes the document to disk.
    ///
    /// Documents are keyed by the [`Contract`]'s ID, so regenerating an
    /// [`Agreement`] for the same [`Contract`] overwrites the previous
    /// document instead of piling up copies.
    ///
    /// # Errors
    ///
    /// Errors if the [`Agreement`] fails to render or the document cannot be
    /// written.
    pub async fn generate(
        &self,
        agreement: &Agreement,
    ) -> Result<Locator, Traced<Error>> {
        let text = agreement
            .render()
            .map_err(tracerr::from_and_wrap!(=> Error))?;

        tokio::fs::create_dir_all(&self.config.dir)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;

        let path = self
            .config
            .dir
            .join(format!("rental_agreement_{}.txt", agreement.contract_id()));
        tokio::fs::write(&path, &text)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;

        tracing::info!(path = %path.display(), "rental agreement generated");

        Ok(Locator(path))
    }
}

/// Possible errors of [`Generator::generate()`].
#[derive(Debug, Display, StdError, From)]
pub enum Error {
    /// Failed to render an [`Agreement`] as text.
    #[display("failed to render agreement: {_0}")]
    Render(fmt::Error),

    /// Failed to write the rendered document to disk.
    #[display("failed to write document: {_0}")]
    Io(io::Error),
}

/// Location of a generated document on disk.
#[derive(Clone, Debug)]
pub struct Locator(PathBuf);

impl Locator {
    /// Returns the filesystem path of the document.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.display().fmt(f)
    }
}

/// Data of a rental agreement document.
///
/// An [`Agreement`] documents the whole rental including its outcome, so it
/// can only be assembled once the return of the [`Product`] is recorded.
#[derive(Clone, Debug)]
pub struct Agreement {
    /// [`Contract`] the agreement is drawn for.
    contract: Contract,

    /// [`Product`] rented under the [`Contract`].
    product: Product,

    /// [`User`] renting under the [`Contract`].
    user: User,

    /// [`Condition`] of the [`Product`] recorded at return.
    ///
    /// [`Condition`]: contract::Condition
    state_after: contract::Condition,

    /// [`Date`] when the [`Product`] was returned.
    ///
    /// [`Date`]: common::Date
    retrieval_date: contract::RetrievalDate,
}

impl Agreement {
    /// Assembles an [`Agreement`] from the given [`Resolved`] view.
    ///
    /// Returns [`None`] if the [`Contract`] has no recorded return yet.
    ///
    /// [`Resolved`]: read::contract::Resolved
    #[must_use]
    pub fn new(view: &read::contract::Resolved) -> Option<Self> {
        let state_after = view.contract.state_after.clone()?;
        let retrieval_date = view.contract.retrieval_date?;

        Some(Self {
            contract: view.contract.clone(),
            product: view.product.clone(),
            user: view.user.clone(),
            state_after,
            retrieval_date,
        })
    }

    /// Returns ID of the [`Contract`] this [`Agreement`] is drawn for.
    #[must_use]
    pub fn contract_id(&self) -> contract::Id {
        self.contract.id
    }

    /// Renders this [`Agreement`] as a textual document.
    ///
    /// Rendering is deterministic: the same data always produces the same
    /// text.
    ///
    /// # Errors
    ///
    /// Errors if formatting of some field fails.
    pub fn render(&self) -> Result<String, fmt::Error> {
        let mut out = String::new();

        writeln!(out, "RENTAL AGREEMENT")?;
        writeln!(out)?;
        writeln!(out, "Object: {}", self.product.object)?;
        writeln!(out, "Brand: {}", self.product.brand)?;
        writeln!(out, "Model: {}", self.product.model)?;
        writeln!(out, "Quantity: {}", self.contract.quantity)?;
        writeln!(out, "Description: {}", self.product.description)?;
        writeln!(out, "Precautions: {}", self.product.precautions)?;
        writeln!(out, "Price for 1-day rent: {}", self.product.price_per_day)?;
        writeln!(
            out,
            "Price for 1-week rent: {}",
            self.product.price_per_week,
        )?;
        writeln!(out, "Deposit: {}", self.product.deposit)?;
        writeln!(out)?;
        writeln!(out, "Renter information:")?;
        writeln!(out, "Name: {}", self.user.full_name())?;
        writeln!(
            out,
            "Address: {}, {}",
            self.user.postal_address, self.user.city,
        )?;
        writeln!(
            out,
            "Birth date: {}",
            self.user.birth_date.to_calendar_string(),
        )?;
        writeln!(out, "Phone: {}", self.user.phone)?;
        writeln!(out, "Email: {}", self.user.email)?;
        writeln!(out)?;
        writeln!(out, "Rental details:")?;
        writeln!(out, "Rental days: {}", self.contract.rental_days)?;
        writeln!(
            out,
            "Rental window: {} to {}",
            self.contract.start_date.to_calendar_string(),
            self.contract.end_date.to_calendar_string(),
        )?;
        writeln!(out, "Total amount: {}", self.contract.total_amount)?;
        writeln!(out, "State before: {}", self.contract.state_before)?;
        writeln!(out, "State after: {}", self.state_after)?;
        writeln!(
            out,
            "Usage date: {}",
            self.contract.usage_date.to_calendar_string(),
        )?;
        writeln!(
            out,
            "Retrieval date: {}",
            self.retrieval_date.to_calendar_string(),
        )?;

        Ok(out)
    }
}
