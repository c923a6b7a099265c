//! [`Command`] for updating a [`Product`] in the catalog.

use common::{
    operations::{By, Select, Update},
    Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{product, Product},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating a [`Product`] in the catalog.
///
/// Price changes don't touch existing [`Contract`]s: their total amount was
/// fixed when they were created or last edited.
///
/// [`Contract`]: crate::domain::Contract
#[derive(Clone, Debug)]
pub struct UpdateProduct {
    /// ID of the [`Product`] to update.
    pub id: product::Id,

    /// New [`Object`] of the [`Product`].
    ///
    /// [`Object`]: product::Object
    pub object: product::Object,

    /// New [`Brand`] of the [`Product`].
    ///
    /// [`Brand`]: product::Brand
    pub brand: product::Brand,

    /// New [`Model`] of the [`Product`].
    ///
    /// [`Model`]: product::Model
    pub model: product::Model,

    /// New number of units of the [`Product`].
    pub quantity: product::Quantity,

    /// New [`Description`] of the [`Product`].
    ///
    /// [`Description`]: product::Description
    pub description: product::Description,

    /// New [`Precautions`] of the [`Product`].
    ///
    /// [`Precautions`]: product::Precautions
    pub precautions: product::Precautions,

    /// New [`Money`] charged for renting one unit for a single day.
    pub price_per_day: Money,

    /// New [`Money`] charged for renting one unit for a full week.
    pub price_per_week: Money,

    /// New [`Money`] deposited as a caution for one unit.
    pub deposit: Money,
}

impl<Db> Command<UpdateProduct> for Service<Db>
where
    Db: Database<
            Select<By<Option<Product>, product::Id>>,
            Ok = Option<Product>,
            Err = Traced<database::Error>,
        > + Database<Update<Product>, Err = Traced<database::Error>>,
{
    type Ok = Product;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateProduct) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateProduct {
            id,
            object,
            brand,
            model,
            quantity,
            description,
            precautions,
            price_per_day,
            price_per_week,
            deposit,
        } = cmd;

        if quantity < 1 {
            return Err(tracerr::new!(E::InvalidQuantity(quantity)));
        }

        if price_per_day.currency != price_per_week.currency
            || price_per_day.currency != deposit.currency
        {
            return Err(tracerr::new!(E::CurrencyMismatch));
        }

        let existing = self
            .database()
            .execute(Select(By::<Option<Product>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProductNotExists(id))
            .map_err(tracerr::wrap!())?;

        let product = Product {
            id: existing.id,
            object,
            brand,
            model,
            quantity,
            description,
            precautions,
            price_per_day,
            price_per_week,
            deposit,
            created_at: existing.created_at,
            deleted_at: existing.deleted_at,
        };

        self.database()
            .execute(Update(product.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(product)
    }
}

/// Error of [`UpdateProduct`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Product`] with the provided ID does not exist.
    #[display("`Product(id: {_0})` does not exist")]
    ProductNotExists(#[error(not(source))] product::Id),

    /// Provided quantity is not a positive number.
    #[display("`{_0}` is not a valid quantity")]
    InvalidQuantity(#[error(not(source))] product::Quantity),

    /// Provided prices are denominated in different currencies.
    #[display("prices are denominated in different currencies")]
    CurrencyMismatch,
}
