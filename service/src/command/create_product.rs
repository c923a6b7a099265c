//! [`Command`] for adding a new [`Product`] to the catalog.

use common::{operations::Insert, DateTime, Money};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{product, Product},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for adding a new [`Product`] to the catalog.
#[derive(Clone, Debug)]
pub struct CreateProduct {
    /// [`Object`] a new [`Product`] represents.
    ///
    /// [`Object`]: product::Object
    pub object: product::Object,

    /// [`Brand`] of a new [`Product`].
    ///
    /// [`Brand`]: product::Brand
    pub brand: product::Brand,

    /// [`Model`] of a new [`Product`].
    ///
    /// [`Model`]: product::Model
    pub model: product::Model,

    /// Number of units of a new [`Product`].
    pub quantity: product::Quantity,

    /// [`Description`] of a new [`Product`].
    ///
    /// [`Description`]: product::Description
    pub description: product::Description,

    /// [`Precautions`] to be taken when handling a new [`Product`].
    ///
    /// [`Precautions`]: product::Precautions
    pub precautions: product::Precautions,

    /// [`Money`] charged for renting one unit for a single day.
    pub price_per_day: Money,

    /// [`Money`] charged for renting one unit for a full week.
    pub price_per_week: Money,

    /// [`Money`] deposited as a caution for one unit.
    pub deposit: Money,
}

impl<Db> Command<CreateProduct> for Service<Db>
where
    Db: Database<Insert<Product>, Err = Traced<database::Error>>,
{
    type Ok = Product;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateProduct) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateProduct {
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

        // Mixed currencies would make the total amount of a `Contract`
        // meaningless.
        if price_per_day.currency != price_per_week.currency
            || price_per_day.currency != deposit.currency
        {
            return Err(tracerr::new!(E::CurrencyMismatch));
        }

        let product = Product {
            id: product::Id::new(),
            object,
            brand,
            model,
            quantity,
            description,
            precautions,
            price_per_day,
            price_per_week,
            deposit,
            created_at: DateTime::now().coerce(),
            deleted_at: None,
        };

        self.database()
            .execute(Insert(product.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(product)
    }
}

/// Error of [`CreateProduct`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Provided quantity is not a positive number.
    #[display("`{_0}` is not a valid quantity")]
    InvalidQuantity(#[error(not(source))] product::Quantity),

    /// Provided prices are denominated in different currencies.
    #[display("prices are denominated in different currencies")]
    CurrencyMismatch,
}
