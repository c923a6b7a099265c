//! [`Command`] for creating a new [`Contract`].

use common::{
    operations::{By, Insert, Select},
    DateTime, Period,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contract, product, user, Contract, Product, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Contract`].
///
/// A new [`Contract`] starts without any recorded return, so its
/// [`Phase`] is derived from the rental window alone.
///
/// [`Phase`]: contract::Phase
#[derive(Clone, Debug)]
pub struct CreateContract {
    /// ID of the [`Product`] to rent.
    pub product_id: product::Id,

    /// ID of the renting [`User`].
    pub user_id: user::Id,

    /// Number of [`Product`] units to rent.
    pub quantity: contract::Quantity,

    /// Declared length of the rental in days.
    pub rental_days: contract::RentalDays,

    /// [`Condition`] of the [`Product`] recorded at handover.
    ///
    /// [`Condition`]: contract::Condition
    pub state_before: contract::Condition,

    /// [`Date`] when the [`Product`] is handed over.
    ///
    /// [`Date`]: common::Date
    pub usage_date: contract::UsageDate,

    /// Rental window of a new [`Contract`].
    pub period: Period,
}

impl<Db> Command<CreateContract> for Service<Db>
where
    Db: Database<
            Select<By<Option<Product>, product::Id>>,
            Ok = Option<Product>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Insert<Contract>, Err = Traced<database::Error>>,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateContract) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateContract {
            product_id,
            user_id,
            quantity,
            rental_days,
            state_before,
            usage_date,
            period,
        } = cmd;

        if quantity < 1 {
            return Err(tracerr::new!(E::InvalidQuantity(quantity)));
        }
        if rental_days < 1 {
            return Err(tracerr::new!(E::InvalidDuration(rental_days)));
        }

        let product = self
            .database()
            .execute(Select(By::<Option<Product>, _>::new(product_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProductNotExists(product_id))
            .map_err(tracerr::wrap!())?;

        let user = self
            .database()
            .execute(Select(By::<Option<User>, _>::new(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(user_id))
            .map_err(tracerr::wrap!())?;

        let contract = Contract {
            id: contract::Id::new(),
            product_id: product.id,
            user_id: user.id,
            quantity,
            rental_days,
            // The charged amount is always derived from the current prices,
            // never accepted from the outside.
            total_amount: Contract::calculate_total(
                &product,
                quantity,
                rental_days,
            ),
            state_before,
            state_after: None,
            usage_date,
            retrieval_date: None,
            start_date: period.start().coerce(),
            end_date: period.end().coerce(),
            created_at: DateTime::now().coerce(),
        };

        self.database()
            .execute(Insert(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(contract)
    }
}

/// Error of [`CreateContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Product`] with the provided ID does not exist.
    #[display("`Product(id: {_0})` does not exist")]
    ProductNotExists(#[error(not(source))] product::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// Provided quantity is not a positive number.
    #[display("`{_0}` is not a valid quantity")]
    InvalidQuantity(#[error(not(source))] contract::Quantity),

    /// Provided rental duration is not a positive number of days.
    #[display("`{_0}` is not a valid rental duration")]
    InvalidDuration(#[error(not(source))] contract::RentalDays),
}
