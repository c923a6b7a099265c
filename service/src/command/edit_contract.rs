//! [`Command`] for editing an existing [`Contract`].

use common::{
    operations::{By, Select, Update},
    Period,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contract, product, user, Contract, Product, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for editing an existing [`Contract`].
///
/// Every field of the [`Contract`] is replaced with the provided one, except
/// its creation time. Recording both the post-rental state and the return
/// date is what closes the [`Contract`].
///
/// The edit is last-write-wins: no optimistic locking is performed.
#[derive(Clone, Debug)]
pub struct EditContract {
    /// ID of the [`Contract`] to edit.
    pub id: contract::Id,

    /// ID of the rented [`Product`].
    pub product_id: product::Id,

    /// ID of the renting [`User`].
    pub user_id: user::Id,

    /// Number of [`Product`] units rented.
    pub quantity: contract::Quantity,

    /// Declared length of the rental in days.
    pub rental_days: contract::RentalDays,

    /// [`Condition`] of the [`Product`] recorded at handover.
    ///
    /// [`Condition`]: contract::Condition
    pub state_before: contract::Condition,

    /// [`Condition`] of the [`Product`] recorded at return, if it happened.
    ///
    /// [`Condition`]: contract::Condition
    pub state_after: Option<contract::Condition>,

    /// [`Date`] when the [`Product`] was handed over.
    ///
    /// [`Date`]: common::Date
    pub usage_date: contract::UsageDate,

    /// [`Date`] when the [`Product`] was returned, if it was.
    ///
    /// [`Date`]: common::Date
    pub retrieval_date: Option<contract::RetrievalDate>,

    /// Rental window of the [`Contract`].
    pub period: Period,
}

impl<Db> Command<EditContract> for Service<Db>
where
    Db: Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Product>, product::Id>>,
            Ok = Option<Product>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Update<Contract>, Err = Traced<database::Error>>,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: EditContract) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let EditContract {
            id,
            product_id,
            user_id,
            quantity,
            rental_days,
            state_before,
            state_after,
            usage_date,
            retrieval_date,
            period,
        } = cmd;

        if quantity < 1 {
            return Err(tracerr::new!(E::InvalidQuantity(quantity)));
        }
        if rental_days < 1 {
            return Err(tracerr::new!(E::InvalidDuration(rental_days)));
        }

        let existing = self
            .database()
            .execute(Select(By::<Option<Contract>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(id))
            .map_err(tracerr::wrap!())?;

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
            id: existing.id,
            product_id: product.id,
            user_id: user.id,
            quantity,
            rental_days,
            total_amount: Contract::calculate_total(
                &product,
                quantity,
                rental_days,
            ),
            state_before,
            state_after,
            usage_date,
            retrieval_date,
            start_date: period.start().coerce(),
            end_date: period.end().coerce(),
            created_at: existing.created_at,
        };

        self.database()
            .execute(Update(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(contract)
    }
}

/// Error of [`EditContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Contract`] with the provided ID does not exist.
    #[display("`Contract(id: {_0})` does not exist")]
    ContractNotExists(#[error(not(source))] contract::Id),

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
