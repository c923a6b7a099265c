//! [`Query`] collection related to multiple [`Contract`]s.

use std::collections::HashMap;

use common::{
    operations::{By, Select},
    Period,
};
use derive_more::{Display, Error, From};
use futures::future;
use itertools::Itertools as _;
use tracerr::Traced;

use crate::{
    domain::{product, user, Contract, Product, User},
    infra::{database, Database},
    read, Service,
};

use super::{DatabaseQuery, Query};

/// Queries a list of all [`Contract`]s.
pub type List = DatabaseQuery<By<Vec<Contract>, ()>>;

/// Queries [`Contract`]s whose rental window intersects the given [`Period`],
/// with their [`Product`]s and [`User`]s resolved.
///
/// This is the availability probe: a [`Product`] is free in the [`Period`] if
/// no returned [`Contract`] references it (less the free quantity math, which
/// is left to the caller).
#[derive(Clone, Copy, Debug)]
pub struct Overlapping {
    /// Inclusive window of [`Date`]s to probe.
    ///
    /// [`Date`]: common::Date
    pub period: Period,
}

impl<Db> Query<Overlapping> for Service<Db>
where
    Db: Database<
            Select<By<Vec<Contract>, Period>>,
            Ok = Vec<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<product::Id, Product>, Vec<product::Id>>>,
            Ok = HashMap<product::Id, Product>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<user::Id, User>, Vec<user::Id>>>,
            Ok = HashMap<user::Id, User>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Vec<read::contract::Resolved>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        Overlapping { period }: Overlapping,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let contracts: Vec<Contract> = self
            .database()
            .execute(Select(By::new(period)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let product_ids = contracts
            .iter()
            .map(|c| c.product_id)
            .unique()
            .collect::<Vec<_>>();
        let user_ids = contracts
            .iter()
            .map(|c| c.user_id)
            .unique()
            .collect::<Vec<_>>();

        let (products, users) = future::try_join(
            self.database()
                .execute(Select(By::<HashMap<_, Product>, _>::new(product_ids))),
            self.database()
                .execute(Select(By::<HashMap<_, User>, _>::new(user_ids))),
        )
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))?;

        contracts
            .into_iter()
            .map(|contract| {
                let product = products
                    .get(&contract.product_id)
                    .ok_or(E::ProductNotExists(contract.product_id))
                    .map_err(tracerr::wrap!())?
                    .clone();
                let user = users
                    .get(&contract.user_id)
                    .ok_or(E::UserNotExists(contract.user_id))
                    .map_err(tracerr::wrap!())?
                    .clone();
                Ok(read::contract::Resolved {
                    contract,
                    product,
                    user,
                })
            })
            .collect()
    }
}

/// Error of [`Overlapping`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Product`] referenced by a [`Contract`] does not exist.
    #[display("`Product(id: {_0})` does not exist")]
    ProductNotExists(#[error(not(source))] product::Id),

    /// [`User`] referenced by a [`Contract`] does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),
}
