//! [`Command`] for generating a rental agreement document.

use std::collections::HashMap;

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    document,
    domain::{contract, product, user, Contract, Product, User},
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for generating the rental agreement document of a
/// [`Contract`].
///
/// The agreement documents the whole rental including its outcome, so it can
/// only be generated once the return of the [`Product`] is recorded. The
/// document is keyed by the [`Contract`]'s ID and regenerating it overwrites
/// the previous one.
#[derive(Clone, Copy, Debug)]
pub struct GenerateAgreement {
    /// ID of the [`Contract`] to draw the agreement for.
    pub contract_id: contract::Id,
}

impl<Db> Command<GenerateAgreement> for Service<Db>
where
    Db: Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<product::Id, Product>, [product::Id; 1]>>,
            Ok = HashMap<product::Id, Product>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = document::Locator;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: GenerateAgreement,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let GenerateAgreement { contract_id } = cmd;

        let contract = self
            .database()
            .execute(Select(By::<Option<Contract>, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())?;

        // Resolved through the batched selector, so the agreement of a
        // `Contract` referring to a removed `Product` still generates.
        let product = self
            .database()
            .execute(Select(By::<HashMap<_, Product>, _>::new([
                contract.product_id,
            ])))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .remove(&contract.product_id)
            .ok_or(E::ProductNotExists(contract.product_id))
            .map_err(tracerr::wrap!())?;

        let user = self
            .database()
            .execute(Select(By::<Option<User>, _>::new(contract.user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(contract.user_id))
            .map_err(tracerr::wrap!())?;

        let view = read::contract::Resolved {
            contract,
            product,
            user,
        };
        let agreement = document::Agreement::new(&view)
            .ok_or(E::NotRetrieved(contract_id))
            .map_err(tracerr::wrap!())?;

        self.documents()
            .generate(&agreement)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`GenerateAgreement`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Contract`] with the provided ID does not exist.
    #[display("`Contract(id: {_0})` does not exist")]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// [`Product`] referenced by the [`Contract`] does not exist.
    #[display("`Product(id: {_0})` does not exist")]
    ProductNotExists(#[error(not(source))] product::Id),

    /// [`User`] referenced by the [`Contract`] does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`Contract`] has no recorded return yet.
    #[display("`Contract(id: {_0})` has no recorded return yet")]
    NotRetrieved(#[error(not(source))] contract::Id),

    /// Failed to produce the document itself.
    #[display("failed to produce the document: {_0}")]
    #[from]
    Document(document::Error),
}
