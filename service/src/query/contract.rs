//! [`Query`] collection related to a single [`Contract`].
//!
//! [`Contract`]: crate::domain::Contract
//! [`Query`]: crate::Query

use common::operations::By;

use crate::domain::{contract, Contract};

use super::DatabaseQuery;

/// Queries a [`Contract`] by its ID.
pub type ById = DatabaseQuery<By<Option<Contract>, contract::Id>>;
