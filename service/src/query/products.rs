//! [`Query`] collection related to multiple [`Product`]s.
//!
//! [`Product`]: crate::domain::Product
//! [`Query`]: crate::Query

use common::operations::By;

use crate::domain::Product;

use super::DatabaseQuery;

/// Queries a list of all [`Product`]s still present in the catalog.
pub type List = DatabaseQuery<By<Vec<Product>, ()>>;
