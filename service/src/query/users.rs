//! [`Query`] collection related to multiple [`User`]s.
//!
//! [`User`]: crate::domain::User
//! [`Query`]: crate::Query

use common::operations::By;

use crate::domain::User;

use super::DatabaseQuery;

/// Queries a list of all [`User`]s.
pub type List = DatabaseQuery<By<Vec<User>, ()>>;
