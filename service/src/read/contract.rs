//! Read-side [`Contract`] definitions.

use crate::domain::{Contract, Product, User};

/// [`Contract`] with its related [`Product`] and [`User`] resolved.
///
/// Assembled at read time only. The stored [`Contract`] itself keeps nothing
/// but the IDs, so edits to a [`Product`] or a [`User`] are visible in every
/// [`Resolved`] view built afterwards.
#[derive(Clone, Debug)]
pub struct Resolved {
    /// The [`Contract`] itself.
    pub contract: Contract,

    /// [`Product`] rented under the [`Contract`].
    pub product: Product,

    /// [`User`] renting under the [`Contract`].
    pub user: User,
}
