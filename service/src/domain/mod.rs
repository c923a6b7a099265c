//! Domain definitions.

pub mod contract;
pub mod product;
pub mod user;

pub use self::{contract::Contract, product::Product, user::User};
