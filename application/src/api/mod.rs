//! REST API definitions.

use std::{fmt, future::Future, str::FromStr, time::Duration};

use axum::{
    routing::{get, post, put},
    Router,
};
use common::DateOf;

use crate::{define_error, Error};

pub mod contract;
pub mod product;
pub mod user;

/// Builds the [`Router`] serving the REST API.
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route("/api/contracts", post(contract::create).get(contract::list))
        .route("/api/contracts/date-range", get(contract::overlapping))
        .route(
            "/api/contracts/:id",
            get(contract::get).put(contract::update),
        )
        .route("/api/contracts/:id/agreement", post(contract::agreement))
        .route("/api/products", post(product::create).get(product::list))
        .route(
            "/api/products/:id",
            put(product::update).delete(product::delete),
        )
        .route("/api/users", post(user::create).get(user::list))
}

/// Timeout of a single API operation.
#[derive(Clone, Copy, Debug)]
pub struct OperationTimeout(pub Duration);

define_error! {
    enum TimeoutError {
        #[code = "TIMEOUT"]
        #[status = GATEWAY_TIMEOUT]
        #[message = "Operation timed out"]
        Elapsed,
    }
}

/// Drives the provided [`Future`] to completion within the given
/// [`OperationTimeout`].
///
/// # Errors
///
/// Errors with a `TIMEOUT` [`Error`] if the [`OperationTimeout`] fires first.
pub(crate) async fn within<T, F>(
    OperationTimeout(limit): OperationTimeout,
    fut: F,
) -> Result<T, Error>
where
    F: Future<Output = Result<T, Error>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_elapsed| Error::from(TimeoutError::Elapsed))?
}

/// Builds a `VALIDATION_ERROR` [`Error`] for the malformed `field`.
pub(crate) fn invalid(field: &str, why: impl fmt::Display) -> Error {
    Error::new(
        "VALIDATION_ERROR",
        http::StatusCode::BAD_REQUEST,
        &format!("invalid `{field}`: {why}"),
    )
}

/// Parses the given `value` of the named `field`.
///
/// # Errors
///
/// Errors with a `VALIDATION_ERROR` [`Error`] if the `value` doesn't parse.
pub(crate) fn parse<T: FromStr>(field: &str, value: &str) -> Result<T, Error>
where
    T::Err: fmt::Display,
{
    value.parse().map_err(|e| invalid(field, e))
}

/// Parses the given `value` of the named `field` as a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Errors with a `VALIDATION_ERROR` [`Error`] if the `value` is not a valid
/// calendar date.
pub(crate) fn date<Of: ?Sized>(
    field: &str,
    value: &str,
) -> Result<DateOf<Of>, Error> {
    DateOf::from_calendar_str(value).map_err(|e| invalid(field, e))
}
