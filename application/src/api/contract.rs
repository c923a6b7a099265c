//! `Contract`-related REST API definitions.

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Extension, Json,
};
use common::Period;
use serde::{Deserialize, Serialize};
use service::{
    command,
    domain::{self, contract, product, user},
    query, read, Command as _,
};

use crate::{api, define_error, AsError, Error, Service};

define_error! {
    enum ContractError {
        #[code = "NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "`Contract` with the provided ID does not exist"]
        NotExists,
    }
}

/// Wire form of a `Contract` creation request.
///
/// The charged total is never part of the request: it's always derived from
/// the current `Product` prices on the server.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    /// ID of the `Product` to rent.
    pub product_id: product::Id,

    /// ID of the renting `User`.
    pub user_id: user::Id,

    /// Number of `Product` units to rent.
    pub quantity: i32,

    /// Declared length of the rental in days.
    pub rental_days: i32,

    /// State of the `Product` recorded at handover.
    pub state_before: String,

    /// `YYYY-MM-DD` date when the `Product` is handed over.
    pub usage_date: String,

    /// First `YYYY-MM-DD` date of the rental window.
    pub start_date: String,

    /// Last `YYYY-MM-DD` date of the rental window.
    pub end_date: String,
}

impl TryFrom<CreateRequest> for command::CreateContract {
    type Error = Error;

    fn try_from(req: CreateRequest) -> Result<Self, Self::Error> {
        let CreateRequest {
            product_id,
            user_id,
            quantity,
            rental_days,
            state_before,
            usage_date,
            start_date,
            end_date,
        } = req;

        Ok(Self {
            product_id,
            user_id,
            quantity,
            rental_days,
            state_before: api::parse("stateBefore", &state_before)?,
            usage_date: api::date("usageDate", &usage_date)?,
            period: window(&start_date, &end_date)?,
        })
    }
}

/// Wire form of a `Contract` update request.
///
/// Recording both `stateAfter` and `retrievalDate` is what closes the
/// `Contract`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    /// ID of the rented `Product`.
    pub product_id: product::Id,

    /// ID of the renting `User`.
    pub user_id: user::Id,

    /// Number of `Product` units rented.
    pub quantity: i32,

    /// Declared length of the rental in days.
    pub rental_days: i32,

    /// State of the `Product` recorded at handover.
    pub state_before: String,

    /// State of the `Product` recorded at return, if it happened.
    pub state_after: Option<String>,

    /// `YYYY-MM-DD` date when the `Product` was handed over.
    pub usage_date: String,

    /// `YYYY-MM-DD` date when the `Product` was returned, if it was.
    pub retrieval_date: Option<String>,

    /// First `YYYY-MM-DD` date of the rental window.
    pub start_date: String,

    /// Last `YYYY-MM-DD` date of the rental window.
    pub end_date: String,
}

/// Wire form of a `Contract`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    /// ID of the `Contract`.
    pub id: contract::Id,

    /// ID of the rented `Product`.
    pub product_id: product::Id,

    /// ID of the renting `User`.
    pub user_id: user::Id,

    /// Number of `Product` units rented.
    pub quantity: i32,

    /// Declared length of the rental in days.
    pub rental_days: i32,

    /// Total charged amount, e.g. `900USD`.
    pub total_amount: String,

    /// State of the `Product` recorded at handover.
    pub state_before: String,

    /// State of the `Product` recorded at return, if it happened.
    pub state_after: Option<String>,

    /// `YYYY-MM-DD` date when the `Product` was handed over.
    pub usage_date: String,

    /// `YYYY-MM-DD` date when the `Product` was returned, if it was.
    pub retrieval_date: Option<String>,

    /// First `YYYY-MM-DD` date of the rental window.
    pub start_date: String,

    /// Last `YYYY-MM-DD` date of the rental window.
    pub end_date: String,

    /// Current lifecycle phase: `DRAFTED`, `IN_USE` or `CLOSED`.
    pub phase: String,

    /// [RFC 3339] timestamp of when the `Contract` was created.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub created_at: String,
}

impl From<domain::Contract> for Body {
    fn from(c: domain::Contract) -> Self {
        let phase = c.phase().to_string();
        Self {
            id: c.id,
            product_id: c.product_id,
            user_id: c.user_id,
            quantity: c.quantity,
            rental_days: c.rental_days,
            total_amount: c.total_amount.to_string(),
            state_before: c.state_before.to_string(),
            state_after: c.state_after.map(|s| s.to_string()),
            usage_date: c.usage_date.to_calendar_string(),
            retrieval_date: c.retrieval_date.map(|d| d.to_calendar_string()),
            start_date: c.start_date.to_calendar_string(),
            end_date: c.end_date.to_calendar_string(),
            phase,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

/// Wire form of a `Contract` with its `Product` and `User` resolved.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedBody {
    /// The `Contract` itself.
    pub contract: Body,

    /// `Product` rented under the `Contract`.
    pub product: api::product::Body,

    /// `User` renting under the `Contract`.
    pub user: api::user::Body,
}

impl From<read::contract::Resolved> for ResolvedBody {
    fn from(view: read::contract::Resolved) -> Self {
        Self {
            contract: view.contract.into(),
            product: view.product.into(),
            user: view.user.into(),
        }
    }
}

/// Wire form of a generated rental agreement document location.
#[derive(Debug, Serialize)]
pub struct AgreementBody {
    /// Filesystem path of the document.
    pub path: String,
}

/// Query parameters of [`overlapping()`].
#[derive(Debug, Deserialize)]
pub struct WindowParams {
    /// First `YYYY-MM-DD` date of the probed window.
    pub start: String,

    /// Last `YYYY-MM-DD` date of the probed window.
    pub end: String,
}

/// Parses the inclusive rental window out of its endpoint strings.
fn window(start: &str, end: &str) -> Result<Period, Error> {
    let start = api::date("startDate", start)?;
    let end = api::date("endDate", end)?;
    Period::new(start, end)
        .ok_or_else(|| api::invalid("endDate", "window ends before it starts"))
}

/// `POST /api/contracts`
///
/// Creates a new `Contract` and responds with it.
pub async fn create(
    Extension(service): Extension<Service>,
    Extension(timeout): Extension<api::OperationTimeout>,
    Json(req): Json<CreateRequest>,
) -> Result<(StatusCode, Json<Body>), Error> {
    let cmd: command::CreateContract = req.try_into()?;
    api::within(timeout, async {
        service.execute(cmd).await.map_err(AsError::into_error)
    })
    .await
    .map(|c| (StatusCode::CREATED, Json(c.into())))
}

/// `GET /api/contracts`
///
/// Responds with the list of all `Contract`s.
pub async fn list(
    Extension(service): Extension<Service>,
    Extension(timeout): Extension<api::OperationTimeout>,
) -> Result<Json<Vec<Body>>, Error> {
    api::within(timeout, async {
        service
            .execute(query::contracts::List::by(()))
            .await
            .map_err(AsError::into_error)
    })
    .await
    .map(|list| Json(list.into_iter().map(Into::into).collect()))
}

/// `GET /api/contracts/date-range`
///
/// Responds with every `Contract` whose rental window intersects the probed
/// one, with its `Product` and `User` resolved.
pub async fn overlapping(
    Extension(service): Extension<Service>,
    Extension(timeout): Extension<api::OperationTimeout>,
    Query(params): Query<WindowParams>,
) -> Result<Json<Vec<ResolvedBody>>, Error> {
    let period = window(&params.start, &params.end)?;
    api::within(timeout, async {
        service
            .execute(query::contracts::Overlapping { period })
            .await
            .map_err(AsError::into_error)
    })
    .await
    .map(|list| Json(list.into_iter().map(Into::into).collect()))
}

/// `GET /api/contracts/:id`
///
/// Responds with the `Contract` with the provided ID.
pub async fn get(
    Extension(service): Extension<Service>,
    Extension(timeout): Extension<api::OperationTimeout>,
    Path(id): Path<contract::Id>,
) -> Result<Json<Body>, Error> {
    api::within(timeout, async {
        service
            .execute(query::contract::ById::by(id))
            .await
            .map_err(AsError::into_error)
    })
    .await?
    .map(|c| Json(c.into()))
    .ok_or_else(|| ContractError::NotExists.into())
}

/// `PUT /api/contracts/:id`
///
/// Replaces every field of the `Contract` except its creation time, recharges
/// the total from the current `Product` prices, and responds with the updated
/// `Contract`.
pub async fn update(
    Extension(service): Extension<Service>,
    Extension(timeout): Extension<api::OperationTimeout>,
    Path(id): Path<contract::Id>,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<Body>, Error> {
    let UpdateRequest {
        product_id,
        user_id,
        quantity,
        rental_days,
        state_before,
        state_after,
        usage_date,
        retrieval_date,
        start_date,
        end_date,
    } = req;

    let cmd = command::EditContract {
        id,
        product_id,
        user_id,
        quantity,
        rental_days,
        state_before: api::parse("stateBefore", &state_before)?,
        state_after: state_after
            .as_deref()
            .map(|s| api::parse("stateAfter", s))
            .transpose()?,
        usage_date: api::date("usageDate", &usage_date)?,
        retrieval_date: retrieval_date
            .as_deref()
            .map(|s| api::date("retrievalDate", s))
            .transpose()?,
        period: window(&start_date, &end_date)?,
    };

    api::within(timeout, async {
        service.execute(cmd).await.map_err(AsError::into_error)
    })
    .await
    .map(|c| Json(c.into()))
}

/// `POST /api/contracts/:id/agreement`
///
/// Generates the rental agreement document of the `Contract` and responds
/// with its location.
///
/// The document can only be generated once the return of the `Product` is
/// recorded, and regenerating it overwrites the previous one.
pub async fn agreement(
    Extension(service): Extension<Service>,
    Extension(timeout): Extension<api::OperationTimeout>,
    Path(id): Path<contract::Id>,
) -> Result<(StatusCode, Json<AgreementBody>), Error> {
    api::within(timeout, async {
        service
            .execute(command::GenerateAgreement { contract_id: id })
            .await
            .map_err(AsError::into_error)
    })
    .await
    .map(|locator| {
        (
            StatusCode::CREATED,
            Json(AgreementBody {
                path: locator.to_string(),
            }),
        )
    })
}
