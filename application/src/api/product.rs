//! `Product`-related REST API definitions.

use axum::{extract::Path, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use service::{
    command,
    domain::{self, product},
    query, Command as _,
};

use crate::{api, AsError, Error, Service};

/// Wire form of a `Product` creation or update request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    /// Object the `Product` represents.
    pub object: String,

    /// Brand of the `Product`.
    pub brand: String,

    /// Model of the `Product`.
    pub model: String,

    /// Number of units of the `Product`.
    pub quantity: i32,

    /// Description of the `Product`.
    pub description: String,

    /// Precautions to be taken when handling the `Product`.
    pub precautions: String,

    /// Price of renting one unit for a single day, e.g. `100USD`.
    pub price_per_day: String,

    /// Price of renting one unit for a full week, e.g. `600USD`.
    pub price_per_week: String,

    /// Deposit for one unit, e.g. `1000USD`.
    pub deposit: String,
}

impl TryFrom<CreateRequest> for command::CreateProduct {
    type Error = Error;

    fn try_from(req: CreateRequest) -> Result<Self, Self::Error> {
        let CreateRequest {
            object,
            brand,
            model,
            quantity,
            description,
            precautions,
            price_per_day,
            price_per_week,
            deposit,
        } = req;

        Ok(Self {
            object: api::parse("object", &object)?,
            brand: api::parse("brand", &brand)?,
            model: api::parse("model", &model)?,
            quantity,
            description: api::parse("description", &description)?,
            precautions: api::parse("precautions", &precautions)?,
            price_per_day: api::parse("pricePerDay", &price_per_day)?,
            price_per_week: api::parse("pricePerWeek", &price_per_week)?,
            deposit: api::parse("deposit", &deposit)?,
        })
    }
}

/// Wire form of a `Product`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    /// ID of the `Product`.
    pub id: product::Id,

    /// Object the `Product` represents.
    pub object: String,

    /// Brand of the `Product`.
    pub brand: String,

    /// Model of the `Product`.
    pub model: String,

    /// Number of units of the `Product`.
    pub quantity: i32,

    /// Description of the `Product`.
    pub description: String,

    /// Precautions to be taken when handling the `Product`.
    pub precautions: String,

    /// Price of renting one unit for a single day, e.g. `100USD`.
    pub price_per_day: String,

    /// Price of renting one unit for a full week, e.g. `600USD`.
    pub price_per_week: String,

    /// Deposit for one unit, e.g. `1000USD`.
    pub deposit: String,

    /// [RFC 3339] timestamp of when the `Product` was added.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub created_at: String,
}

impl From<domain::Product> for Body {
    fn from(p: domain::Product) -> Self {
        Self {
            id: p.id,
            object: p.object.to_string(),
            brand: p.brand.to_string(),
            model: p.model.to_string(),
            quantity: p.quantity,
            description: p.description.to_string(),
            precautions: p.precautions.to_string(),
            price_per_day: p.price_per_day.to_string(),
            price_per_week: p.price_per_week.to_string(),
            deposit: p.deposit.to_string(),
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

/// `POST /api/products`
///
/// Adds a new `Product` to the catalog and responds with it.
pub async fn create(
    Extension(service): Extension<Service>,
    Extension(timeout): Extension<api::OperationTimeout>,
    Json(req): Json<CreateRequest>,
) -> Result<(StatusCode, Json<Body>), Error> {
    let cmd: command::CreateProduct = req.try_into()?;
    api::within(timeout, async {
        service.execute(cmd).await.map_err(AsError::into_error)
    })
    .await
    .map(|p| (StatusCode::CREATED, Json(p.into())))
}

/// `GET /api/products`
///
/// Responds with the catalog of `Product`s, removed ones excluded.
pub async fn list(
    Extension(service): Extension<Service>,
    Extension(timeout): Extension<api::OperationTimeout>,
) -> Result<Json<Vec<Body>>, Error> {
    api::within(timeout, async {
        service
            .execute(query::products::List::by(()))
            .await
            .map_err(AsError::into_error)
    })
    .await
    .map(|list| Json(list.into_iter().map(Into::into).collect()))
}

/// `PUT /api/products/:id`
///
/// Replaces every field of the `Product` and responds with the updated one.
///
/// Already existing `Contract`s keep the totals charged at their creation
/// time: a price change never rewrites them.
pub async fn update(
    Extension(service): Extension<Service>,
    Extension(timeout): Extension<api::OperationTimeout>,
    Path(id): Path<product::Id>,
    Json(req): Json<CreateRequest>,
) -> Result<Json<Body>, Error> {
    let command::CreateProduct {
        object,
        brand,
        model,
        quantity,
        description,
        precautions,
        price_per_day,
        price_per_week,
        deposit,
    } = req.try_into()?;
    let cmd = command::UpdateProduct {
        id,
        object,
        brand,
        model,
        quantity,
        description,
        precautions,
        price_per_day,
        price_per_week,
        deposit,
    };

    api::within(timeout, async {
        service.execute(cmd).await.map_err(AsError::into_error)
    })
    .await
    .map(|p| Json(p.into()))
}

/// `DELETE /api/products/:id`
///
/// Removes the `Product` from the catalog.
///
/// The removal is soft: existing `Contract`s keep referring to the `Product`
/// and their agreements still generate.
pub async fn delete(
    Extension(service): Extension<Service>,
    Extension(timeout): Extension<api::OperationTimeout>,
    Path(id): Path<product::Id>,
) -> Result<StatusCode, Error> {
    api::within(timeout, async {
        service
            .execute(command::DeleteProduct { id })
            .await
            .map_err(AsError::into_error)
    })
    .await
    .map(|()| StatusCode::NO_CONTENT)
}
