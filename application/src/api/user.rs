//! `User`-related REST API definitions.

use axum::{http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use service::{
    command,
    domain::{self, user},
    query, Command as _,
};

use crate::{api, AsError, Error, Service};

/// Wire form of a `User` registration request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    /// First name of the `User`.
    pub first_name: String,

    /// Last name of the `User`.
    pub last_name: String,

    /// Postal address of the `User`.
    pub postal_address: String,

    /// City of the `User`.
    pub city: String,

    /// `YYYY-MM-DD` date when the `User` was born.
    pub birth_date: String,

    /// Phone number of the `User`.
    pub phone: String,

    /// Email address of the `User`, unique across the system.
    pub email: String,
}

impl TryFrom<CreateRequest> for command::CreateUser {
    type Error = Error;

    fn try_from(req: CreateRequest) -> Result<Self, Self::Error> {
        let CreateRequest {
            first_name,
            last_name,
            postal_address,
            city,
            birth_date,
            phone,
            email,
        } = req;

        Ok(Self {
            first_name: api::parse("firstName", &first_name)?,
            last_name: api::parse("lastName", &last_name)?,
            postal_address: api::parse("postalAddress", &postal_address)?,
            city: api::parse("city", &city)?,
            birth_date: api::date("birthDate", &birth_date)?,
            phone: api::parse("phone", &phone)?,
            email: api::parse("email", &email)?,
        })
    }
}

/// Wire form of a `User`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    /// ID of the `User`.
    pub id: user::Id,

    /// First name of the `User`.
    pub first_name: String,

    /// Last name of the `User`.
    pub last_name: String,

    /// Postal address of the `User`.
    pub postal_address: String,

    /// City of the `User`.
    pub city: String,

    /// `YYYY-MM-DD` date when the `User` was born.
    pub birth_date: String,

    /// Phone number of the `User`.
    pub phone: String,

    /// Email address of the `User`.
    pub email: String,

    /// [RFC 3339] timestamp of when the `User` was registered.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub created_at: String,
}

impl From<domain::User> for Body {
    fn from(u: domain::User) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name.to_string(),
            last_name: u.last_name.to_string(),
            postal_address: u.postal_address.to_string(),
            city: u.city.to_string(),
            birth_date: u.birth_date.to_calendar_string(),
            phone: u.phone.to_string(),
            email: u.email.to_string(),
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// `POST /api/users`
///
/// Registers a new `User` and responds with it.
pub async fn create(
    Extension(service): Extension<Service>,
    Extension(timeout): Extension<api::OperationTimeout>,
    Json(req): Json<CreateRequest>,
) -> Result<(StatusCode, Json<Body>), Error> {
    let cmd: command::CreateUser = req.try_into()?;
    api::within(timeout, async {
        service.execute(cmd).await.map_err(AsError::into_error)
    })
    .await
    .map(|u| (StatusCode::CREATED, Json(u.into())))
}

/// `GET /api/users`
///
/// Responds with the list of all registered `User`s.
pub async fn list(
    Extension(service): Extension<Service>,
    Extension(timeout): Extension<api::OperationTimeout>,
) -> Result<Json<Vec<Body>>, Error> {
    api::within(timeout, async {
        service
            .execute(query::users::List::by(()))
            .await
            .map_err(AsError::into_error)
    })
    .await
    .map(|list| Json(list.into_iter().map(Into::into).collect()))
}
