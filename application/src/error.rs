//! [`Error`]-related definitions.

use std::fmt;

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use derive_more::Error as StdError;
use itertools::Itertools as _;
use serde::Serialize;
use service::{command, document, infra::database, query};
use tracerr::{Trace, Traced};

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[status = $status_code:ident]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        #[repr(u16)]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self {
                            code: $code,
                            status_code: ::http::StatusCode::$status_code,
                            message: $message.to_string(),
                            backtrace: None,
                        },
                    )*
                }
            }
        }
    };
}

/// REST API [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// [`http::StatusCode`] of this [`Error`].
    pub status_code: http::StatusCode,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,
}

impl Error {
    /// Creates a new [`Error`] with the provided `code` and `status_code`.
    #[must_use]
    pub fn new(
        code: Code,
        status_code: http::StatusCode,
        msg: &impl ToString,
    ) -> Self {
        Self {
            code,
            status_code,
            message: msg.to_string(),
            backtrace: None,
        }
    }

    /// Create a new [`Error`] representing an internal server error.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self::new(
            "INTERNAL_SERVER_ERROR",
            http::StatusCode::INTERNAL_SERVER_ERROR,
            msg,
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            status_code: _,
            backtrace,
            message,
        } = self;

        write!(
            f,
            "[{code}]: {message}{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("{trace}"))),
        )
    }
}

/// Wire form of an [`Error`].
#[derive(Debug, Serialize)]
struct Body {
    /// [`Error`] code.
    code: Code,

    /// [`Error`] message.
    message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if self.status_code.is_server_error() {
            tracing::error!("{self}");
        }

        let body = Body {
            code: self.code,
            message: self.message.clone(),
        };
        (self.status_code, Json(body)).into_response()
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

impl AsError for database::Error {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

impl AsError for document::Error {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

impl AsError for command::create_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::create_contract::ExecutionError as E;

        match self {
            E::Db(_) => None,
            E::ProductNotExists(_) | E::UserNotExists(_) => Some(Error::new(
                "NOT_FOUND",
                http::StatusCode::NOT_FOUND,
                self,
            )),
            E::InvalidQuantity(_) | E::InvalidDuration(_) => Some(Error::new(
                "VALIDATION_ERROR",
                http::StatusCode::BAD_REQUEST,
                self,
            )),
        }
    }
}

impl AsError for command::edit_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::edit_contract::ExecutionError as E;

        match self {
            E::Db(_) => None,
            E::ContractNotExists(_)
            | E::ProductNotExists(_)
            | E::UserNotExists(_) => Some(Error::new(
                "NOT_FOUND",
                http::StatusCode::NOT_FOUND,
                self,
            )),
            E::InvalidQuantity(_) | E::InvalidDuration(_) => Some(Error::new(
                "VALIDATION_ERROR",
                http::StatusCode::BAD_REQUEST,
                self,
            )),
        }
    }
}

impl AsError for command::create_product::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::create_product::ExecutionError as E;

        match self {
            E::Db(_) => None,
            E::InvalidQuantity(_) | E::CurrencyMismatch => Some(Error::new(
                "VALIDATION_ERROR",
                http::StatusCode::BAD_REQUEST,
                self,
            )),
        }
    }
}

impl AsError for command::update_product::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::update_product::ExecutionError as E;

        match self {
            E::Db(_) => None,
            E::ProductNotExists(_) => Some(Error::new(
                "NOT_FOUND",
                http::StatusCode::NOT_FOUND,
                self,
            )),
            E::InvalidQuantity(_) | E::CurrencyMismatch => Some(Error::new(
                "VALIDATION_ERROR",
                http::StatusCode::BAD_REQUEST,
                self,
            )),
        }
    }
}

impl AsError for command::delete_product::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::delete_product::ExecutionError as E;

        match self {
            E::Db(_) => None,
            E::ProductNotExists(_) => Some(Error::new(
                "NOT_FOUND",
                http::StatusCode::NOT_FOUND,
                self,
            )),
        }
    }
}

impl AsError for command::create_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::create_user::ExecutionError as E;

        match self {
            E::Db(_) => None,
            E::EmailOccupied(_) => Some(Error::new(
                "CONFLICT",
                http::StatusCode::CONFLICT,
                self,
            )),
        }
    }
}

impl AsError for command::generate_agreement::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::generate_agreement::ExecutionError as E;

        match self {
            // Dangling references mean the stored data is inconsistent, so
            // they surface as internal errors rather than 404s.
            E::Db(_)
            | E::ProductNotExists(_)
            | E::UserNotExists(_)
            | E::Document(_) => None,
            E::ContractNotExists(_) => Some(Error::new(
                "NOT_FOUND",
                http::StatusCode::NOT_FOUND,
                self,
            )),
            E::NotRetrieved(_) => Some(Error::new(
                "VALIDATION_ERROR",
                http::StatusCode::BAD_REQUEST,
                self,
            )),
        }
    }
}

impl AsError for query::contracts::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use query::contracts::ExecutionError as E;

        match self {
            E::Db(_) | E::ProductNotExists(_) | E::UserNotExists(_) => None,
        }
    }
}
