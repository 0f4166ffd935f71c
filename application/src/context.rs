//! [`Context`]-related definitions.

use std::sync::atomic::{self, AtomicU16};

use axum::{async_trait, extract::FromRequestParts};
use axum_extra::headers::{
    authorization::Bearer, Authorization, HeaderMapExt as _,
};
use common::DateTime;
use juniper::{
    http::{GraphQLBatchResponse, GraphQLResponse},
    IntoFieldError as _,
};
use service::{
    command::{self, Command as _},
    domain::user::{self, session},
};
use tokio::sync::OnceCell;

#[cfg(doc)]
use crate::api::User;
use crate::{api, define_error, AsError, Error, JuniperResponse, Service};

/// Request-scoped GraphQL context.
#[derive(Debug)]
pub struct Context {
    /// [`Service`] instance.
    service: Service,

    /// HTTP status code to respond with if any [`Error`] happens.
    error_status_code: AtomicU16,

    /// Headers of the HTTP request.
    headers: http::HeaderMap,

    /// Outcome of the [`Session`] authentication, resolved once per request.
    session: OnceCell<Result<Session, Error>>,
}

impl Context {
    /// Creates a new [`Context`] of an HTTP request with the provided
    /// `headers`.
    #[must_use]
    pub fn new(service: Service, headers: http::HeaderMap) -> Self {
        Self {
            service,
            error_status_code: AtomicU16::new(
                http::StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            ),
            headers,
            session: OnceCell::new(),
        }
    }

    /// Returns [`Service`] instance of this [`Context`].
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Returns the error status code of this [`Context`].
    #[must_use]
    pub fn error_status_code(&self) -> http::StatusCode {
        http::StatusCode::from_u16(
            self.error_status_code.load(atomic::Ordering::Relaxed),
        )
        .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Sets the error status code for this [`Context`].
    ///
    /// Provided [`http::StatusCode`] will be applied to the response.
    pub fn set_error_status_code(&self, status_code: http::StatusCode) {
        self.error_status_code
            .store(status_code.as_u16(), atomic::Ordering::Relaxed);
    }

    /// Helper method calling [`Context::set_error_status_code()`] inside
    /// [`Result::map_err()`] closure.
    pub fn error(&self) -> impl FnOnce(Error) -> Error + '_ {
        move |err| {
            self.set_error_status_code(err.status_code);
            err
        }
    }

    /// Sets the current [`Session`] for this [`Context`], unless it has been
    /// resolved already.
    pub fn set_current_session(&self, session: Session) {
        _ = self.session.set(Ok(session));
    }

    /// Returns the current [`Session`] for this [`Context`].
    ///
    /// # Errors
    ///
    /// Errors if:
    /// - the current HTTP request is not authorized;
    /// - the provided authentication token is invalid.
    pub async fn current_session(&self) -> Result<Session, Error> {
        self.session
            .get_or_init(|| self.authenticate())
            .await
            .clone()
            .map_err(self.error())
    }

    /// Returns the current [`Session`] if its [`User`] administers the hotel.
    ///
    /// # Errors
    ///
    /// Errors if:
    /// - the current HTTP request is not authorized;
    /// - the provided authentication token is invalid;
    /// - the authenticated [`User`] is neither an owner nor an
    ///   administrator.
    pub async fn current_administrator(&self) -> Result<Session, Error> {
        let session = self.current_session().await?;
        if !session.role.is_administrative() {
            return Err(self.error()(api::PrivilegeError::Administrator.into()));
        }
        Ok(session)
    }

    /// Authenticates the [`Session`] by the bearer token of the
    /// `Authorization` header.
    ///
    /// # Errors
    ///
    /// Errors if the header is missing, malformed or carries an invalid
    /// token.
    async fn authenticate(&self) -> Result<Session, Error> {
        let bearer = self
            .headers
            .typed_try_get::<Authorization<Bearer>>()
            .map_err(AsError::into_error)?
            .ok_or_else(|| Error::from(AuthError::AuthorizationRequired))?
            .0;

        #[expect(unsafe_code, reason = "specified in correct header")]
        let token = unsafe {
            session::Token::new_unchecked(bearer.token().to_owned())
        };
        self.service
            .execute(command::AuthorizeUserSession {
                token: token.clone(),
            })
            .await
            .map(|out| Session {
                user_id: out.session.user_id.into(),
                role: out.user.role,
                token,
                expires_at: out.session.expires_at.coerce(),
            })
            .map_err(AsError::into_error)
    }
}

impl juniper::Context for Context {}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = JuniperResponse;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let service =
            parts.extensions.get::<Service>().cloned().ok_or_else(|| {
                JuniperResponse {
                    status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
                    response: GraphQLBatchResponse::Single(
                        GraphQLResponse::error(
                            Error::internal(&"missing `Service` extension")
                                .into_field_error(),
                        ),
                    ),
                }
            })?;

        Ok(Self::new(service, parts.headers.clone()))
    }
}

/// Authenticated session of a [`User`].
#[derive(Clone, Debug)]
pub struct Session {
    /// ID of the [`User`] associated with this [`Session`].
    pub user_id: api::user::Id,

    /// [`user::Role`] of the [`User`] associated with this [`Session`].
    pub role: user::Role,

    /// Authentication token.
    pub token: session::Token,

    /// [`DateTime`] when this [`Session`] expires.
    pub expires_at: DateTime,
}

impl AsError for command::authorize_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::Expired
            | Self::JsonWebTokenDecodeError(_)
            | Self::UserNotExists(_) => {
                Some(AuthError::AuthorizationRequired.into())
            }
        }
    }
}

define_error! {
    enum AuthError {
        #[code = "AUTHORIZATION_REQUIRED"]
        #[status = UNAUTHORIZED]
        #[message = "Authorization required"]
        AuthorizationRequired,
    }
}

#[cfg(test)]
mod spec {
    use service::{
        command::authorize_user_session::ExecutionError, domain::user,
        infra::Postgres,
    };

    use crate::{config, AsError as _, Service};

    use super::Context;

    fn context(authorization: Option<&str>) -> Context {
        let service = Service::new(
            config::Service::default().into(),
            Postgres::new(&config::Postgres::default().into()).unwrap(),
        );
        let mut headers = http::HeaderMap::new();
        if let Some(value) = authorization {
            _ = headers.insert(
                http::header::AUTHORIZATION,
                value.parse().unwrap(),
            );
        }
        Context::new(service, headers)
    }

    #[tokio::test]
    async fn requires_authorization_header() {
        let ctx = context(None);

        let err = ctx.current_session().await.unwrap_err();

        assert_eq!(err.code, "AUTHORIZATION_REQUIRED");
        assert_eq!(ctx.error_status_code(), http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejects_foreign_token() {
        let ctx = context(Some("Bearer not.a.jwt"));

        let err = ctx.current_session().await.unwrap_err();

        assert_eq!(err.code, "AUTHORIZATION_REQUIRED");
    }

    #[test]
    fn token_of_removed_user_requires_authorization() {
        let err = ExecutionError::UserNotExists(user::Id::new()).into_error();

        assert_eq!(err.code, "AUTHORIZATION_REQUIRED");
        assert_eq!(err.status_code, http::StatusCode::UNAUTHORIZED);

        let err = ExecutionError::Expired.into_error();

        assert_eq!(err.code, "AUTHORIZATION_REQUIRED");
    }

    #[tokio::test]
    async fn administrator_gate_requires_session() {
        let ctx = context(None);

        let err = ctx.current_administrator().await.unwrap_err();

        assert_eq!(err.code, "AUTHORIZATION_REQUIRED");
    }
}
