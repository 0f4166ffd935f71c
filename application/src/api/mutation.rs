//! GraphQL [`Mutation`]s definitions.

use common::{Date, Money};
use juniper::graphql_object;
use service::{command, domain::booking, read, Command as _};

use crate::{api, define_error, AsError, Context, Error, Session};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `UserSession` with the provided credentials.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `WRONG_CREDENTIALS` - provided credentials does not match any `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            email = %email,
            gql.name = "createUserSession",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_user_session(
        email: api::user::Email,
        password: api::user::Password,
        ctx: &Context,
    ) -> Result<api::user::session::CreateResult, Error> {
        let output = ctx
            .service()
            .execute(command::CreateUserSession::ByCredentials {
                email: email.into(),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.set_current_session(Session::from(&output));

        Ok(output.into())
    }

    /// Creates a new `User` with the provided credentials.
    ///
    /// `GUEST` role is assigned if no `role` is provided.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authorized;
    /// - `NOT_ADMINISTRATOR` - the current `User` is neither an owner nor an
    ///                         administrator;
    /// - `EMAIL_OCCUPIED` - provided `UserEmail` is occupied by another
    ///                      `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            email = %email,
            gql.name = "createUser",
            name = %name,
            otel.name = Self::SPAN_NAME,
            role = ?role,
        ),
    )]
    pub async fn create_user(
        email: api::user::Email,
        name: api::user::Name,
        password: api::user::Password,
        role: Option<api::user::Role>,
        ctx: &Context,
    ) -> Result<api::User, Error> {
        _ = ctx.current_administrator().await?;

        ctx.service()
            .execute(command::CreateUser {
                email: email.into(),
                name: name.into(),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
                role: role.map(Into::into).unwrap_or_default(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `RoomType` with the specified number of `Room`s and the
    /// `STANDARD` price effective from today.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authorized;
    /// - `NOT_ADMINISTRATOR` - the current `User` is neither an owner nor an
    ///                         administrator;
    /// - `INVALID_ROOMS_QUANTITY` - provided `quantity` is negative or too
    ///                              large;
    /// - `ROOM_TYPE_CODE_OCCUPIED` - provided `RoomTypeCode` is occupied by
    ///                               another `RoomType`.
    #[tracing::instrument(
        skip_all,
        fields(
            code = %code,
            gql.name = "createRoomType",
            name = %name,
            otel.name = Self::SPAN_NAME,
            quantity = quantity,
        ),
    )]
    pub async fn create_room_type(
        name: api::room_type::Name,
        code: api::room_type::Code,
        description: Option<api::room_type::Description>,
        quantity: i32,
        weekday: Money,
        weekend: Money,
        ctx: &Context,
    ) -> Result<api::RoomTypeListing, Error> {
        _ = ctx.current_administrator().await?;

        let quantity = u16::try_from(quantity)
            .map_err(|_| QuantityError::Invalid.into())
            .map_err(ctx.error())?;

        let room_type = ctx
            .service()
            .execute(command::CreateRoomType {
                name: name.into(),
                code: code.into(),
                description: description.map(Into::into),
                quantity,
                weekday,
                weekend,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        read::room_type::Listing::new(room_type)
            .map(Into::into)
            .ok_or_else(|| Error::internal(&"created `RoomType` has no price"))
            .map_err(ctx.error())
    }

    /// Adds a new `RoomPrice` to the `RoomType` with the specified ID.
    ///
    /// The `RoomPrice` is effective from the `effectiveFrom` date until the
    /// `effectiveTo` one inclusively, or forever if the latter is omitted.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authorized;
    /// - `NOT_ADMINISTRATOR` - the current `User` is neither an owner nor an
    ///                         administrator;
    /// - `INVALID_PRICE_PERIOD` - `effectiveTo` date precedes the
    ///                            `effectiveFrom` one;
    /// - `ROOM_TYPE_NOT_EXISTS` - the `RoomType` with the specified ID does
    ///                            not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            effective_from = %effective_from,
            effective_to = ?effective_to,
            gql.name = "createRoomPrice",
            kind = ?kind,
            otel.name = Self::SPAN_NAME,
            room_type_id = %room_type_id,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn create_room_price(
        room_type_id: api::room_type::Id,
        kind: api::room_type::PriceKind,
        weekday: Money,
        weekend: Money,
        promotion_name: Option<api::room_type::PromotionName>,
        effective_from: Date,
        effective_to: Option<Date>,
        ctx: &Context,
    ) -> Result<api::room_type::Price, Error> {
        _ = ctx.current_administrator().await?;

        ctx.service()
            .execute(command::CreateRoomPrice {
                room_type_id: room_type_id.into(),
                kind: kind.into(),
                weekday,
                weekend,
                promotion_name: promotion_name.map(Into::into),
                effective_from: effective_from.coerce(),
                effective_to: effective_to.map(Date::coerce),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a provisional booking of the `RoomType` with the specified ID
    /// for the specified dates.
    ///
    /// Dates are accepted as `YYYY-MM-DD` dates, RFC 3339 date-times,
    /// date-times without an offset (read as UTC) or Unix timestamps in
    /// milliseconds, and are normalized to the hotel check-in and check-out
    /// times. Issues of the provided values are returned as
    /// `BookingValidationErrors`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authorized.
    #[tracing::instrument(
        skip_all,
        fields(
            check_in = %check_in,
            check_out = %check_out,
            gql.name = "createBooking",
            otel.name = Self::SPAN_NAME,
            room_type_id = %room_type_id,
        ),
    )]
    pub async fn create_booking(
        room_type_id: String,
        check_in: String,
        check_out: String,
        ctx: &Context,
    ) -> Result<api::booking::CreateBookingResult, Error> {
        _ = ctx.current_session().await?;

        let res = ctx
            .service()
            .execute(command::CreateBooking {
                request: booking::RawRequest {
                    room_type_id,
                    check_in,
                    check_out,
                },
            })
            .await;
        Ok(match res {
            Ok(request) => {
                api::booking::ProvisionalBooking::from(request).into()
            }
            Err(e) => match e.into_inner() {
                command::create_booking::ExecutionError::Invalid(issues) => {
                    api::booking::BookingValidationErrors::from(issues).into()
                }
            },
        })
    }
}

define_error! {
    enum QuantityError {
        #[code = "INVALID_ROOMS_QUANTITY"]
        #[status = BAD_REQUEST]
        #[message = "`quantity` must be between 0 and 65535"]
        Invalid,
    }
}

impl AsError for command::create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "WRONG_CREDENTIALS"]
                #[status = FORBIDDEN]
                #[message = "Provided credentials does not match any `User`"]
                WrongCredentials,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::JsonWebTokenEncodeError(_) => None,
            Self::UserNotExists(_) | Self::WrongCredentials => {
                Some(Error::WrongCredentials.into())
            }
        }
    }
}

impl AsError for command::create_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "EMAIL_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "`UserEmail` is occupied by another `User`"]
                EmailOccupied,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EmailOccupied(_) => Some(Error::EmailOccupied.into()),
            Self::PasswordHashing(_) => None,
        }
    }
}

impl AsError for command::create_room_type::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "ROOM_TYPE_CODE_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "`RoomTypeCode` is occupied by another \
                             `RoomType`"]
                CodeOccupied,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::CodeOccupied(_) => Some(Error::CodeOccupied.into()),
        }
    }
}

impl AsError for command::create_room_price::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_PRICE_PERIOD"]
                #[status = BAD_REQUEST]
                #[message = "`effectiveTo` date must not precede \
                             `effectiveFrom` one"]
                InvalidPeriod,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InvalidPeriod => Some(Error::InvalidPeriod.into()),
            Self::RoomTypeNotExists(_) => {
                Some(api::RoomTypeError::NotExists.into())
            }
        }
    }
}
