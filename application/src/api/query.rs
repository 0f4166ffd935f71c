//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{query, read, Query as _};

use crate::{api, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the currently authenticated `User`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authorized.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myUser",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_user(ctx: &Context) -> Result<api::User, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::user::ById::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::UserError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists the `RoomType`s available for booking today, from the cheapest
    /// to the most expensive one.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "roomTypes",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn room_types(
        ctx: &Context,
    ) -> Result<Vec<api::RoomTypeListing>, Error> {
        ctx.service()
            .execute(query::room_types::Listing::today())
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|listings| listings.into_iter().map(Into::into).collect())
    }

    /// Returns the `RoomType` with the specified ID, if it's available for
    /// booking today.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `ROOM_TYPE_NOT_EXISTS` - the `RoomType` with the specified ID does
    ///                            not exist or has no effective price.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "roomType",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn room_type(
        id: api::room_type::Id,
        ctx: &Context,
    ) -> Result<api::RoomTypeListing, Error> {
        ctx.service()
            .execute(query::room_type::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .and_then(read::room_type::Listing::new)
            .ok_or_else(|| api::RoomTypeError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }
}
