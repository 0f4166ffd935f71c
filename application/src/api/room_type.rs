//! [`RoomTypeListing`]-related definitions.

use common::{Date, DateTime, Money, Percent};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, read};
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError as _, Context, Error,
};

/// Room type shown to guests along with its resolved prices.
#[derive(Clone, Debug, From, Into)]
pub struct RoomTypeListing(read::room_type::Listing);

/// Room type shown to guests along with its resolved prices.
#[graphql_object(context = Context)]
impl RoomTypeListing {
    /// Unique identifier of this `RoomType`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RoomTypeListing.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.room_type.id.into()
    }

    /// Name of this `RoomType`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RoomTypeListing.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn name(&self) -> Name {
        self.0.room_type.name.clone().into()
    }

    /// Unique code of this `RoomType`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RoomTypeListing.code",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn code(&self) -> Code {
        self.0.room_type.code.clone().into()
    }

    /// Description of this `RoomType`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RoomTypeListing.description",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn description(&self) -> Option<Description> {
        self.0.room_type.description.clone().map(Into::into)
    }

    /// Rooms of this `RoomType`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RoomTypeListing.rooms",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn rooms(&self) -> Vec<Room> {
        self.0.room_type.rooms.iter().cloned().map(Room).collect()
    }

    /// Number of rooms of this `RoomType`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RoomTypeListing.roomsCount",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn rooms_count(&self, ctx: &Context) -> Result<i32, Error> {
        i32::try_from(self.0.rooms_count())
            .map_err(|e| e.into_error())
            .map_err(ctx.error())
    }

    /// Resolved effective prices of this `RoomType`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RoomTypeListing.pricing",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn pricing(&self) -> Pricing {
        self.0.pricing.clone().into()
    }

    /// `DateTime` when this `RoomType` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RoomTypeListing.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn created_at(&self) -> DateTime {
        self.0.room_type.created_at.coerce()
    }
}

/// Effective prices of a room type resolved for displaying.
#[derive(Clone, Debug, From, Into)]
pub struct Pricing(domain::room_type::price::Resolution);

/// Effective prices of a `RoomType` resolved for displaying.
#[graphql_object(name = "RoomTypePricing", context = Context)]
impl Pricing {
    /// Effective `STANDARD` price.
    #[must_use]
    pub fn standard(&self) -> Price {
        self.0.standard.clone().into()
    }

    /// Effective `PROMOTION` price, if any.
    #[must_use]
    pub fn promotion(&self) -> Option<Price> {
        self.0.promotion.clone().map(Into::into)
    }

    /// Indicator whether a `PROMOTION` price is applied.
    #[must_use]
    pub fn is_promoted(&self) -> bool {
        self.0.is_promoted()
    }

    /// Savings of the weekday `PROMOTION` amount comparing to the `STANDARD`
    /// one.
    #[must_use]
    pub fn weekday_savings(&self) -> Percent {
        self.0.weekday_savings
    }

    /// Savings of the weekend `PROMOTION` amount comparing to the `STANDARD`
    /// one.
    #[must_use]
    pub fn weekend_savings(&self) -> Percent {
        self.0.weekend_savings
    }

    /// Weekday amount to display as the `RoomType` price.
    #[must_use]
    pub fn display_price(&self) -> Money {
        self.0.display_price
    }
}

/// Nightly price of a room type.
#[derive(Clone, Debug, From, Into)]
pub struct Price(domain::room_type::Price);

/// Nightly price of a `RoomType` effective within a period.
#[graphql_object(name = "RoomPrice", context = Context)]
impl Price {
    /// Unique identifier of this `RoomPrice`.
    #[must_use]
    pub fn id(&self) -> PriceId {
        self.0.id.into()
    }

    /// Kind of this `RoomPrice`.
    #[must_use]
    pub fn kind(&self) -> PriceKind {
        self.0.kind.into()
    }

    /// Amount of a weekday night.
    #[must_use]
    pub fn weekday(&self) -> Money {
        self.0.weekday
    }

    /// Amount of a weekend night.
    #[must_use]
    pub fn weekend(&self) -> Money {
        self.0.weekend
    }

    /// Name of the promotion, if any.
    #[must_use]
    pub fn promotion_name(&self) -> Option<PromotionName> {
        self.0.promotion_name.clone().map(Into::into)
    }

    /// First `Date` this `RoomPrice` is effective on.
    #[must_use]
    pub fn effective_from(&self) -> Date {
        self.0.effective_from.coerce()
    }

    /// Last `Date` this `RoomPrice` is effective on, if any.
    #[must_use]
    pub fn effective_to(&self) -> Option<Date> {
        self.0.effective_to.map(|d| d.coerce())
    }
}

/// Room of a room type.
#[derive(Clone, Debug, From, Into)]
pub struct Room(domain::Room);

/// Physical room of a `RoomType`.
#[graphql_object(context = Context)]
impl Room {
    /// Unique identifier of this `Room`.
    #[must_use]
    pub fn id(&self) -> RoomId {
        self.0.id.into()
    }

    /// Name of this `Room`.
    #[must_use]
    pub fn name(&self) -> RoomName {
        self.0.name.clone().into()
    }
}

/// Kind of a `RoomPrice`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "RoomPriceKind")]
pub enum PriceKind {
    /// Regular price.
    Standard,

    /// Time-limited promotional price.
    Promotion,
}

impl From<domain::room_type::price::Kind> for PriceKind {
    fn from(kind: domain::room_type::price::Kind) -> Self {
        use domain::room_type::price::Kind as K;

        match kind {
            K::Standard => Self::Standard,
            K::Promotion => Self::Promotion,
        }
    }
}

impl From<PriceKind> for domain::room_type::price::Kind {
    fn from(kind: PriceKind) -> Self {
        match kind {
            PriceKind::Standard => Self::Standard,
            PriceKind::Promotion => Self::Promotion,
        }
    }
}

/// Unique identifier of a `RoomType`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::room_type::Id)]
#[into(domain::room_type::Id)]
#[graphql(name = "RoomTypeId", transparent)]
pub struct Id(Uuid);

/// Name of a `RoomType`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "RoomTypeName",
    with = scalar::Via::<domain::room_type::Name>,
)]
pub struct Name(domain::room_type::Name);

/// Unique code of a `RoomType`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "RoomTypeCode",
    with = scalar::Via::<domain::room_type::Code>,
)]
pub struct Code(domain::room_type::Code);

/// Description of a `RoomType`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "RoomTypeDescription",
    with = scalar::Via::<domain::room_type::Description>,
)]
pub struct Description(domain::room_type::Description);

/// Unique identifier of a `RoomPrice`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::room_type::price::Id)]
#[into(domain::room_type::price::Id)]
#[graphql(name = "RoomPriceId", transparent)]
pub struct PriceId(Uuid);

/// Name of a promotion.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PromotionName",
    with = scalar::Via::<domain::room_type::price::PromotionName>,
)]
pub struct PromotionName(domain::room_type::price::PromotionName);

/// Unique identifier of a `Room`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::room::Id)]
#[into(domain::room::Id)]
#[graphql(name = "RoomId", transparent)]
pub struct RoomId(Uuid);

/// Name of a `Room`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "RoomName", with = scalar::Via::<domain::room::Name>)]
pub struct RoomName(domain::room::Name);
