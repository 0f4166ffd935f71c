//! [`Booking`] definitions.

pub mod window;

use std::iter;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{room, room_type, user};

pub use self::window::{
    parse_date, Field, ParseError, Policy, ValidationError, Window,
};

/// Reservation of a room by a guest.
///
/// Only a [`Request`] for a [`Booking`] has a behavior for now.
#[derive(Clone, Debug)]
pub struct Booking {
    /// ID of this [`Booking`].
    pub id: Id,

    /// Human-readable [`Number`] of this [`Booking`].
    pub number: Number,

    /// ID of the guest this [`Booking`] is made by.
    pub guest_id: user::Id,

    /// ID of the booked room type.
    pub room_type_id: room_type::Id,

    /// ID of the room assigned to this [`Booking`], if any.
    pub room_id: Option<room::Id>,

    /// Stay [`Window`] of this [`Booking`].
    pub window: Window,

    /// [`Status`] of this [`Booking`].
    pub status: Status,

    /// [`PaymentStatus`] of this [`Booking`].
    pub payment_status: PaymentStatus,

    /// Number of weekday nights in the [`Window`].
    pub weekday_nights: Nights,

    /// Number of weekend nights in the [`Window`].
    pub weekend_nights: Nights,

    /// Weekday amount at the moment of booking.
    pub weekday_price: Money,

    /// Weekend amount at the moment of booking.
    pub weekend_price: Money,

    /// Total amount before the discount.
    pub base_amount: Money,

    /// Discounted amount.
    pub discount_amount: Money,

    /// Amount to be paid.
    pub total_amount: Money,

    /// [`DateTime`] when this [`Booking`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Booking`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

/// Human-readable number of a [`Booking`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Number(String);

/// Number of nights of a [`Booking`].
pub type Nights = u16;

define_kind! {
    #[doc = "Status of a [`Booking`]."]
    enum Status {
        #[doc = "Awaits confirmation."]
        Pending = 1,

        #[doc = "Confirmed by the hotel."]
        Confirmed = 2,

        #[doc = "Guest has checked in."]
        CheckedIn = 3,

        #[doc = "Guest has checked out."]
        CheckedOut = 4,

        #[doc = "Cancelled by the guest or the hotel."]
        Cancelled = 5,

        #[doc = "Guest hasn't arrived."]
        NoShow = 6,

        #[doc = "Temporarily held by the hotel."]
        OnHold = 7,

        #[doc = "Hasn't been confirmed in time."]
        Expired = 8,
    }
}

define_kind! {
    #[doc = "Payment status of a [`Booking`]."]
    enum PaymentStatus {
        #[doc = "Awaits payment."]
        Pending = 1,

        #[doc = "Paid in full."]
        Paid = 2,

        #[doc = "Payment has failed."]
        Failed = 3,

        #[doc = "Payment has been returned to the guest."]
        Refunded = 4,

        #[doc = "Payment is disputed by the guest."]
        Disputed = 5,

        #[doc = "Payment has been cancelled."]
        Cancelled = 6,
    }
}

/// Marker type describing a check-in.
#[derive(Clone, Copy, Debug)]
pub struct CheckIn;

/// Marker type describing a check-out.
#[derive(Clone, Copy, Debug)]
pub struct CheckOut;

/// [`DateTime`] when a [`Booking`] was created.
pub type CreationDateTime = DateTimeOf<(Booking, unit::Creation)>;

/// Raw unparsed [`Request`] for a [`Booking`].
#[derive(Clone, Debug, Default)]
pub struct RawRequest {
    /// Raw ID of the room type to book.
    pub room_type_id: String,

    /// Raw check-in date.
    pub check_in: String,

    /// Raw check-out date.
    pub check_out: String,
}

/// Parsed and validated request for a [`Booking`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Request {
    /// ID of the room type to book.
    pub room_type_id: room_type::Id,

    /// Normalized stay [`Window`].
    pub window: Window,
}

impl Request {
    /// Parses the provided [`RawRequest`] normalizing its [`Window`]
    /// according to the provided [`Policy`].
    ///
    /// Ordering of the [`Window`] is validated only once all the fields are
    /// parsed successfully.
    ///
    /// # Errors
    ///
    /// With all the [`Issue`]s found in the provided [`RawRequest`].
    pub fn parse(raw: &RawRequest, policy: &Policy) -> Result<Self, Vec<Issue>> {
        let room_type_id = raw
            .room_type_id
            .parse::<Uuid>()
            .map(room_type::Id::from)
            .map_err(|_| ParseError {
                field: Field::RoomTypeId,
            });
        let window = Window::parse(&raw.check_in, &raw.check_out, policy);

        match (room_type_id, window) {
            (Ok(room_type_id), Ok(window)) => Ok(Self {
                room_type_id,
                window,
            }),
            (Ok(_), Err(issues)) => Err(issues),
            (Err(e), window) => Err(iter::once(e.into())
                .chain(
                    window
                        .err()
                        .into_iter()
                        .flatten()
                        .filter(|i| matches!(i, Issue::Parse(_))),
                )
                .collect()),
        }
    }
}

/// Structured issue of a [`Booking`] [`Request`].
#[derive(Clone, Copy, Debug, Display, Eq, From, PartialEq)]
pub enum Issue {
    /// Some [`Field`] cannot be parsed.
    Parse(ParseError),

    /// Parsed values are inconsistent.
    Validation(ValidationError),
}

impl Issue {
    /// Returns the path of the [`Field`]s this [`Issue`] relates to.
    #[must_use]
    pub const fn path(&self) -> &'static [&'static str] {
        match self {
            Self::Parse(e) => e.field.path(),
            Self::Validation(_) => ValidationError::PATH,
        }
    }

    /// Returns the human-readable message of this [`Issue`].
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Parse(e) => e.message(),
            Self::Validation(_) => ValidationError::MESSAGE,
        }
    }
}
